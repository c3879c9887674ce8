// Progress display for single-file transfers
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::time::{Duration, Instant};

pub struct ProgressTracker {
    progress_bar: ProgressBar,
    description: String,
    transferred_bytes: Cell<u64>,
    start_time: Instant,
    last_update: Cell<(Instant, u64)>,
}

impl ProgressTracker {
    pub fn new(total_size: u64, description: &str) -> Self {
        let progress_bar = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
        ) {
            progress_bar.set_style(style.progress_chars("#>-"));
        }
        progress_bar.set_message(description.to_string());

        let now = Instant::now();
        Self {
            progress_bar,
            description: description.to_string(),
            transferred_bytes: Cell::new(0),
            start_time: now,
            last_update: Cell::new((now, 0)),
        }
    }

    pub fn add_bytes(&self, bytes: u64) {
        let total = self.transferred_bytes.get() + bytes;
        self.transferred_bytes.set(total);
        self.progress_bar.set_position(total);
        self.update_speed(total);
    }

    pub fn transferred(&self) -> u64 {
        self.transferred_bytes.get()
    }

    pub fn finish(&self) {
        let elapsed = self.start_time.elapsed();
        let total = self.transferred_bytes.get();

        let avg_speed = if elapsed.as_secs() > 0 {
            total / elapsed.as_secs()
        } else {
            total
        };

        self.progress_bar.finish_with_message(format!(
            "Transfer completed (avg speed: {})",
            format_speed(avg_speed)
        ));
    }

    pub fn finish_with_error(&self, error: &str) {
        self.progress_bar
            .abandon_with_message(format!("Transfer failed: {}", error));
    }

    // refresh at most every 200ms
    fn update_speed(&self, current_bytes: u64) {
        let now = Instant::now();
        let (last_time, last_bytes) = self.last_update.get();
        let elapsed = now.duration_since(last_time);

        if elapsed >= Duration::from_millis(200) {
            let bytes_diff = current_bytes.saturating_sub(last_bytes);
            let speed = (bytes_diff as f64 / elapsed.as_secs_f64()) as u64;
            self.progress_bar.set_message(self.status_message(speed));
            self.last_update.set((now, current_bytes));
        }
    }

    fn status_message(&self, bytes_per_sec: u64) -> String {
        format!("{} ({})", self.description, format_speed(bytes_per_sec))
    }
}

pub fn format_speed(bytes_per_sec: u64) -> String {
    if bytes_per_sec < 1024 {
        format!("{} B/s", bytes_per_sec)
    } else if bytes_per_sec < 1024 * 1024 {
        format!("{:.2} KB/s", bytes_per_sec as f64 / 1024.0)
    } else if bytes_per_sec < 1024 * 1024 * 1024 {
        format!("{:.2} MB/s", bytes_per_sec as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB/s", bytes_per_sec as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
