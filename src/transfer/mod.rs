// Transfer engine
pub mod download;
pub mod local;
pub mod progress;
pub mod remote;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

use progress::ProgressTracker;
use std::io::{self, Read, Write};

pub use local::copy_recursive;
pub use remote::{RemoteEntry, RemoteFs, RemoteWalk};

pub const CHUNK_SIZE: usize = 256 * 1024;

/// What a mirroring operation created before it returned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub directories: u64,
    pub files: u64,
    pub bytes: u64,
}

impl TransferSummary {
    pub fn merge(&mut self, other: TransferSummary) {
        self.directories += other.directories;
        self.files += other.files;
        self.bytes += other.bytes;
    }
}

impl std::fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} file(s), {} director{}, {} bytes",
            self.files,
            self.directories,
            if self.directories == 1 { "y" } else { "ies" },
            self.bytes
        )
    }
}

/// Streams `reader` into `writer` in fixed chunks, reporting to `progress`.
pub(crate) fn copy_chunks<R, W>(reader: &mut R, writer: &mut W, progress: &ProgressTracker) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(bytes_read) => {
                if let Err(e) = writer.write_all(&buffer[..bytes_read]) {
                    progress.finish_with_error(&e.to_string());
                    return Err(e);
                }
                progress.add_bytes(bytes_read as u64);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                progress.finish_with_error(&e.to_string());
                return Err(e);
            }
        }
    }
    writer.flush()?;
    Ok(progress.transferred())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_chunks_moves_every_byte() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        let mut out = Vec::new();
        let progress = ProgressTracker::new(data.len() as u64, "test");
        let copied = copy_chunks(&mut data.as_slice(), &mut out, &progress).unwrap();
        assert_eq!(copied, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn summary_display() {
        let mut summary = TransferSummary {
            directories: 1,
            files: 2,
            bytes: 10,
        };
        assert_eq!(summary.to_string(), "2 file(s), 1 directory, 10 bytes");
        summary.merge(summary);
        assert_eq!(summary.to_string(), "4 file(s), 2 directories, 20 bytes");
    }
}
