// Download from an SFTP repository
use super::progress::ProgressTracker;
use super::remote::{RemoteFs, RemoteWalk};
use super::{copy_chunks, TransferSummary};
use crate::utils::error::TransferError;
use anyhow::Result;
use std::fs::{self, File};
use std::path::Path;

/// Copies one remote file to `local_path`. `size`, when the caller already
/// knows it, sizes the progress bar.
pub fn download_file<F: RemoteFs + ?Sized>(
    sftp: &F,
    remote_path: &Path,
    local_path: &Path,
    size: Option<u64>,
) -> Result<u64> {
    let remote_display = remote_path.display().to_string();

    let mut remote_file = sftp
        .open(remote_path)
        .map_err(|e| TransferError::transfer(remote_display.clone(), e))?;
    let mut local_file = File::create(local_path)
        .map_err(|e| TransferError::transfer(local_path.display().to_string(), e))?;

    let progress = ProgressTracker::new(size.unwrap_or(0), &format!("Downloading {}", remote_display));
    let bytes = copy_chunks(&mut remote_file, &mut local_file, &progress)
        .map_err(|e| TransferError::transfer(remote_display.clone(), e))?;
    progress.finish();

    log::info!("Downloaded file '{}' ({} bytes)", remote_display, bytes);
    Ok(bytes)
}

/// Mirrors the remote tree at `remote_root` under `local_root`.
///
/// `local_root` and its parents are created up front. The walk is
/// pre-order, so every directory is created before anything inside it.
pub fn download_directory<F: RemoteFs + ?Sized>(
    sftp: &F,
    remote_root: &Path,
    local_root: &Path,
) -> Result<TransferSummary> {
    fs::create_dir_all(local_root)
        .map_err(|e| TransferError::transfer(local_root.display().to_string(), e))?;
    log::info!("Created directory '{}'", local_root.display());

    let mut summary = TransferSummary {
        directories: 1,
        ..TransferSummary::default()
    };

    for entry in RemoteWalk::new(sftp, remote_root) {
        let entry = entry?;
        let relative = match entry.path.strip_prefix(remote_root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            _ => continue,
        };
        let local_path = local_root.join(relative);

        if entry.is_dir {
            fs::create_dir_all(&local_path)
                .map_err(|e| TransferError::transfer(local_path.display().to_string(), e))?;
            summary.directories += 1;
            log::info!("Created directory '{}'", local_path.display());
        } else {
            summary.bytes += download_file(sftp, &entry.path, &local_path, entry.size)?;
            summary.files += 1;
        }
    }

    Ok(summary)
}

/// Downloads `remote_path` to `local_path`, recursing if it is a directory.
pub fn download<F: RemoteFs + ?Sized>(sftp: &F, remote_path: &Path, local_path: &Path) -> Result<TransferSummary> {
    let stat = sftp
        .stat(remote_path)
        .map_err(|e| TransferError::from_stat(remote_path.display().to_string(), e))?;

    if stat.is_dir {
        download_directory(sftp, remote_path, local_path)
    } else {
        let bytes = download_file(sftp, remote_path, local_path, stat.size)?;
        Ok(TransferSummary {
            files: 1,
            bytes,
            ..TransferSummary::default()
        })
    }
}
