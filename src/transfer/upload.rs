// Upload to an SFTP repository
use super::progress::ProgressTracker;
use super::remote::RemoteFs;
use super::{copy_chunks, TransferSummary};
use crate::utils::error::TransferError;
use anyhow::Result;
use std::fs::{self, File};
use std::io;
use std::path::Path;

const REMOTE_DIR_MODE: i32 = 0o755;

pub fn upload_file<F: RemoteFs + ?Sized>(sftp: &F, local_path: &Path, remote_path: &Path) -> Result<u64> {
    let remote_display = remote_path.display().to_string();

    let mut local_file = File::open(local_path)
        .map_err(|e| TransferError::transfer(local_path.display().to_string(), e))?;
    let total = local_file.metadata().map(|m| m.len()).unwrap_or(0);
    let mut remote_file = sftp
        .create(remote_path)
        .map_err(|e| TransferError::transfer(remote_display.clone(), e))?;

    let progress = ProgressTracker::new(total, &format!("Uploading {}", local_path.display()));
    let bytes = copy_chunks(&mut local_file, &mut remote_file, &progress)
        .map_err(|e| TransferError::transfer(remote_display.clone(), e))?;
    progress.finish();

    log::info!("Uploaded file '{}' ({} bytes)", remote_display, bytes);
    Ok(bytes)
}

/// Creates `dir` unless it already exists as a directory.
fn ensure_remote_directory<F: RemoteFs + ?Sized>(sftp: &F, dir: &Path) -> Result<(), TransferError> {
    match sftp.stat(dir) {
        Ok(entry) if entry.is_dir => return Ok(()),
        Ok(_) => {
            return Err(TransferError::NotADirectory {
                path: dir.display().to_string(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(TransferError::transfer(dir.display().to_string(), e)),
    }

    sftp.mkdir(dir, REMOTE_DIR_MODE)
        .map_err(|e| TransferError::transfer(dir.display().to_string(), e))?;
    log::info!("Created remote directory '{}'", dir.display());
    Ok(())
}

/// Mirrors the local tree at `local_dir` under `remote_dir`, in local
/// listing order. The first failure aborts the upload.
pub fn upload_directory<F: RemoteFs + ?Sized>(
    sftp: &F,
    local_dir: &Path,
    remote_dir: &Path,
) -> Result<TransferSummary> {
    ensure_remote_directory(sftp, remote_dir)?;
    let mut summary = TransferSummary {
        directories: 1,
        ..TransferSummary::default()
    };

    let entries = fs::read_dir(local_dir)
        .map_err(|e| TransferError::transfer(local_dir.display().to_string(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| TransferError::transfer(local_dir.display().to_string(), e))?;
        let local_path = entry.path();
        let remote_path = remote_dir.join(entry.file_name());

        if local_path.is_dir() {
            summary.merge(upload_directory(sftp, &local_path, &remote_path)?);
        } else {
            summary.bytes += upload_file(sftp, &local_path, &remote_path)?;
            summary.files += 1;
        }
    }

    Ok(summary)
}

/// Uploads `local_path` to `remote_path`, recursing if it is a directory.
pub fn upload<F: RemoteFs + ?Sized>(sftp: &F, local_path: &Path, remote_path: &Path) -> Result<TransferSummary> {
    let metadata = fs::metadata(local_path)
        .map_err(|e| TransferError::from_stat(local_path.display().to_string(), e))?;

    if metadata.is_dir() {
        upload_directory(sftp, local_path, remote_path)
    } else {
        let bytes = upload_file(sftp, local_path, remote_path)?;
        Ok(TransferSummary {
            files: 1,
            bytes,
            ..TransferSummary::default()
        })
    }
}
