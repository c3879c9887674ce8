// Local recursive copy
use super::TransferSummary;
use crate::utils::error::TransferError;
use anyhow::Result;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Copies `src` (file or directory tree) to `dst`.
///
/// Directories are created with the source's permission bits, or reused if
/// they already exist; files are truncated and overwritten. The first
/// failure aborts the copy and leaves whatever was already copied in place.
/// Copying a path onto itself, or a directory into itself, fails before
/// anything is written.
pub fn copy_recursive<S: AsRef<Path>, D: AsRef<Path>>(src: S, dst: D) -> Result<TransferSummary> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    check_distinct(src, dst)?;

    let mut summary = TransferSummary::default();
    copy_entry(src, dst, &mut summary)?;
    Ok(summary)
}

fn check_distinct(src: &Path, dst: &Path) -> Result<(), TransferError> {
    // a missing source is reported by copy_entry
    let Ok(real_src) = fs::canonicalize(src) else {
        return Ok(());
    };
    let Some(real_dst) = canonical_destination(dst) else {
        return Ok(());
    };

    let reason = if real_dst == real_src {
        "source and destination are the same"
    } else if real_dst.starts_with(&real_src) {
        "cannot copy a directory into itself"
    } else {
        return Ok(());
    };
    Err(TransferError::transfer(
        dst.display().to_string(),
        io::Error::new(io::ErrorKind::InvalidInput, reason),
    ))
}

/// Canonical form of `dst`, which may not exist yet as long as its parent does.
fn canonical_destination(dst: &Path) -> Option<PathBuf> {
    if let Ok(real) = fs::canonicalize(dst) {
        return Some(real);
    }
    let name = dst.file_name()?;
    let parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|real| real.join(name))
}

fn copy_entry(src: &Path, dst: &Path, summary: &mut TransferSummary) -> Result<(), TransferError> {
    let metadata =
        fs::metadata(src).map_err(|e| TransferError::from_stat(src.display().to_string(), e))?;

    if metadata.is_dir() {
        create_dir_like(dst, &metadata)
            .map_err(|e| TransferError::transfer(dst.display().to_string(), e))?;
        summary.directories += 1;
        log::debug!("Created directory '{}'", dst.display());

        let entries =
            fs::read_dir(src).map_err(|e| TransferError::transfer(src.display().to_string(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| TransferError::transfer(src.display().to_string(), e))?;
            let name = entry.file_name();
            copy_entry(&src.join(&name), &dst.join(&name), summary)?;
        }
    } else {
        let bytes = copy_file(src, dst)?;
        summary.files += 1;
        summary.bytes += bytes;
        log::debug!("Copied '{}' -> '{}' ({} bytes)", src.display(), dst.display(), bytes);
    }

    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<u64, TransferError> {
    let mut reader =
        File::open(src).map_err(|e| TransferError::transfer(src.display().to_string(), e))?;
    let mut writer =
        File::create(dst).map_err(|e| TransferError::transfer(dst.display().to_string(), e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| TransferError::transfer(dst.display().to_string(), e))
}

#[cfg(unix)]
fn create_dir_like(dst: &Path, source: &fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    if dst.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new()
        .recursive(true)
        .mode(source.permissions().mode() & 0o7777)
        .create(dst)
}

#[cfg(not(unix))]
fn create_dir_like(dst: &Path, _source: &fs::Metadata) -> io::Result<()> {
    fs::create_dir_all(dst)
}
