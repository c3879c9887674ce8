// SSH/SFTP repositories
use super::{sorted, Entry, Repository};
use crate::config::RepositoryConfig;
use crate::ssh::SftpSession;
use crate::transfer::download::download;
use crate::transfer::upload::upload;
use crate::transfer::{RemoteFs, TransferSummary};
use crate::utils::error::TransferError;
use crate::utils::file::{ensure_parent_dir, remote_join_under, remote_resolve_path};
use anyhow::Result;
use std::path::Path;

/// Every operation opens its own connection and drops it before returning.
pub struct SshRepository<'a> {
    config: &'a RepositoryConfig,
}

impl<'a> SshRepository<'a> {
    pub fn new(config: &'a RepositoryConfig) -> Self {
        SshRepository { config }
    }

    fn base(&self) -> &str {
        if self.config.path.is_empty() {
            "."
        } else {
            &self.config.path
        }
    }

    fn connect(&self) -> Result<SftpSession> {
        SftpSession::open(self.config)
    }
}

impl Repository for SshRepository<'_> {
    fn list(&self) -> Result<Vec<Entry>> {
        let session = self.connect()?;
        list_remote(&session.sftp, self.base())
    }

    fn stat(&self, name: &str) -> Result<Entry> {
        let session = self.connect()?;
        stat_remote(&session.sftp, &remote_join_under(self.base(), name))
    }

    fn change_directory(&self, dir: &str) -> Result<String> {
        let session = self.connect()?;
        change_remote_directory(&session.sftp, self.base(), dir)
    }

    fn get(&self, name: &str, destination: &Path) -> Result<TransferSummary> {
        let session = self.connect()?;
        get_remote(&session.sftp, self.base(), name, destination)
    }

    fn put(&self, source: &Path, name: &str) -> Result<TransferSummary> {
        let session = self.connect()?;
        let remote = remote_join_under(self.base(), name);
        log::debug!("Uploading '{}' -> '{}'", source.display(), remote);
        upload(&session.sftp, source, Path::new(&remote))
    }
}

fn list_remote<F: RemoteFs + ?Sized>(sftp: &F, base: &str) -> Result<Vec<Entry>> {
    let dir = Path::new(base);
    let stat = sftp
        .stat(dir)
        .map_err(|e| TransferError::from_stat(base.to_string(), e))?;
    if !stat.is_dir {
        return Err(TransferError::NotADirectory {
            path: base.to_string(),
        }
        .into());
    }

    let entries = sftp
        .read_dir(dir)
        .map_err(|e| TransferError::transfer(base.to_string(), e))?;
    Ok(sorted(
        entries
            .into_iter()
            .map(|entry| Entry {
                name: entry.name(),
                is_dir: entry.is_dir,
            })
            .collect(),
    ))
}

fn stat_remote<F: RemoteFs + ?Sized>(sftp: &F, path: &str) -> Result<Entry> {
    let entry = sftp
        .stat(Path::new(path))
        .map_err(|e| TransferError::from_stat(path.to_string(), e))?;
    Ok(Entry {
        name: entry.name(),
        is_dir: entry.is_dir,
    })
}

fn change_remote_directory<F: RemoteFs + ?Sized>(sftp: &F, base: &str, dir: &str) -> Result<String> {
    let target = remote_resolve_path(base, dir);
    if !stat_remote(sftp, &target)?.is_dir {
        return Err(TransferError::NotADirectory { path: target }.into());
    }
    Ok(target)
}

fn get_remote<F: RemoteFs + ?Sized>(
    sftp: &F,
    base: &str,
    name: &str,
    destination: &Path,
) -> Result<TransferSummary> {
    let remote = remote_join_under(base, name);
    ensure_parent_dir(destination)?;
    log::debug!("Downloading '{}' -> '{}'", remote, destination.display());
    download(sftp, Path::new(&remote), destination)
}
