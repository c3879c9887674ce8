// Repository backends
pub mod local;
pub mod ssh;

use crate::config::{RepositoryConfig, RepositoryKind};
use crate::transfer::TransferSummary;
use anyhow::Result;
use std::fmt;
use std::path::Path;

pub use local::LocalRepository;
pub use ssh::SshRepository;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "{}/", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Operations every repository type supports. Paths named by the caller
/// are relative to the repository's stored path.
pub trait Repository {
    /// Entries of the stored path, sorted by name.
    fn list(&self) -> Result<Vec<Entry>>;

    fn stat(&self, name: &str) -> Result<Entry>;

    /// Validates `dir` as an existing directory and returns the path to
    /// store. Nothing is changed on either side.
    fn change_directory(&self, dir: &str) -> Result<String>;

    /// Copies `name` out of the repository to the local `destination`.
    fn get(&self, name: &str, destination: &Path) -> Result<TransferSummary>;

    /// Copies the local `source` into the repository as `name`.
    fn put(&self, source: &Path, name: &str) -> Result<TransferSummary>;
}

/// `network` repositories are mounted shares and go through the local backend.
pub fn open(config: &RepositoryConfig) -> Box<dyn Repository + '_> {
    match config.kind {
        RepositoryKind::Local | RepositoryKind::Network => Box::new(LocalRepository::new(&config.path)),
        RepositoryKind::Ssh => Box::new(SshRepository::new(config)),
    }
}

fn sorted(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort();
    entries
}
