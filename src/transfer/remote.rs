// Remote filesystem seam and tree walker
use crate::utils::error::TransferError;
use ssh2::{FileStat, Sftp};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: Option<u64>,
}

impl RemoteEntry {
    fn from_stat(path: PathBuf, stat: &FileStat) -> Self {
        RemoteEntry {
            path,
            is_dir: stat.is_dir(),
            size: stat.size,
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// The subset of SFTP the transfer algorithms need.
pub trait RemoteFs {
    fn stat(&self, path: &Path) -> io::Result<RemoteEntry>;

    /// Children of `path` (never `.` or `..`), with full paths, in server order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<RemoteEntry>>;

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Creates or truncates `path`.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    fn mkdir(&self, path: &Path, mode: i32) -> io::Result<()>;
}

impl RemoteFs for Sftp {
    fn stat(&self, path: &Path) -> io::Result<RemoteEntry> {
        let stat = Sftp::stat(self, path)?;
        Ok(RemoteEntry::from_stat(path.to_path_buf(), &stat))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<RemoteEntry>> {
        let entries = Sftp::readdir(self, path)?;
        Ok(entries
            .into_iter()
            .map(|(path, stat)| RemoteEntry::from_stat(path, &stat))
            .collect())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let file = Sftp::open(self, path)?;
        Ok(Box::new(file))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let file = Sftp::create(self, path)?;
        Ok(Box::new(file))
    }

    fn mkdir(&self, path: &Path, mode: i32) -> io::Result<()> {
        Sftp::mkdir(self, path, mode)?;
        Ok(())
    }
}

/// Pre-order traversal of a remote tree, root first, children in the order
/// the server lists them.
pub struct RemoteWalk<'a, F: RemoteFs + ?Sized> {
    fs: &'a F,
    root: Option<PathBuf>,
    stack: Vec<RemoteEntry>,
}

impl<'a, F: RemoteFs + ?Sized> RemoteWalk<'a, F> {
    pub fn new<P: AsRef<Path>>(fs: &'a F, root: P) -> Self {
        RemoteWalk {
            fs,
            root: Some(root.as_ref().to_path_buf()),
            stack: Vec::new(),
        }
    }

    fn fail(&mut self, path: &Path, source: io::Error) -> Option<Result<RemoteEntry, TransferError>> {
        self.stack.clear();
        Some(Err(TransferError::WalkFailure {
            path: path.display().to_string(),
            source,
        }))
    }
}

impl<'a, F: RemoteFs + ?Sized> Iterator for RemoteWalk<'a, F> {
    type Item = Result<RemoteEntry, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            match self.fs.stat(&root) {
                Ok(entry) => self.stack.push(entry),
                Err(e) => return self.fail(&root, e),
            }
        }

        let entry = self.stack.pop()?;
        if entry.is_dir {
            match self.fs.read_dir(&entry.path) {
                Ok(children) => self.stack.extend(children.into_iter().rev()),
                Err(e) => return self.fail(&entry.path, e),
            }
        }
        Some(Ok(entry))
    }
}
