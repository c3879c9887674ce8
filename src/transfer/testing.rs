// RemoteFs backed by a temporary local directory, for tests
use super::remote::{RemoteEntry, RemoteFs};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct DirBackedFs {
    root: TempDir,
    fail_on: Option<String>,
    fail_read_dir_on: Option<String>,
}

impl DirBackedFs {
    pub fn new() -> Self {
        DirBackedFs {
            root: TempDir::new().unwrap(),
            fail_on: None,
            fail_read_dir_on: None,
        }
    }

    /// Any open or create of an entry with this file name fails.
    pub fn failing_on(name: &str) -> Self {
        DirBackedFs {
            fail_on: Some(name.to_string()),
            ..DirBackedFs::new()
        }
    }

    /// Listing a directory with this name fails.
    pub fn failing_read_dir_on(name: &str) -> Self {
        DirBackedFs {
            fail_read_dir_on: Some(name.to_string()),
            ..DirBackedFs::new()
        }
    }

    /// Local location backing a remote path; `/a/b` and `a/b` both map under the root.
    pub fn local<P: AsRef<Path>>(&self, remote: P) -> PathBuf {
        let relative: PathBuf = remote
            .as_ref()
            .components()
            .filter(|c| matches!(c, std::path::Component::Normal(_)))
            .collect();
        self.root.path().join(relative)
    }

    fn check(&self, path: &Path, fail_on: Option<&str>) -> io::Result<()> {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        match (fail_on, name) {
            (Some(fail), Some(name)) if fail == name => {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"))
            }
            _ => Ok(()),
        }
    }
}

impl RemoteFs for DirBackedFs {
    fn stat(&self, path: &Path) -> io::Result<RemoteEntry> {
        let meta = fs::metadata(self.local(path))?;
        Ok(RemoteEntry {
            path: path.to_path_buf(),
            is_dir: meta.is_dir(),
            size: Some(meta.len()),
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<RemoteEntry>> {
        self.check(path, self.fail_read_dir_on.as_deref())?;
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.local(path))? {
            let entry = entry?;
            let meta = entry.metadata()?;
            entries.push(RemoteEntry {
                path: path.join(entry.file_name()),
                is_dir: meta.is_dir(),
                size: Some(meta.len()),
            });
        }
        Ok(entries)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        self.check(path, self.fail_on.as_deref())?;
        Ok(Box::new(fs::File::open(self.local(path))?))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        self.check(path, self.fail_on.as_deref())?;
        Ok(Box::new(fs::File::create(self.local(path))?))
    }

    fn mkdir(&self, path: &Path, _mode: i32) -> io::Result<()> {
        fs::create_dir(self.local(path))
    }
}
