// Local and network-share repositories
use super::{sorted, Entry, Repository};
use crate::transfer::{copy_recursive, TransferSummary};
use crate::utils::error::TransferError;
use crate::utils::file::{ensure_parent_dir, join_under, resolve_path};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let root = if path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            path.to_path_buf()
        };
        LocalRepository { root }
    }

    fn directory_metadata(path: &Path) -> Result<fs::Metadata, TransferError> {
        let metadata =
            fs::metadata(path).map_err(|e| TransferError::from_stat(path.display().to_string(), e))?;
        if !metadata.is_dir() {
            return Err(TransferError::NotADirectory {
                path: path.display().to_string(),
            });
        }
        Ok(metadata)
    }
}

impl Repository for LocalRepository {
    fn list(&self) -> Result<Vec<Entry>> {
        Self::directory_metadata(&self.root)?;

        let read_err = |e: std::io::Error| TransferError::transfer(self.root.display().to_string(), e);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            // symlinks are not followed, matching what SFTP readdir reports
            let is_dir = entry.file_type().map_err(read_err)?.is_dir();
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(sorted(entries))
    }

    fn stat(&self, name: &str) -> Result<Entry> {
        let path = join_under(&self.root, name);
        let metadata =
            fs::metadata(&path).map_err(|e| TransferError::from_stat(path.display().to_string(), e))?;
        Ok(Entry {
            name: name.to_string(),
            is_dir: metadata.is_dir(),
        })
    }

    fn change_directory(&self, dir: &str) -> Result<String> {
        let target = resolve_path(&self.root, dir);
        Self::directory_metadata(&target)?;
        Ok(target.display().to_string())
    }

    fn get(&self, name: &str, destination: &Path) -> Result<TransferSummary> {
        let source = join_under(&self.root, name);
        self.stat(name)?;
        ensure_parent_dir(destination)?;
        log::debug!("Copying '{}' -> '{}'", source.display(), destination.display());
        copy_recursive(&source, destination)
    }

    fn put(&self, source: &Path, name: &str) -> Result<TransferSummary> {
        let destination = join_under(&self.root, name);
        ensure_parent_dir(&destination)?;
        log::debug!("Copying '{}' -> '{}'", source.display(), destination.display());
        copy_recursive(source, &destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seeded() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hi").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "bee").unwrap();
        dir
    }

    #[test]
    fn list_marks_directories() {
        let dir = seeded();
        let repo = LocalRepository::new(dir.path());
        let names: Vec<String> = repo.list().unwrap().iter().map(|e| e.to_string()).collect();
        assert_eq!(names, vec!["a.txt", "sub/"]);
    }

    #[cfg(unix)]
    #[test]
    fn list_does_not_follow_symlinks() {
        let dir = seeded();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("link")).unwrap();

        let repo = LocalRepository::new(dir.path());
        let names: Vec<String> = repo.list().unwrap().iter().map(|e| e.to_string()).collect();
        assert_eq!(names, vec!["a.txt", "link", "sub/"]);
    }

    #[test]
    fn list_of_file_is_not_a_directory() {
        let dir = seeded();
        let repo = LocalRepository::new(dir.path().join("a.txt"));
        let err = repo.list().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransferError>(),
            Some(TransferError::NotADirectory { .. })
        ));
    }

    #[test]
    fn change_directory_validates() {
        let dir = seeded();
        let repo = LocalRepository::new(dir.path());

        let sub = repo.change_directory("sub").unwrap();
        assert_eq!(PathBuf::from(&sub), dir.path().join("sub"));

        let back = LocalRepository::new(&sub).change_directory("..").unwrap();
        assert_eq!(PathBuf::from(back), dir.path().to_path_buf());

        let err = repo.change_directory("nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransferError>(),
            Some(TransferError::PathNotFound { .. })
        ));

        let err = repo.change_directory("a.txt").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransferError>(),
            Some(TransferError::NotADirectory { .. })
        ));
    }

    #[test]
    fn get_and_put_round_trip() {
        let dir = seeded();
        let repo = LocalRepository::new(dir.path());
        let work = tempdir().unwrap();

        repo.get("sub", &work.path().join("sub")).unwrap();
        assert_eq!(fs::read_to_string(work.path().join("sub/b.txt")).unwrap(), "bee");

        fs::write(work.path().join("new.txt"), "fresh").unwrap();
        let summary = repo.put(&work.path().join("new.txt"), "incoming/new.txt").unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(fs::read_to_string(dir.path().join("incoming/new.txt")).unwrap(), "fresh");
    }

    #[test]
    fn get_missing_is_path_not_found() {
        let dir = seeded();
        let work = tempdir().unwrap();
        let err = LocalRepository::new(dir.path())
            .get("ghost", &work.path().join("ghost"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransferError>(),
            Some(TransferError::PathNotFound { .. })
        ));
    }
}
