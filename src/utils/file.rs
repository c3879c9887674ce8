// Path helpers shared by the local and remote backends
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Lexically removes `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped; `..` on a relative path with nothing left to
/// pop is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    let normalized: PathBuf = parts.iter().collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Appends `name` below `base` and cleans the result. A leading `/` in
/// `name` is treated as relative, so the result stays rooted at `base`.
pub fn join_under(base: &Path, name: &str) -> PathBuf {
    let relative = name.trim_start_matches(['/', '\\']);
    normalize(&base.join(relative))
}

/// Resolves a path argument against `base`: absolute paths replace it,
/// relative ones are joined. The result is lexically cleaned.
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Cleans a slash-separated remote path. An empty path becomes `.`.
pub fn clean_remote(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Remote counterpart of [`join_under`].
pub fn remote_join_under(base: &str, name: &str) -> String {
    let base = if base.is_empty() { "." } else { base };
    clean_remote(&format!("{}/{}", base, name.trim_start_matches('/')))
}

/// Remote counterpart of [`resolve_path`].
pub fn remote_resolve_path(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        clean_remote(path)
    } else {
        let base = if base.is_empty() { "." } else { base };
        clean_remote(&format!("{}/{}", base, path))
    }
}
