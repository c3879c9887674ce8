use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Cannot access configuration file {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Repository '{name}' not found")]
    RepositoryNotFound { name: String },

    #[error("No current repository selected, use 'set <repo>' first")]
    NoCurrentRepository,

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Failed to connect to {address}: {message}")]
    ConnectionFailure { address: String, message: String },

    #[error("Authentication failed for {user}@{address}")]
    AuthenticationFailed { user: String, address: String },

    #[error("Failed to open SFTP session")]
    SessionFailure(#[source] ssh2::Error),

    #[error("Transfer failed for {path}")]
    TransferFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error walking remote directory {path}")]
    WalkFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    MissingArgument(String),
}

impl TransferError {
    pub fn transfer<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        TransferError::TransferFailure {
            path: path.into(),
            source,
        }
    }

    /// Maps a failed stat into the path-level kind the caller reports.
    pub fn from_stat<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => TransferError::PathNotFound { path },
            _ => TransferError::TransferFailure { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn alternate_display_names_each_cause_once() {
        let err = anyhow::Error::from(TransferError::transfer(
            "x",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(format!("{:#}", err), "Transfer failed for x: denied");

        let err = anyhow::Error::from(TransferError::WalkFailure {
            path: "/data/sub".into(),
            source: io::Error::new(io::ErrorKind::Other, "gone"),
        });
        assert_eq!(format!("{:#}", err), "Error walking remote directory /data/sub: gone");
    }

    #[test]
    fn stat_errors_split_on_not_found() {
        let missing = TransferError::from_stat("a", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, TransferError::PathNotFound { .. }));
        let denied = TransferError::from_stat("a", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, TransferError::TransferFailure { .. }));
    }
}
