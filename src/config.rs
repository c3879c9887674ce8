// Repository configuration store
use crate::utils::error::TransferError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    Local,
    Network,
    Ssh,
}

impl std::fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RepositoryKind::Local => "local",
            RepositoryKind::Network => "network",
            RepositoryKind::Ssh => "ssh",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(rename = "type")]
    pub kind: RepositoryKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Password(String),
    PublicKey(PathBuf),
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TransferError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|source| TransferError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!(
            "Loaded {} repositories from {}",
            config.repositories.len(),
            path.display()
        );
        Ok(config)
    }

    /// Writes the canonical form: two-space indent, repositories by name.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_io = |source: std::io::Error| TransferError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(config_io)?;
            }
        }

        // write to a sibling file, then rename over the target
        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, json).map_err(config_io)?;
        fs::rename(&staging, path).map_err(config_io)?;

        log::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn repository(&self, name: &str) -> Result<&RepositoryConfig> {
        self.repositories.get(name).ok_or_else(|| {
            TransferError::RepositoryNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn current_repository(&self) -> Result<(&str, &RepositoryConfig)> {
        if self.current.is_empty() {
            return Err(TransferError::NoCurrentRepository.into());
        }
        let repo = self.repository(&self.current)?;
        Ok((self.current.as_str(), repo))
    }

    pub fn current_repository_mut(&mut self) -> Result<&mut RepositoryConfig> {
        if self.current.is_empty() {
            return Err(TransferError::NoCurrentRepository.into());
        }
        let name = self.current.clone();
        self.repositories
            .get_mut(&name)
            .ok_or_else(|| TransferError::RepositoryNotFound { name }.into())
    }

    pub fn set_current(&mut self, name: &str) -> Result<()> {
        self.repository(name)?;
        self.current = name.to_string();
        Ok(())
    }
}

impl RepositoryConfig {
    pub fn local<P: Into<String>>(path: P) -> Self {
        RepositoryConfig {
            kind: RepositoryKind::Local,
            path: path.into(),
            host: String::new(),
            port: None,
            user: String::new(),
            private_key: String::new(),
            password: String::new(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port())
    }

    /// Password wins when both credentials are present.
    pub fn auth_method(&self) -> Result<AuthMethod> {
        if !self.password.is_empty() {
            return Ok(AuthMethod::Password(self.password.clone()));
        }

        if !self.private_key.is_empty() {
            return Ok(AuthMethod::PublicKey(expand_home(&self.private_key)?));
        }

        Err(TransferError::ConnectionFailure {
            address: self.address(),
            message: "repository has neither a password nor a private_key".to_string(),
        }
        .into())
    }
}

fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = home::home_dir().context("Cannot determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}
