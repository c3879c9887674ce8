// SSH client wrapper
use crate::config::{AuthMethod, RepositoryConfig};
use crate::utils::error::TransferError;
use anyhow::Result;
use ssh2::Session;
use std::net::TcpStream;

pub struct SshClient {
    pub session: Session,
    address: String,
}

impl SshClient {
    /// Connects and authenticates. The server host key is not checked
    /// against any known_hosts file, so every host key is accepted.
    pub fn connect(repo: &RepositoryConfig) -> Result<Self> {
        let address = repo.address();
        let auth = repo.auth_method()?;
        log::debug!("Connecting to {}...", address);

        let connection_failure = |message: String| TransferError::ConnectionFailure {
            address: address.clone(),
            message,
        };

        let tcp = TcpStream::connect(&address).map_err(|e| connection_failure(e.to_string()))?;

        let mut session = Session::new().map_err(|e| connection_failure(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| connection_failure(format!("SSH handshake failed: {}", e)))?;

        log::debug!("SSH handshake completed. Authenticating as {}...", repo.user);

        let outcome = match &auth {
            AuthMethod::Password(password) => session.userauth_password(&repo.user, password),
            AuthMethod::PublicKey(key_path) => {
                log::debug!("Using private key {}", key_path.display());
                session.userauth_pubkey_file(&repo.user, None, key_path, None)
            }
        };
        if let Err(e) = outcome {
            log::debug!("Authentication error: {}", e);
        }

        if !session.authenticated() {
            return Err(TransferError::AuthenticationFailed {
                user: repo.user.clone(),
                address,
            }
            .into());
        }

        log::info!("Connected to {}@{}", repo.user, address);
        Ok(SshClient { session, address })
    }

    pub fn sftp(&self) -> Result<ssh2::Sftp> {
        self.session
            .sftp()
            .map_err(|e| TransferError::SessionFailure(e).into())
    }
}

impl Drop for SshClient {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "closing", None) {
            log::debug!("Disconnect from {} failed: {}", self.address, e);
        }
    }
}
