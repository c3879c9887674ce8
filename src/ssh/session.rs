// One authenticated connection plus its SFTP channel, scoped to a single operation
use crate::config::RepositoryConfig;
use crate::ssh::SshClient;
use anyhow::Result;
use ssh2::Sftp;

pub struct SftpSession {
    // declared first so the channel closes before the connection
    pub sftp: Sftp,
    pub client: SshClient,
}

impl SftpSession {
    pub fn open(repo: &RepositoryConfig) -> Result<Self> {
        let client = SshClient::connect(repo)?;
        let sftp = client.sftp()?;
        Ok(SftpSession { sftp, client })
    }
}
