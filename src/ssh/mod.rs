// SSH layer
pub mod client;
pub mod session;

pub use client::SshClient;
pub use session::SftpSession;
