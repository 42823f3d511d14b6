//! Configuration model for the scanner's remote filesystem.
//!
//! The `[scanner.remote_fs]` table selects a backend; `ftp` and `smb`
//! sub-tables carry the connection parameters for the remote variants.

pub mod paths;
pub mod remote;
pub mod types;

pub use remote::{AppConfig, FtpConfig, RemoteFsConfig, ScannerConfig, SmbConfig};
pub use types::Verbosity;
