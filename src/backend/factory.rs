//! Backend selection from configuration or from a parsed URL.
//!
//! Construction never touches the network: remote backends connect on
//! first use.

use crate::backend::ftp::{FtpConnector, SuppaFtpConnector};
use crate::backend::smb::{default_transport, SmbTransport};
use crate::backend::{FileSystem, FtpFileSystem, LocalFileSystem, SmbFileSystem};
use crate::config::RemoteFsConfig;
use crate::error::FsError;
use crate::protocol::{BackendKind, Location};

const FTP_SECTION: &str = "scanner.remote_fs.ftp";
const SMB_SECTION: &str = "scanner.remote_fs.smb";

/// Wire clients handed to the remote backends the factory builds.
pub struct Transports {
    pub ftp: Box<dyn FtpConnector>,
    pub smb: Box<dyn SmbTransport>,
}

impl Default for Transports {
    fn default() -> Self {
        Transports {
            ftp: Box::new(SuppaFtpConnector),
            smb: default_transport(),
        }
    }
}

/// Create the backend selected by `scanner.remote_fs`.
///
/// - absent or `type = "local"` -> `LocalFileSystem`
/// - `ftp` -> `FtpFileSystem`, requires the `ftp` sub-table
/// - `smb` -> `SmbFileSystem`, requires the `smb` sub-table
/// - anything else -> `FsError::UnsupportedBackend`
pub fn create_filesystem(config: Option<&RemoteFsConfig>) -> Result<FileSystem, FsError> {
    create_filesystem_with(config, Transports::default())
}

/// `create_filesystem` with caller-supplied transports.
pub fn create_filesystem_with(
    config: Option<&RemoteFsConfig>,
    transports: Transports,
) -> Result<FileSystem, FsError> {
    let Some(config) = config else {
        return Ok(FileSystem::Local(LocalFileSystem::new()));
    };

    let kind = match config.kind.as_deref() {
        None => BackendKind::Local,
        Some(kind) => kind.parse::<BackendKind>()?,
    };

    match kind {
        BackendKind::Local => Ok(FileSystem::Local(LocalFileSystem::new())),
        BackendKind::Ftp => {
            let ftp = config.ftp.as_ref().ok_or(FsError::MissingSection {
                backend: "ftp",
                section: FTP_SECTION,
            })?;
            ftp.validate()?;
            tracing::debug!("Using FTP backend for {}:{}", ftp.host, ftp.port);
            Ok(FileSystem::Ftp(FtpFileSystem::with_connector(ftp.clone(), transports.ftp)))
        }
        BackendKind::Smb => {
            let smb = config.smb.as_ref().ok_or(FsError::MissingSection {
                backend: "smb",
                section: SMB_SECTION,
            })?;
            smb.validate()?;
            tracing::debug!("Using SMB backend for {}/{}", smb.host, smb.share);
            Ok(FileSystem::Smb(SmbFileSystem::with_transport(smb.clone(), transports.smb)))
        }
    }
}

/// Create the backend addressed by a parsed connection string.
pub fn create_filesystem_for(location: &Location) -> Result<FileSystem, FsError> {
    match location {
        Location::Local { .. } => Ok(FileSystem::Local(LocalFileSystem::new())),
        Location::Ftp { config, .. } => {
            config.validate()?;
            Ok(FileSystem::Ftp(FtpFileSystem::new(config.clone())))
        }
        Location::Smb { config } => {
            config.validate()?;
            Ok(FileSystem::Smb(SmbFileSystem::new(config.clone())))
        }
    }
}
