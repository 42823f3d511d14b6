//! SMB transport seam.
//!
//! Two independent surfaces, each opened lazily by `SmbFileSystem`:
//! - `connect_tree`: the connection -> session -> share-tree handshake.
//! - `register_session`: the client session that drives scans and stats.
//!
//! Paths crossing this seam are UNC paths (`\\host\share\dir`).

use crate::config::SmbConfig;
use crate::error::FsError;

/// One directory entry returned by `scandir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmbDirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Result of a `stat` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmbMetadata {
    pub size: u64,
    pub is_dir: bool,
}

/// An established share tree.
pub trait SmbTree: Send {
    /// UNC path of the connected share.
    fn share_unc(&self) -> &str;

    fn disconnect(&mut self) -> Result<(), FsError>;
}

/// A registered client session used for directory scans and metadata queries.
pub trait SmbScanClient: Send {
    fn scandir(&mut self, unc: &str) -> Result<Vec<SmbDirEntry>, FsError>;

    fn stat(&mut self, unc: &str) -> Result<SmbMetadata, FsError>;
}

pub trait SmbTransport: Send {
    fn connect_tree(&self, config: &SmbConfig) -> Result<Box<dyn SmbTree>, FsError>;

    fn register_session(&self, config: &SmbConfig) -> Result<Box<dyn SmbScanClient>, FsError>;
}

/// Transport for builds without an SMB client.
///
/// Construction succeeds; every connection attempt reports the missing
/// transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTransport;

impl UnavailableTransport {
    fn error() -> FsError {
        FsError::TransportUnavailable {
            protocol: "smb",
            reason: "SMB support on Linux/macOS requires the 'smbclient' feature flag \
                     (libsmbclient). Rebuild with: cargo build --features smbclient"
                .to_string(),
        }
    }
}

impl SmbTransport for UnavailableTransport {
    fn connect_tree(&self, _config: &SmbConfig) -> Result<Box<dyn SmbTree>, FsError> {
        Err(Self::error())
    }

    fn register_session(&self, _config: &SmbConfig) -> Result<Box<dyn SmbScanClient>, FsError> {
        Err(Self::error())
    }
}

/// The transport this build supports best.
///
/// - Windows: native UNC access through the OS SMB client.
/// - Unix with the `smbclient` feature: libsmbclient via `pavao`.
/// - Otherwise: `UnavailableTransport`.
#[cfg(windows)]
pub fn default_transport() -> Box<dyn SmbTransport> {
    Box::new(super::native::NativeTransport)
}

#[cfg(all(unix, feature = "smbclient"))]
pub fn default_transport() -> Box<dyn SmbTransport> {
    Box::new(super::smbclient::LibSmbTransport)
}

#[cfg(not(any(windows, all(unix, feature = "smbclient"))))]
pub fn default_transport() -> Box<dyn SmbTransport> {
    Box::new(UnavailableTransport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_transport_reports_missing_client() {
        let config = SmbConfig::new("nas", "media");
        match UnavailableTransport.register_session(&config) {
            Err(FsError::TransportUnavailable { protocol, reason }) => {
                assert_eq!(protocol, "smb");
                assert!(reason.contains("smbclient"));
            }
            Err(other) => panic!("Expected TransportUnavailable, got {:?}", other),
            Ok(_) => panic!("Expected error, got Ok"),
        }
        assert!(UnavailableTransport.connect_tree(&config).is_err());
    }
}
