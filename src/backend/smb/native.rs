//! Windows native SMB transport.
//!
//! Windows natively supports `\\server\share\path` access through the OS SMB
//! client, so the tree handshake and the scan session both reduce to UNC path
//! access through `std::fs`. Authentication uses the current user's session
//! or cached credentials; configured credentials and port are not applied.

use std::path::Path;

use super::transport::{SmbDirEntry, SmbMetadata, SmbScanClient, SmbTransport, SmbTree};
use crate::backend::path::{is_navigation_entry, unc_root};
use crate::config::SmbConfig;
use crate::error::FsError;

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeTransport;

struct NativeTree {
    unc: String,
}

struct NativeScanClient;

/// Map I/O errors to FsError with SMB-specific context.
fn map_smb_io_error(err: std::io::Error, unc: &str) -> FsError {
    match err.kind() {
        std::io::ErrorKind::NotFound => FsError::NotFound {
            path: unc.to_string(),
        },
        _ => FsError::ProtocolError(format!("SMB error accessing {}: {}", unc, err)),
    }
}

impl SmbTransport for NativeTransport {
    fn connect_tree(&self, config: &SmbConfig) -> Result<Box<dyn SmbTree>, FsError> {
        let unc = unc_root(&config.host, &config.share);
        // Reading the share root makes the OS complete its session setup now.
        std::fs::read_dir(&unc).map_err(|e| FsError::ConnectionFailed {
            protocol: "smb",
            host: config.host.clone(),
            reason: format!("cannot open share {}: {}", unc, e),
        })?;
        Ok(Box::new(NativeTree { unc }))
    }

    fn register_session(&self, config: &SmbConfig) -> Result<Box<dyn SmbScanClient>, FsError> {
        if config.username.is_some() || config.port != crate::config::remote::DEFAULT_SMB_PORT {
            tracing::debug!(
                "Native SMB transport uses the OS session; configured credentials/port for {} are ignored",
                config.host
            );
        }
        Ok(Box::new(NativeScanClient))
    }
}

impl SmbTree for NativeTree {
    fn share_unc(&self) -> &str {
        &self.unc
    }

    fn disconnect(&mut self) -> Result<(), FsError> {
        Ok(())
    }
}

impl SmbScanClient for NativeScanClient {
    fn scandir(&mut self, unc: &str) -> Result<Vec<SmbDirEntry>, FsError> {
        let read_dir = std::fs::read_dir(unc).map_err(|e| map_smb_io_error(e, unc))?;

        let mut entries = Vec::new();
        for entry_result in read_dir {
            let entry = entry_result.map_err(|e| map_smb_io_error(e, unc))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_navigation_entry(&name) {
                continue;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            entries.push(SmbDirEntry { name, is_dir });
        }
        Ok(entries)
    }

    fn stat(&mut self, unc: &str) -> Result<SmbMetadata, FsError> {
        let meta = std::fs::metadata(Path::new(unc)).map_err(|e| map_smb_io_error(e, unc))?;
        Ok(SmbMetadata {
            size: meta.len(),
            is_dir: meta.is_dir(),
        })
    }
}
