//! libsmbclient transport (Unix, `smbclient` feature) built on `pavao`.
//!
//! UNC paths from the backend are translated back to share-relative paths,
//! which is what libsmbclient expects once the share is part of the
//! credentials.
//!
//! libsmbclient has one context per process. The tree handle and the scan
//! client both hold a lease on the same `SmbClient` in `CONTEXT`, so one
//! server/share/credential set can be open at a time.

use std::fmt;

use pavao::{SmbClient, SmbCredentials, SmbDirentType, SmbOptions};

use super::context::{ContextLease, ContextSlot};
use super::transport::{SmbDirEntry, SmbMetadata, SmbScanClient, SmbTransport, SmbTree};
use crate::backend::path::{from_unc, is_navigation_entry, unc_root};
use crate::config::SmbConfig;
use crate::error::FsError;

/// Identity of the live libsmbclient context.
#[derive(Clone, PartialEq, Eq)]
struct ContextKey {
    host: String,
    port: u16,
    share: String,
    username: Option<String>,
    password: Option<String>,
}

impl From<&SmbConfig> for ContextKey {
    fn from(config: &SmbConfig) -> Self {
        ContextKey {
            host: config.host.clone(),
            port: config.port,
            share: config.share.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

// Never prints the password.
impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.username.as_deref().unwrap_or("guest"),
            self.host,
            self.port,
            self.share
        )
    }
}

static CONTEXT: ContextSlot<ContextKey, SmbClient> = ContextSlot::new();

type Lease = ContextLease<ContextKey, SmbClient>;

fn lease(config: &SmbConfig) -> Result<Lease, FsError> {
    CONTEXT.acquire(ContextKey::from(config), || open_client(config))
}

fn open_client(config: &SmbConfig) -> Result<SmbClient, FsError> {
    let mut credentials = SmbCredentials::default()
        .server(format!("smb://{}:{}", config.host, config.port))
        .share(format!("/{}", config.share));
    if let Some(user) = &config.username {
        credentials = credentials.username(user.as_str());
    }
    if let Some(password) = &config.password {
        credentials = credentials.password(password.as_str());
    }

    SmbClient::new(credentials, SmbOptions::default().one_share_per_server(true)).map_err(|e| {
        FsError::ConnectionFailed {
            protocol: "smb",
            host: config.host.clone(),
            reason: e.to_string(),
        }
    })
}

fn smb_err(op: &str, unc: &str, err: pavao::SmbError) -> FsError {
    FsError::ProtocolError(format!("SMB {} {} failed: {}", op, unc, err))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LibSmbTransport;

impl SmbTransport for LibSmbTransport {
    fn connect_tree(&self, config: &SmbConfig) -> Result<Box<dyn SmbTree>, FsError> {
        let lease = lease(config)?;
        // Listing the share root forces the session and tree connect. On
        // failure the lease is released; a live scan client keeps its own.
        lease
            .with_client(|client| client.list_dir("/"))?
            .map_err(|e| FsError::ConnectionFailed {
                protocol: "smb",
                host: config.host.clone(),
                reason: format!("tree connect to {} failed: {}", config.share, e),
            })?;
        Ok(Box::new(LibSmbTree {
            unc: unc_root(&config.host, &config.share),
            lease: Some(lease),
        }))
    }

    fn register_session(&self, config: &SmbConfig) -> Result<Box<dyn SmbScanClient>, FsError> {
        Ok(Box::new(LibSmbClient {
            lease: lease(config)?,
            host: config.host.clone(),
            share: config.share.clone(),
        }))
    }
}

struct LibSmbTree {
    unc: String,
    lease: Option<Lease>,
}

impl SmbTree for LibSmbTree {
    fn share_unc(&self) -> &str {
        &self.unc
    }

    fn disconnect(&mut self) -> Result<(), FsError> {
        self.lease.take();
        Ok(())
    }
}

/// Scan client: a lease on the shared context bound to one share.
struct LibSmbClient {
    lease: Lease,
    host: String,
    share: String,
}

impl LibSmbClient {
    fn share_path(&self, unc: &str) -> String {
        from_unc(&self.host, &self.share, unc)
    }
}

impl SmbScanClient for LibSmbClient {
    fn scandir(&mut self, unc: &str) -> Result<Vec<SmbDirEntry>, FsError> {
        let path = self.share_path(unc);
        let entries = self
            .lease
            .with_client(|client| client.list_dir(path.as_str()))?
            .map_err(|e| smb_err("scandir", unc, e))?;

        Ok(entries
            .iter()
            .filter(|e| !is_navigation_entry(e.name()))
            .filter_map(|e| match e.get_type() {
                SmbDirentType::Dir => Some(SmbDirEntry {
                    name: e.name().to_string(),
                    is_dir: true,
                }),
                SmbDirentType::File | SmbDirentType::Link => Some(SmbDirEntry {
                    name: e.name().to_string(),
                    is_dir: false,
                }),
                _ => None,
            })
            .collect())
    }

    fn stat(&mut self, unc: &str) -> Result<SmbMetadata, FsError> {
        let path = self.share_path(unc);
        let stat = self
            .lease
            .with_client(|client| client.stat(path.as_str()))?
            .map_err(|e| smb_err("stat", unc, e))?;
        Ok(SmbMetadata {
            size: stat.size,
            is_dir: stat.mode.is_dir(),
        })
    }
}
