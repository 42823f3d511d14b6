//! SMB/CIFS share backend.
//!
//! Two lazily opened surfaces sit behind `SmbTransport`: the share-tree
//! handshake (`connect`) and the scan client session used by `walk` and the
//! probes. Logical paths are share-relative and forward-slashed; the
//! transport sees UNC paths.

mod context;
#[cfg(windows)]
pub mod native;
#[cfg(all(unix, feature = "smbclient"))]
pub mod smbclient;
pub mod transport;

use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::backend::path::{from_unc, is_navigation_entry, join_forward, to_unc};
use crate::backend::{RemoteFileSystem, WalkEntry};
use crate::config::SmbConfig;
use crate::error::FsError;

pub use transport::{
    default_transport, SmbDirEntry, SmbMetadata, SmbScanClient, SmbTransport, SmbTree,
    UnavailableTransport,
};

/// SMB implementation of `RemoteFileSystem`.
pub struct SmbFileSystem {
    config: SmbConfig,
    transport: Box<dyn SmbTransport>,
    tree: Option<Box<dyn SmbTree>>,
    client: Option<Box<dyn SmbScanClient>>,
}

impl fmt::Debug for SmbFileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmbFileSystem")
            .field("host", &self.config.host)
            .field("share", &self.config.share)
            .field("port", &self.config.port)
            .field("tree_connected", &self.tree.is_some())
            .field("session_registered", &self.client.is_some())
            .finish()
    }
}

impl SmbFileSystem {
    /// Create a backend using the platform's default transport.
    pub fn new(config: SmbConfig) -> Self {
        Self::with_transport(config, default_transport())
    }

    pub fn with_transport(config: SmbConfig, transport: Box<dyn SmbTransport>) -> Self {
        SmbFileSystem {
            config,
            transport,
            tree: None,
            client: None,
        }
    }

    pub fn config(&self) -> &SmbConfig {
        &self.config
    }

    /// Configured share-relative base path.
    pub fn base_path(&self) -> &str {
        &self.config.path
    }

    pub fn is_tree_connected(&self) -> bool {
        self.tree.is_some()
    }

    pub fn is_session_registered(&self) -> bool {
        self.client.is_some()
    }

    /// UNC path for a share-relative logical path.
    pub fn unc_path(&self, path: &str) -> String {
        to_unc(&self.config.host, &self.config.share, path)
    }

    /// Logical path for a UNC path under this share.
    pub fn logical_path(&self, unc: &str) -> String {
        from_unc(&self.config.host, &self.config.share, unc)
    }

    /// The share tree, performing the session/tree handshake if needed.
    pub fn tree(&mut self) -> Result<&mut dyn SmbTree, FsError> {
        if self.tree.is_none() {
            tracing::info!("Connecting to SMB server {}:{}", self.config.host, self.config.port);
            let tree = self.transport.connect_tree(&self.config)?;
            tracing::info!("SMB connected: {}/{}", self.config.host, self.config.share);
            self.tree = Some(tree);
        }
        match self.tree.as_deref_mut() {
            Some(tree) => Ok(tree),
            None => Err(FsError::ProtocolError("SMB tree is not connected".to_string())),
        }
    }

    /// The scan client session, registering it if needed.
    fn client(&mut self) -> Result<&mut dyn SmbScanClient, FsError> {
        if self.client.is_none() {
            tracing::info!(
                "Registering SMB session {}@{}:{}",
                self.config.username.as_deref().unwrap_or("guest"),
                self.config.host,
                self.config.port
            );
            self.client = Some(self.transport.register_session(&self.config)?);
        }
        match self.client.as_deref_mut() {
            Some(client) => Ok(client),
            None => Err(FsError::ProtocolError("SMB session is not registered".to_string())),
        }
    }

    fn stat(&mut self, path: &str) -> Result<SmbMetadata, FsError> {
        let unc = self.unc_path(path);
        self.client()?.stat(&unc)
    }
}

impl RemoteFileSystem for SmbFileSystem {
    type Walk<'a> = SmbWalk<'a>;

    fn walk<'a>(&'a mut self, path: &str) -> SmbWalk<'a> {
        let root = self.unc_path(path);
        SmbWalk {
            fs: self,
            frontier: VecDeque::from([root]),
            visited: HashSet::new(),
            done: false,
        }
    }

    fn get_size(&mut self, path: &str) -> u64 {
        match self.stat(path) {
            Ok(meta) => meta.size,
            Err(e) => {
                tracing::debug!("SMB size probe for {} failed: {}", path, e);
                0
            }
        }
    }

    fn exists(&mut self, path: &str) -> bool {
        match self.stat(path) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("SMB exists probe for {} failed: {}", path, e);
                false
            }
        }
    }

    fn is_dir(&mut self, path: &str) -> bool {
        match self.stat(path) {
            Ok(meta) => meta.is_dir,
            Err(e) => {
                tracing::debug!("SMB is_dir probe for {} failed: {}", path, e);
                false
            }
        }
    }

    fn join(&self, segments: &[&str]) -> String {
        join_forward(segments)
    }

    fn connect(&mut self) -> Result<(), FsError> {
        let unc = self.tree()?.share_unc().to_string();
        self.client()?;
        tracing::debug!("SMB share {} ready", unc);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut tree) = self.tree.take() {
            if let Err(e) = tree.disconnect() {
                tracing::debug!("SMB tree disconnect failed (ignored): {}", e);
            }
        }
        self.client = None;
    }
}

/// Breadth-first SMB walk over UNC paths. Borrows the backend for its lifetime.
pub struct SmbWalk<'a> {
    fs: &'a mut SmbFileSystem,
    frontier: VecDeque<String>,
    visited: HashSet<String>,
    done: bool,
}

impl Iterator for SmbWalk<'_> {
    type Item = Result<WalkEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Err(e) = self.fs.client() {
            self.done = true;
            self.frontier.clear();
            return Some(Err(e));
        }

        while let Some(dir) = self.frontier.pop_front() {
            if !self.visited.insert(dir.to_ascii_lowercase()) {
                continue;
            }
            let listed = match self.fs.client() {
                Ok(client) => client.scandir(&dir),
                Err(e) => Err(e),
            };
            let entries = match listed {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("Cannot scan SMB directory {}: {}", dir, e);
                    continue;
                }
            };

            let mut triple = WalkEntry::new(self.fs.logical_path(&dir));
            for entry in entries {
                if is_navigation_entry(&entry.name) {
                    continue;
                }
                if entry.is_dir {
                    self.frontier.push_back(format!("{}\\{}", dir, entry.name));
                    triple.dirnames.push(entry.name);
                } else {
                    triple.filenames.push(entry.name);
                }
            }
            return Some(Ok(triple));
        }

        self.done = true;
        None
    }
}
