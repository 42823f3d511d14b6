//! FTP backend.
//!
//! Holds at most one control connection, opened on the first I/O call and
//! reused until `close()`. `walk` is breadth-first over an explicit frontier
//! and lists each directory with MLSD, falling back to NLST plus `CWD` probes.
//! Walked directories are reported by the absolute path the server gives for
//! them in `PWD`, so a relative root comes back in absolute form.

pub mod listing;
pub mod session;

use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::backend::path::join_forward;
use crate::backend::{RemoteFileSystem, WalkEntry};
use crate::config::FtpConfig;
use crate::error::FsError;

pub use session::{FtpConnector, FtpSession, SuppaFtpConnector};

enum ConnectionState {
    Disconnected,
    Connected(Box<dyn FtpSession>),
}

/// FTP implementation of `RemoteFileSystem`.
pub struct FtpFileSystem {
    config: FtpConfig,
    connector: Box<dyn FtpConnector>,
    state: ConnectionState,
}

impl fmt::Debug for FtpFileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpFileSystem")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("username", &self.config.username)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl FtpFileSystem {
    /// Create a backend that connects with `suppaftp` on first use.
    pub fn new(config: FtpConfig) -> Self {
        Self::with_connector(config, Box::new(SuppaFtpConnector))
    }

    pub fn with_connector(config: FtpConfig, connector: Box<dyn FtpConnector>) -> Self {
        FtpFileSystem {
            config,
            connector,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn config(&self) -> &FtpConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// The cached control connection, opening it if needed.
    fn session(&mut self) -> Result<&mut dyn FtpSession, FsError> {
        if let ConnectionState::Disconnected = self.state {
            tracing::info!("Connecting to FTP server {}:{}", self.config.host, self.config.port);
            let session = self.connector.connect(&self.config)?;
            tracing::info!("FTP login succeeded: {}@{}", self.config.username, self.config.host);
            self.state = ConnectionState::Connected(session);
        }
        match &mut self.state {
            ConnectionState::Connected(session) => Ok(session.as_mut()),
            ConnectionState::Disconnected => Err(FsError::ProtocolError(
                "FTP connection is not established".to_string(),
            )),
        }
    }
}

/// `CWD path` and back to the directory that was current before.
///
/// Restores `/` when the prior directory could not be read.
fn probe_directory(session: &mut dyn FtpSession, path: &str) -> bool {
    let prior = session.pwd().ok();
    if session.cwd(path).is_err() {
        return false;
    }
    let back = prior.as_deref().unwrap_or("/");
    if let Err(e) = session.cwd(back) {
        tracing::debug!("Could not return to {} after probing {}: {}", back, path, e);
    }
    true
}

impl RemoteFileSystem for FtpFileSystem {
    type Walk<'a> = FtpWalk<'a>;

    fn walk<'a>(&'a mut self, path: &str) -> FtpWalk<'a> {
        FtpWalk {
            fs: self,
            frontier: VecDeque::from([path.to_string()]),
            visited: HashSet::new(),
            done: false,
        }
    }

    fn get_size(&mut self, path: &str) -> u64 {
        match self.session() {
            Ok(session) => session.size(path).unwrap_or_else(|e| {
                tracing::debug!("FTP size probe for {} failed: {}", path, e);
                0
            }),
            Err(e) => {
                tracing::debug!("FTP size probe for {} without connection: {}", path, e);
                0
            }
        }
    }

    fn exists(&mut self, path: &str) -> bool {
        let session = match self.session() {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!("FTP exists probe for {} without connection: {}", path, e);
                return false;
            }
        };
        probe_directory(session, path) || session.size(path).is_ok()
    }

    fn is_dir(&mut self, path: &str) -> bool {
        match self.session() {
            Ok(session) => probe_directory(session, path),
            Err(e) => {
                tracing::debug!("FTP is_dir probe for {} without connection: {}", path, e);
                false
            }
        }
    }

    fn join(&self, segments: &[&str]) -> String {
        join_forward(segments)
    }

    fn connect(&mut self) -> Result<(), FsError> {
        self.session().map(|_| ())
    }

    fn close(&mut self) {
        if let ConnectionState::Connected(mut session) =
            std::mem::replace(&mut self.state, ConnectionState::Disconnected)
        {
            if let Err(e) = session.quit() {
                tracing::debug!("FTP logout failed (ignored): {}", e);
            }
        }
    }
}

/// Breadth-first FTP walk. Borrows the backend for its whole lifetime.
pub struct FtpWalk<'a> {
    fs: &'a mut FtpFileSystem,
    frontier: VecDeque<String>,
    visited: HashSet<String>,
    done: bool,
}

impl Iterator for FtpWalk<'_> {
    type Item = Result<WalkEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let session = match self.fs.session() {
            Ok(session) => session,
            Err(e) => {
                self.done = true;
                self.frontier.clear();
                return Some(Err(e));
            }
        };

        while let Some(dir) = self.frontier.pop_front() {
            if !self.visited.insert(dir.clone()) {
                continue;
            }
            if let Err(e) = session.cwd(&dir) {
                tracing::error!("Cannot enter FTP directory {}: {}", dir, e);
                continue;
            }
            // Children are queued under the server's absolute path: after the
            // CWD above, a relative spelling would resolve against `dir`.
            let dirpath = match session.pwd() {
                Ok(absolute) => absolute,
                Err(e) => {
                    tracing::debug!("PWD failed in {}, keeping the requested path: {}", dir, e);
                    dir.clone()
                }
            };
            if dirpath != dir && !self.visited.insert(dirpath.clone()) {
                continue;
            }
            let (dirnames, filenames) = match listing::list_current_dir(session) {
                Ok(listed) => listed,
                Err(e) => {
                    tracing::error!("Cannot list FTP directory {}: {}", dirpath, e);
                    continue;
                }
            };

            for name in &dirnames {
                self.frontier.push_back(join_forward(&[dirpath.as_str(), name.as_str()]));
            }
            return Some(Ok(WalkEntry {
                dirpath,
                dirnames,
                filenames,
            }));
        }

        self.done = true;
        None
    }
}
