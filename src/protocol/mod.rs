//! Connection-string parsing for the remote filesystem backends.
//!
//! This module provides the `Location` enum that represents a parsed
//! connection string: which backend it addresses and the parameters needed
//! to reach it.

pub mod parser;

use std::fmt;
use std::str::FromStr;

use crate::config::{FtpConfig, SmbConfig};
use crate::error::FsError;

pub use parser::parse_remote_url;

/// Backend discriminator, as written in `scanner.remote_fs.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Local,
    Ftp,
    Smb,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Ftp => "ftp",
            BackendKind::Smb => "smb",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "ftp" => Ok(BackendKind::Ftp),
            "smb" | "cifs" => Ok(BackendKind::Smb),
            _ => Err(FsError::UnsupportedBackend(s.to_string())),
        }
    }
}

/// A parsed connection string.
///
/// Created by `parse_remote_url()` from a raw input string and consumed by
/// `backend::create_filesystem_for()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Local filesystem path, carried through unchanged.
    Local { path: String },

    /// FTP server plus the path to scan on it.
    Ftp { config: FtpConfig, path: String },

    /// SMB share; `config.path` is the share-relative path.
    Smb { config: SmbConfig },
}

impl Location {
    pub fn kind(&self) -> BackendKind {
        match self {
            Location::Local { .. } => BackendKind::Local,
            Location::Ftp { .. } => BackendKind::Ftp,
            Location::Smb { .. } => BackendKind::Smb,
        }
    }

    /// Path within the backend that this location points at.
    pub fn path(&self) -> &str {
        match self {
            Location::Local { path } => path,
            Location::Ftp { path, .. } => path,
            Location::Smb { config } => &config.path,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Location::Local { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("FTP".parse::<BackendKind>().unwrap(), BackendKind::Ftp);
        assert_eq!(" local ".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!("cifs".parse::<BackendKind>().unwrap(), BackendKind::Smb);
    }

    #[test]
    fn unknown_kind_is_reported_by_name() {
        match "nfs".parse::<BackendKind>() {
            Err(FsError::UnsupportedBackend(name)) => assert_eq!(name, "nfs"),
            other => panic!("Expected UnsupportedBackend, got {:?}", other),
        }
    }

    #[test]
    fn location_path_accessor() {
        let loc = Location::Smb {
            config: SmbConfig::new("nas", "media"),
        };
        assert_eq!(loc.path(), "/");
        assert_eq!(loc.kind().to_string(), "smb");
        assert!(!loc.is_local());
    }
}
