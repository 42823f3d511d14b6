pub mod factory;
pub mod ftp;
pub mod local;
pub mod path;
pub mod smb;

use serde::Serialize;

use crate::error::FsError;

pub use factory::{create_filesystem, create_filesystem_for, create_filesystem_with, Transports};
pub use ftp::FtpFileSystem;
pub use local::LocalFileSystem;
pub use smb::SmbFileSystem;

/// One directory visited by `walk`: its path, subdirectory names and file names.
///
/// Names are in backend listing order and never include `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkEntry {
    pub dirpath: String,
    pub dirnames: Vec<String>,
    pub filenames: Vec<String>,
}

impl WalkEntry {
    pub fn new(dirpath: impl Into<String>) -> Self {
        WalkEntry {
            dirpath: dirpath.into(),
            dirnames: Vec::new(),
            filenames: Vec::new(),
        }
    }
}

/// Core abstraction shared by the local, FTP and SMB backends.
///
/// Every I/O method takes `&mut self`: remote backends cache a lazily opened
/// connection, and one instance must never be driven by two callers at once.
///
/// The probe methods (`get_size`, `exists`, `is_dir`) never fail. Any
/// underlying error collapses to `0` / `false`.
pub trait RemoteFileSystem {
    /// Lazy directory stream returned by `walk`.
    type Walk<'a>: Iterator<Item = Result<WalkEntry, FsError>>
    where
        Self: 'a;

    /// Walk the tree rooted at `path`.
    ///
    /// No I/O happens until the first `next()`. A connection failure is
    /// yielded once as `Err` and ends the stream; unreadable directories are
    /// logged and skipped.
    fn walk<'a>(&'a mut self, path: &str) -> Self::Walk<'a>;

    /// Size in bytes, or `0` when it cannot be determined.
    fn get_size(&mut self, path: &str) -> u64;

    fn exists(&mut self, path: &str) -> bool;

    fn is_dir(&mut self, path: &str) -> bool;

    /// Join non-empty segments with the backend's separator.
    fn join(&self, segments: &[&str]) -> String;

    /// Establish the backend's connection now instead of on first use.
    fn connect(&mut self) -> Result<(), FsError> {
        Ok(())
    }

    /// Drop any cached connection. The next I/O call reconnects.
    fn close(&mut self) {}
}

/// A backend built by the factory. Dispatch over the variants is static.
#[derive(Debug)]
pub enum FileSystem {
    Local(LocalFileSystem),
    Ftp(FtpFileSystem),
    Smb(SmbFileSystem),
}

/// Walk stream of a `FileSystem`.
pub enum Walk<'a> {
    Local(local::LocalWalk),
    Ftp(ftp::FtpWalk<'a>),
    Smb(smb::SmbWalk<'a>),
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Walk::Local(w) => w.next(),
            Walk::Ftp(w) => w.next(),
            Walk::Smb(w) => w.next(),
        }
    }
}

impl FileSystem {
    /// Returns a human-readable backend name.
    pub fn name(&self) -> &'static str {
        match self {
            FileSystem::Local(_) => "local",
            FileSystem::Ftp(_) => "ftp",
            FileSystem::Smb(_) => "smb",
        }
    }

    /// Root to walk when the caller does not name one.
    pub fn default_root(&self) -> &str {
        match self {
            FileSystem::Local(_) => ".",
            FileSystem::Ftp(_) => "/",
            FileSystem::Smb(fs) => fs.base_path(),
        }
    }
}

impl RemoteFileSystem for FileSystem {
    type Walk<'a> = Walk<'a>;

    fn walk<'a>(&'a mut self, path: &str) -> Walk<'a> {
        match self {
            FileSystem::Local(fs) => Walk::Local(fs.walk(path)),
            FileSystem::Ftp(fs) => Walk::Ftp(fs.walk(path)),
            FileSystem::Smb(fs) => Walk::Smb(fs.walk(path)),
        }
    }

    fn get_size(&mut self, path: &str) -> u64 {
        match self {
            FileSystem::Local(fs) => fs.get_size(path),
            FileSystem::Ftp(fs) => fs.get_size(path),
            FileSystem::Smb(fs) => fs.get_size(path),
        }
    }

    fn exists(&mut self, path: &str) -> bool {
        match self {
            FileSystem::Local(fs) => fs.exists(path),
            FileSystem::Ftp(fs) => fs.exists(path),
            FileSystem::Smb(fs) => fs.exists(path),
        }
    }

    fn is_dir(&mut self, path: &str) -> bool {
        match self {
            FileSystem::Local(fs) => fs.is_dir(path),
            FileSystem::Ftp(fs) => fs.is_dir(path),
            FileSystem::Smb(fs) => fs.is_dir(path),
        }
    }

    fn join(&self, segments: &[&str]) -> String {
        match self {
            FileSystem::Local(fs) => fs.join(segments),
            FileSystem::Ftp(fs) => fs.join(segments),
            FileSystem::Smb(fs) => fs.join(segments),
        }
    }

    fn connect(&mut self) -> Result<(), FsError> {
        match self {
            FileSystem::Local(fs) => fs.connect(),
            FileSystem::Ftp(fs) => fs.connect(),
            FileSystem::Smb(fs) => fs.connect(),
        }
    }

    fn close(&mut self) {
        match self {
            FileSystem::Local(fs) => fs.close(),
            FileSystem::Ftp(fs) => fs.close(),
            FileSystem::Smb(fs) => fs.close(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_variant_dispatches() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"1234").unwrap();
        let root = dir.path().to_string_lossy().into_owned();

        let mut fs = FileSystem::Local(LocalFileSystem::new());
        assert_eq!(fs.name(), "local");
        assert!(fs.is_dir(&root));
        let file = fs.join(&[root.as_str(), "a.mp4"]);
        assert!(fs.exists(&file));
        assert_eq!(fs.get_size(&file), 4);

        let entries: Vec<WalkEntry> = fs.walk(&root).map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filenames, vec!["a.mp4".to_string()]);
        fs.close();
    }

    #[test]
    fn walk_entry_serializes_as_triple_fields() {
        let mut entry = WalkEntry::new("/videos");
        entry.dirnames.push("sub".into());
        entry.filenames.push("a.mkv".into());
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"dirpath":"/videos","dirnames":["sub"],"filenames":["a.mkv"]}"#
        );
    }
}
