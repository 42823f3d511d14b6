//! Backend-agnostic directory scanning over local disk, FTP and SMB.
//!
//! A scanner asks for a [`FileSystem`] (from configuration with
//! [`create_filesystem`] or from a connection string with
//! [`parse_remote_url`] + [`create_filesystem_for`]) and then drives it
//! through the [`RemoteFileSystem`] trait without knowing which backend it
//! holds.

pub mod backend;
pub mod config;
pub mod error;
pub mod protocol;

pub use backend::{create_filesystem, create_filesystem_for, FileSystem, RemoteFileSystem, WalkEntry};
pub use error::FsError;
pub use protocol::{parse_remote_url, BackendKind, Location};
