//! FTP control-connection seam.
//!
//! `FtpFileSystem` talks to the server only through `FtpSession`, which keeps
//! the traversal logic independent of the wire client. The default connector
//! uses `suppaftp`'s blocking `FtpStream`.

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};

use crate::config::FtpConfig;
use crate::error::FsError;

/// One authenticated FTP control connection.
///
/// Listing commands operate on the current working directory.
pub trait FtpSession: Send {
    fn cwd(&mut self, path: &str) -> Result<(), FsError>;

    fn pwd(&mut self) -> Result<String, FsError>;

    /// Machine-readable listing (`MLSD`) of the working directory.
    fn mlsd(&mut self) -> Result<Vec<String>, FsError>;

    /// Name-only listing (`NLST`) of the working directory.
    fn nlst(&mut self) -> Result<Vec<String>, FsError>;

    fn size(&mut self, path: &str) -> Result<u64, FsError>;

    fn quit(&mut self) -> Result<(), FsError>;
}

/// Opens and authenticates control connections.
pub trait FtpConnector: Send {
    fn connect(&self, config: &FtpConfig) -> Result<Box<dyn FtpSession>, FsError>;
}

/// Connector backed by `suppaftp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuppaFtpConnector;

impl FtpConnector for SuppaFtpConnector {
    fn connect(&self, config: &FtpConfig) -> Result<Box<dyn FtpSession>, FsError> {
        let addr = format!("{}:{}", config.host, config.port);
        let connection_failed = |stage: &str, e: FtpError| FsError::ConnectionFailed {
            protocol: "ftp",
            host: addr.clone(),
            reason: format!("{}: {}", stage, e),
        };

        let mut stream =
            FtpStream::connect(addr.as_str()).map_err(|e| connection_failed("connect", e))?;
        stream
            .login(config.username.as_str(), config.password.as_str())
            .map_err(|e| connection_failed("login", e))?;
        // SIZE is refused in ASCII mode by many servers.
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| connection_failed("TYPE I", e))?;

        Ok(Box::new(SuppaFtpSession { stream }))
    }
}

struct SuppaFtpSession {
    stream: FtpStream,
}

fn ftp_err(command: &str, err: FtpError) -> FsError {
    FsError::ProtocolError(format!("FTP {} failed: {}", command, err))
}

impl FtpSession for SuppaFtpSession {
    fn cwd(&mut self, path: &str) -> Result<(), FsError> {
        self.stream.cwd(path).map_err(|e| ftp_err("CWD", e))
    }

    fn pwd(&mut self) -> Result<String, FsError> {
        self.stream.pwd().map_err(|e| ftp_err("PWD", e))
    }

    fn mlsd(&mut self) -> Result<Vec<String>, FsError> {
        self.stream.mlsd(None).map_err(|e| ftp_err("MLSD", e))
    }

    fn nlst(&mut self) -> Result<Vec<String>, FsError> {
        self.stream.nlst(None).map_err(|e| ftp_err("NLST", e))
    }

    fn size(&mut self, path: &str) -> Result<u64, FsError> {
        self.stream
            .size(path)
            .map(|n| n as u64)
            .map_err(|e| ftp_err("SIZE", e))
    }

    fn quit(&mut self) -> Result<(), FsError> {
        self.stream.quit().map_err(|e| ftp_err("QUIT", e))
    }
}
