//! Serde model of the `[scanner.remote_fs]` table.
//!
//! Only shape and defaults live here; choosing a backend from these values is
//! the job of `backend::factory`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FsError;

pub const DEFAULT_FTP_PORT: u16 = 21;
pub const DEFAULT_SMB_PORT: u16 = 445;
pub const DEFAULT_FTP_USER: &str = "anonymous";
pub const DEFAULT_FTP_ENCODING: &str = "utf-8";

/// Top-level config file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub remote_fs: Option<RemoteFsConfig>,
}

/// Discriminated backend selection.
///
/// `kind` stays a free-form string so that an unknown value reaches the
/// factory and is reported by name instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteFsConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub ftp: Option<FtpConfig>,
    #[serde(default)]
    pub smb: Option<SmbConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtpConfig {
    pub host: String,
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    #[serde(default = "default_ftp_user")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_ftp_encoding")]
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmbConfig {
    pub host: String,
    pub share: String,
    #[serde(default = "default_smb_path")]
    pub path: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_smb_port")]
    pub port: u16,
}

fn default_ftp_port() -> u16 {
    DEFAULT_FTP_PORT
}

fn default_ftp_user() -> String {
    DEFAULT_FTP_USER.to_string()
}

fn default_ftp_encoding() -> String {
    DEFAULT_FTP_ENCODING.to_string()
}

fn default_smb_path() -> String {
    "/".to_string()
}

fn default_smb_port() -> u16 {
    DEFAULT_SMB_PORT
}

impl AppConfig {
    /// Parse a config file body.
    pub fn from_toml_str(contents: &str) -> Result<Self, FsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a config file. A missing file yields the default (local) config.
    pub fn load(path: &Path) -> Result<Self, FsError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| FsError::Config(format!("Invalid {}: {}", path.display(), e)))
    }

    pub fn remote_fs(&self) -> Option<&RemoteFsConfig> {
        self.scanner.remote_fs.as_ref()
    }
}

impl FtpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        FtpConfig {
            host: host.into(),
            port: DEFAULT_FTP_PORT,
            username: DEFAULT_FTP_USER.to_string(),
            password: String::new(),
            encoding: DEFAULT_FTP_ENCODING.to_string(),
        }
    }

    /// Reject settings the FTP transport cannot honour.
    ///
    /// The control connection is decoded as UTF-8, so any other encoding
    /// label is refused here rather than producing mangled names later.
    pub fn validate(&self) -> Result<(), FsError> {
        if self.host.trim().is_empty() {
            return Err(FsError::Config("FTP host cannot be empty".into()));
        }
        let encoding = self.encoding.trim().to_ascii_lowercase();
        if !matches!(encoding.as_str(), "utf-8" | "utf8") {
            return Err(FsError::Config(format!(
                "Unsupported FTP encoding '{}': only utf-8 is supported",
                self.encoding
            )));
        }
        Ok(())
    }
}

impl SmbConfig {
    pub fn new(host: impl Into<String>, share: impl Into<String>) -> Self {
        SmbConfig {
            host: host.into(),
            share: share.into(),
            path: default_smb_path(),
            username: None,
            password: None,
            port: DEFAULT_SMB_PORT,
        }
    }

    pub fn validate(&self) -> Result<(), FsError> {
        if self.host.trim().is_empty() {
            return Err(FsError::Config("SMB server name cannot be empty".into()));
        }
        if self.share.trim().is_empty() {
            return Err(FsError::Config("SMB share name cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_no_remote_fs() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert!(cfg.remote_fs().is_none());
    }

    #[test]
    fn ftp_defaults_are_filled_in() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [scanner.remote_fs]
            type = "ftp"

            [scanner.remote_fs.ftp]
            host = "ftp.example.com"
            "#,
        )
        .unwrap();
        let remote = cfg.remote_fs().unwrap();
        assert_eq!(remote.kind.as_deref(), Some("ftp"));
        let ftp = remote.ftp.as_ref().unwrap();
        assert_eq!(ftp, &FtpConfig::new("ftp.example.com"));
        assert_eq!(ftp.port, 21);
        assert_eq!(ftp.username, "anonymous");
        assert_eq!(ftp.password, "");
        assert_eq!(ftp.encoding, "utf-8");
        assert!(remote.smb.is_none());
    }

    #[test]
    fn smb_defaults_are_filled_in() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [scanner.remote_fs]
            type = "smb"

            [scanner.remote_fs.smb]
            host = "nas.local"
            share = "media"
            username = "scanner"
            "#,
        )
        .unwrap();
        let smb = cfg.remote_fs().unwrap().smb.as_ref().unwrap();
        assert_eq!(smb.path, "/");
        assert_eq!(smb.port, 445);
        assert_eq!(smb.username.as_deref(), Some("scanner"));
        assert!(smb.password.is_none());
    }

    #[test]
    fn unknown_type_still_deserializes() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [scanner.remote_fs]
            type = "webdav"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.remote_fs().unwrap().kind.as_deref(), Some("webdav"));
    }

    #[test]
    fn ftp_section_without_host_is_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [scanner.remote_fs.ftp]
            port = 2121
            "#,
        );
        assert!(matches!(result, Err(FsError::Config(_))));
    }

    #[test]
    fn ftp_validate_rejects_non_utf8_encoding() {
        let mut ftp = FtpConfig::new("host");
        ftp.encoding = "gbk".to_string();
        match ftp.validate() {
            Err(FsError::Config(msg)) => assert!(msg.contains("gbk")),
            other => panic!("Expected Config error, got {:?}", other),
        }
        ftp.encoding = "UTF8".to_string();
        assert!(ftp.validate().is_ok());
    }

    #[test]
    fn smb_validate_requires_share() {
        let smb = SmbConfig::new("nas", "  ");
        assert!(smb.validate().is_err());
        assert!(SmbConfig::new("nas", "media").validate().is_ok());
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.remote_fs().is_none());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scanner.remote_fs]\ntype = \"local\"\n").unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.remote_fs().unwrap().kind.as_deref(), Some("local"));
    }
}
