//! Platform-specific config directory helpers.
//!
//! Uses the `dirs` crate to resolve the platform-appropriate location:
//! - Linux:   `~/.config/remotefs/config.toml`
//! - Windows: `%APPDATA%\remotefs\config.toml`
//! - macOS:   `~/Library/Application Support/remotefs/config.toml`

use std::path::PathBuf;

use crate::error::FsError;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the remotefs config directory. Does not create it.
pub fn config_dir() -> Result<PathBuf, FsError> {
    let base = dirs::config_dir()
        .ok_or_else(|| FsError::Config("Could not determine config directory".into()))?;
    Ok(base.join("remotefs"))
}

/// Path of the default config file.
pub fn default_config_file() -> Result<PathBuf, FsError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_file_lives_in_remotefs_dir() {
        // Headless CI images may have no home directory at all.
        if let Ok(path) = default_config_file() {
            assert!(path.ends_with("remotefs/config.toml"));
        }
    }
}
