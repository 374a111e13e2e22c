//! Client configuration file storage.
//!
//! Loads `~/.config/pdfqa/config.toml`. The file is optional: a missing or
//! empty file yields the default configuration.

use crate::paths::PdfqaPaths;
use pdfqa_core::QaError;
use pdfqa_core::config::ClientConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<ConfigStorageError> for QaError {
    fn from(e: ConfigStorageError) -> Self {
        QaError::config(e.to_string())
    }
}

/// Read-only storage for `config.toml`.
///
/// Responsibilities:
/// - Locate the config file (default path or explicit override)
/// - Parse TOML into `ClientConfig`
///
/// Does NOT:
/// - Write the file
/// - Apply flag or environment overrides (done by the caller)
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage handle for the default path.
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = PdfqaPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a storage handle for a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(ClientConfig)`: parsed file, or defaults if the file is missing or empty
    /// - `Err(ConfigStorageError::IoError)`: the file exists but could not be read
    /// - `Err(ConfigStorageError::TomlParseError)`: invalid TOML
    pub fn load(&self) -> Result<ClientConfig, ConfigStorageError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
