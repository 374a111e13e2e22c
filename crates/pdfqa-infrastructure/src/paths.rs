//! Centralized path resolution for PDFQA files.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "pdfqa";
const CONFIG_FILE: &str = "config.toml";

/// Errors raised while resolving paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// No home directory could be determined for the current user.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Could not determine home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct PdfqaPaths;

impl PdfqaPaths {
    /// `~/.config/pdfqa/config.toml`
    pub fn config_file() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(Self::config_file_in(&home))
    }

    /// `<home>/.config/pdfqa/config.toml`
    pub fn config_file_in(home: &Path) -> PathBuf {
        home.join(".config").join(APP_DIR).join(CONFIG_FILE)
    }
}
