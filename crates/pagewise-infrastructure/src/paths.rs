//! Unified path management for pagewise files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/pagewise/          # Config directory
//! └── config.json              # Client configuration
//!
//! ~/.cache/pagewise/           # Cache directory
//! └── documents/               # Downloaded document bytes (opt-in)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config/cache directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for pagewise_core::PagewiseError {
    fn from(err: PathError) -> Self {
        pagewise_core::PagewiseError::config(err.to_string())
    }
}

const APP_DIR: &str = "pagewise";

pub struct PagewisePaths;

impl PagewisePaths {
    /// Returns the pagewise configuration directory (e.g. `~/.config/pagewise/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the path to `config.json`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Returns the default document cache directory.
    pub fn document_cache_dir() -> Result<PathBuf, PathError> {
        dirs::cache_dir()
            .map(|dir| dir.join(APP_DIR).join("documents"))
            .ok_or(PathError::DirNotFound("cache"))
    }
}
