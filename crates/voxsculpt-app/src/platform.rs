//! OS-specific directories for config and logs.

use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "voxsculpt";

/// Errors that can occur while resolving or creating platform directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Per-user directories following OS conventions (XDG on Linux, Known
/// Folders on Windows, Library on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve directories without creating them on disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        Ok(Self::with_config_dir(app_config))
    }

    /// Directories rooted under `root`, for tests and portable installs.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self::with_config_dir(root.join(APP_NAME))
    }

    /// Directories for an explicit config directory; logs go beside it.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            log_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    /// Create all directories on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
