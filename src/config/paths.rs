//! Path management for criteria-logbook
//!
//! ## Path Resolution Order
//!
//! 1. `LOGBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/criteria-logbook` or `~/.config/criteria-logbook`
//! 3. Windows: `%APPDATA%\criteria-logbook`

use std::path::{Path, PathBuf};

use crate::error::{LogbookError, LogbookResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "LOGBOOK_DATA_DIR";

const APP_DIR: &str = "criteria-logbook";

/// Manages all paths used by criteria-logbook
#[derive(Debug, Clone)]
pub struct LogbookPaths {
    base_dir: PathBuf,
}

impl LogbookPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application data directory can be
    /// determined.
    pub fn new() -> LogbookResult<Self> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create LogbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Settings file (`config.json`)
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default criterion tree (`rules.yaml`)
    pub fn rules_file(&self) -> PathBuf {
        self.base_dir.join("rules.yaml")
    }

    /// Default transfer criteria (`transfers.yaml`)
    pub fn transfers_file(&self) -> PathBuf {
        self.base_dir.join("transfers.yaml")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> LogbookResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LogbookError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> LogbookResult<PathBuf> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                LogbookError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> LogbookResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LogbookError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
