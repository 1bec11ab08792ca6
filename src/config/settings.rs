//! User settings for criteria-logbook
//!
//! Stored as `config.json` in the base directory. Every field has a default,
//! so a partial or missing file still yields usable settings.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::LogbookPaths;
use crate::error::{LogbookError, LogbookResult};
use crate::models::{Currency, Tag};
use crate::storage::file_io::{read_json, write_json_atomic};

/// User settings for criteria-logbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency classified when none is given on the command line
    #[serde(default = "default_currency")]
    pub default_currency: Currency,

    /// Tag put on the withdraw leg of detected transfers
    #[serde(default = "Tag::transfer_source")]
    pub transfer_source_tag: Tag,

    /// Tag put on the income leg of detected transfers
    #[serde(default = "Tag::transfer_sink")]
    pub transfer_sink_tag: Tag,

    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> Currency {
    Currency::eur()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            transfer_source_tag: Tag::transfer_source(),
            transfer_sink_tag: Tag::transfer_sink(),
            log_filter: default_log_filter(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    ///
    /// Defaults are not persisted; the caller decides when to [`save`](Self::save).
    pub fn load_or_create(paths: &LogbookPaths) -> LogbookResult<Self> {
        let settings: Self = read_json(paths.settings_file())
            .map_err(|e| LogbookError::Config(format!("Failed to load settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that cannot be used at runtime
    pub fn validate(&self) -> LogbookResult<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LogbookError::Config(format!(
                "Invalid date format: {}",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LogbookPaths) -> LogbookResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
