//! CLI command handlers
//!
//! Bridges clap argument parsing with the engine: loads operations and
//! rules from disk, runs classification or transfer detection, and prints or
//! exports the resulting report.

pub mod classify;
pub mod config;
pub mod transfers;

pub use classify::{handle_classify_command, ClassifyArgs};
pub use config::{handle_config_command, handle_init_command};
pub use transfers::{handle_transfers_command, TransfersArgs};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{LogbookError, LogbookResult};

/// Which end of a day a bare date stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// Parse a `--from`/`--till` value
///
/// Accepts RFC 3339 timestamps or `YYYY-MM-DD`. A bare date covers the
/// whole day, so `--till 2024-03-31` includes operations at 23:59 that day.
pub fn parse_bound(value: &str, bound: DayBound) -> LogbookResult<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        LogbookError::Validation(format!(
            "Invalid date: {}. Use YYYY-MM-DD or an RFC 3339 timestamp",
            value
        ))
    })?;

    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| LogbookError::Validation("Invalid end of day".into()))?,
    };
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}
