//! Configuration module for criteria-logbook
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LogbookPaths;
pub use settings::Settings;
