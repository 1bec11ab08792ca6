//! Tag labels attached to operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable string label
///
/// Tags classify operations and are the matching keys of tag-based criteria.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Tag placed on the debit leg of a detected transfer
    pub const TRANSFER_SOURCE: &'static str = "transfer/source";

    /// Tag placed on the credit leg of a detected transfer
    pub const TRANSFER_SINK: &'static str = "transfer/sink";

    /// Create a new tag
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default tag for transfer sources
    pub fn transfer_source() -> Self {
        Self::new(Self::TRANSFER_SOURCE)
    }

    /// Default tag for transfer sinks
    pub fn transfer_sink() -> Self {
        Self::new(Self::TRANSFER_SINK)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Tag {
    fn from(label: String) -> Self {
        Self(label)
    }
}
