//! Operation model
//!
//! One recorded ledger entry of a budget: a debit (negative amount) or a
//! credit (positive amount) with free-form tags and attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::ids::{BudgetId, OperationId};
use super::money::Money;
use super::tag::Tag;

/// A financial operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique identifier
    #[serde(default)]
    pub id: OperationId,

    /// When the operation happened, normalized to UTC
    pub timestamp: DateTime<Utc>,

    /// Amount (positive for income, negative for withdraw)
    pub amount: Money,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// The budget this operation belongs to
    pub budget_id: BudgetId,

    /// Classification tags
    #[serde(default)]
    pub tags: BTreeSet<Tag>,

    /// Semi-structured attributes carried from import
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl Operation {
    /// Create a new operation without tags or attributes
    pub fn new(budget_id: BudgetId, timestamp: DateTime<Utc>, amount: Money) -> Self {
        Self {
            id: OperationId::new(),
            timestamp,
            amount,
            description: String::new(),
            budget_id,
            tags: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check if this is an income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }

    /// Check if this is a withdraw (negative amount)
    pub fn is_withdraw(&self) -> bool {
        self.amount.is_negative()
    }

    /// Check if the operation carries the tag
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Add a tag in place, returning whether it was new
    pub fn tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    /// Remove a tag in place, returning whether it was present
    pub fn untag(&mut self, tag: &Tag) -> bool {
        self.tags.remove(tag)
    }

    /// Check whether this operation was marked as a leg of a transfer
    pub fn is_transfer_leg(&self) -> bool {
        self.has_tag(&Tag::transfer_source()) || self.has_tag(&Tag::transfer_sink())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}
