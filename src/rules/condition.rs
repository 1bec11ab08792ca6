//! Conditions as data
//!
//! A small, restricted predicate language expressed as serde enums so that
//! rules can live in YAML or JSON files. Conditions are pure functions of
//! the operation(s) they are evaluated against.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{BudgetId, Currency, Operation, Tag};

/// A predicate over one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Always true
    Always,
    /// True when every nested condition holds (true when empty)
    All(Vec<Condition>),
    /// True when at least one nested condition holds (false when empty)
    Any(Vec<Condition>),
    /// Negation
    Not(Box<Condition>),
    /// Case-insensitive description pattern; `*` matches any run of
    /// characters, a pattern without `*` matches as a substring
    Description(String),
    /// Amount strictly below the value
    AmountBelow(Decimal),
    /// Amount strictly above the value
    AmountAbove(Decimal),
    /// Amount in the given currency
    Currency(Currency),
    /// Operation belongs to the budget
    Budget(BudgetId),
    /// Operation carries the tag
    HasTag(Tag),
    /// Attribute `key` equals `equals`
    Attribute { key: String, equals: Value },
}

impl Condition {
    /// Evaluate against an operation
    pub fn evaluate(&self, operation: &Operation) -> bool {
        match self {
            Self::Always => true,
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(operation)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(operation)),
            Self::Not(condition) => !condition.evaluate(operation),
            Self::Description(pattern) => wildcard_match(pattern, &operation.description),
            Self::AmountBelow(limit) => operation.amount.amount() < *limit,
            Self::AmountAbove(limit) => operation.amount.amount() > *limit,
            Self::Currency(currency) => operation.amount.currency() == currency,
            Self::Budget(budget) => operation.budget_id == *budget,
            Self::HasTag(tag) => operation.has_tag(tag),
            Self::Attribute { key, equals } => operation.attributes.get(key) == Some(equals),
        }
    }
}

/// A predicate over an oriented (source, sink) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCondition {
    /// Always true
    Always,
    /// True when every nested condition holds (true when empty)
    All(Vec<PairCondition>),
    /// True when at least one nested condition holds (false when empty)
    Any(Vec<PairCondition>),
    /// Negation
    Not(Box<PairCondition>),
    /// Condition on the withdraw leg
    Source(Condition),
    /// Condition on the income leg
    Sink(Condition),
    /// Both legs move the same absolute amount
    SameMagnitude,
    /// The absolute fee does not exceed the value
    FeeWithin(Decimal),
    /// The legs are at most this many days apart
    WithinDays(i64),
    /// The legs belong to different budgets
    DifferentBudgets,
}

impl PairCondition {
    /// Evaluate against a pair
    pub fn evaluate(&self, source: &Operation, sink: &Operation) -> bool {
        match self {
            Self::Always => true,
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(source, sink)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(source, sink)),
            Self::Not(condition) => !condition.evaluate(source, sink),
            Self::Source(condition) => condition.evaluate(source),
            Self::Sink(condition) => condition.evaluate(sink),
            Self::SameMagnitude => source.amount.amount().abs() == sink.amount.amount().abs(),
            Self::FeeWithin(limit) => {
                (sink.amount.amount() + source.amount.amount()).abs() <= *limit
            }
            Self::WithinDays(days) => {
                let gap = sink.timestamp - source.timestamp;
                // Out of chrono's range means no practical limit
                match Duration::try_days(*days) {
                    Some(limit) => -limit <= gap && gap <= limit,
                    None => *days > 0,
                }
            }
            Self::DifferentBudgets => source.budget_id != sink.budget_id,
        }
    }
}

/// Case-insensitive wildcard match
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();

    if !pattern.contains('*') {
        return text.contains(&pattern);
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return true,
    };
    let Some(remaining) = text.strip_prefix(first) else {
        return false;
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return remaining.is_empty(),
    };

    let mut position = 0;
    for part in middle.iter().filter(|p| !p.is_empty()) {
        match remaining[position..].find(part) {
            Some(found) => position += found + part.len(),
            None => return false,
        }
    }

    remaining.len() - position >= last.len() && remaining.ends_with(last)
}
