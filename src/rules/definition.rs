//! Rule definitions
//!
//! Serde shapes for user-authored criterion trees and transfer criteria, and
//! their conversion into the runtime [`Criterion`] and [`TransferCriterion`]
//! types.
//!
//! ```yaml
//! description: All
//! rule:
//!   excluding: [transfer/source, transfer/sink]
//! subcriteria:
//!   - description: Groceries
//!     rule:
//!       condition:
//!         description: "*market*"
//!   - description: By month
//!     rule:
//!       substitution: month
//! ```

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use super::condition::{Condition, PairCondition};
use crate::criteria::{Criterion, SubstitutionFn};
use crate::error::{LogbookError, LogbookResult};
use crate::models::{Operation, Tag};
use crate::storage::file_io::read_yaml_required;
use crate::transfers::{DetectionAccuracy, TransferCriterion};

/// How a substitution criterion derives descriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substitution {
    /// Calendar year, e.g. `2024`
    Year,
    /// Calendar month, e.g. `2024-03`
    Month,
    /// Full budget uuid
    Budget,
    /// Currency code
    Currency,
    /// Value of an attribute, `(none)` when missing
    Attribute(String),
}

impl Substitution {
    /// Derive the description for an operation
    pub fn derive(&self, operation: &Operation) -> String {
        match self {
            Self::Year => operation.timestamp.year().to_string(),
            Self::Month => operation.timestamp.format("%Y-%m").to_string(),
            Self::Budget => operation.budget_id.as_uuid().to_string(),
            Self::Currency => operation.amount.currency().to_string(),
            Self::Attribute(key) => match operation.attributes.get(key) {
                Some(Value::String(value)) => value.clone(),
                Some(value) => value.to_string(),
                None => "(none)".to_string(),
            },
        }
    }
}

/// The matching rule of a criterion definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDefinition {
    /// Match everything
    #[default]
    Universal,
    /// Match by condition
    Condition(Condition),
    /// Require all tags
    Including(Vec<Tag>),
    /// Forbid all tags
    Excluding(Vec<Tag>),
    /// Group by derived description
    Substitution(Substitution),
}

/// A user-authored criterion tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDefinition {
    /// Name of the category, unique among siblings
    pub description: String,

    /// Matching rule, universal when omitted
    #[serde(default)]
    pub rule: RuleDefinition,

    /// Nested categories in evaluation order
    #[serde(default)]
    pub subcriteria: Vec<CriterionDefinition>,
}

impl CriterionDefinition {
    /// Built-in tree used when no rules file is configured
    ///
    /// Transfer legs are kept out of the tree; everything else is split into
    /// income and expenses, each grouped by month.
    pub fn default_tree(source_tag: Tag, sink_tag: Tag) -> Self {
        let by_month = || CriterionDefinition {
            description: "By month".into(),
            rule: RuleDefinition::Substitution(Substitution::Month),
            subcriteria: Vec::new(),
        };
        CriterionDefinition {
            description: "All".into(),
            rule: RuleDefinition::Excluding(vec![source_tag, sink_tag]),
            subcriteria: vec![
                CriterionDefinition {
                    description: "Income".into(),
                    rule: RuleDefinition::Condition(Condition::AmountAbove(Decimal::ZERO)),
                    subcriteria: vec![by_month()],
                },
                CriterionDefinition {
                    description: "Expenses".into(),
                    rule: RuleDefinition::Condition(Condition::AmountBelow(Decimal::ZERO)),
                    subcriteria: vec![by_month()],
                },
            ],
        }
    }

    /// Load a definition tree from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> LogbookResult<Self> {
        read_yaml_required(path)
    }

    /// Build and validate the runtime criterion tree
    pub fn build(&self) -> LogbookResult<Criterion> {
        let criterion = self.build_unchecked()?;
        criterion.validate()?;
        Ok(criterion)
    }

    fn build_unchecked(&self) -> LogbookResult<Criterion> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(LogbookError::Rule("criterion description is empty".into()));
        }

        let criterion = match &self.rule {
            RuleDefinition::Universal => Criterion::universal(description),
            RuleDefinition::Condition(condition) => {
                let condition = condition.clone();
                Criterion::predicate(description, move |op: &Operation| condition.evaluate(op))
            }
            RuleDefinition::Including(tags) => Criterion::including(description, tags.clone()),
            RuleDefinition::Excluding(tags) => Criterion::excluding(description, tags.clone()),
            RuleDefinition::Substitution(substitution) => {
                if matches!(substitution, Substitution::Attribute(key) if key.trim().is_empty()) {
                    return Err(LogbookError::Rule(format!(
                        "substitution of '{}' names an empty attribute",
                        description
                    )));
                }
                let substitution = substitution.clone();
                let derive: SubstitutionFn = Arc::new(move |op: &Operation| substitution.derive(op));
                Criterion::from_substitution(description, derive)
            }
        };

        let subcriteria = self
            .subcriteria
            .iter()
            .map(CriterionDefinition::build_unchecked)
            .collect::<LogbookResult<Vec<_>>>()?;
        Ok(criterion.with_subcriteria(subcriteria))
    }
}

/// A user-authored transfer criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCriterionDefinition {
    /// Confidence assigned to accepted pairs
    pub accuracy: DetectionAccuracy,

    /// Comment template with `{source}`, `{sink}` and `{fee}` placeholders
    #[serde(default)]
    pub comment: String,

    /// Pair predicate
    pub condition: PairCondition,
}

impl TransferCriterionDefinition {
    /// Build the runtime transfer criterion
    pub fn build(&self) -> TransferCriterion {
        let condition = self.condition.clone();
        TransferCriterion::new(self.accuracy, self.comment.clone(), move |source, sink| {
            condition.evaluate(source, sink)
        })
    }

    /// Load a list of transfer criteria from a YAML file
    pub fn load_all<P: AsRef<Path>>(path: P) -> LogbookResult<Vec<TransferCriterion>> {
        let definitions: Vec<TransferCriterionDefinition> = read_yaml_required(path)?;
        if definitions.is_empty() {
            return Err(LogbookError::Rule("no transfer criteria defined".into()));
        }
        Ok(definitions.iter().map(Self::build).collect())
    }

    /// Built-in criteria used when no file is configured
    pub fn defaults() -> Vec<TransferCriterionDefinition> {
        vec![
            TransferCriterionDefinition {
                accuracy: DetectionAccuracy::Exact,
                comment: "Transfer {source} -> {sink}".into(),
                condition: PairCondition::All(vec![
                    PairCondition::SameMagnitude,
                    PairCondition::DifferentBudgets,
                    PairCondition::WithinDays(1),
                ]),
            },
            TransferCriterionDefinition {
                accuracy: DetectionAccuracy::Likely,
                comment: "Possible transfer {source} -> {sink}, fee {fee}".into(),
                condition: PairCondition::All(vec![
                    PairCondition::DifferentBudgets,
                    PairCondition::WithinDays(5),
                ]),
            },
        ]
    }
}
