//! User-authored rules
//!
//! Conditions, criterion trees and transfer criteria as serde data, plus the
//! compiler that turns rule text into predicates.

pub mod compiler;
pub mod condition;
pub mod definition;

pub use compiler::{ConditionCompiler, PredicateCompiler};
pub use condition::{Condition, PairCondition};
pub use definition::{
    CriterionDefinition, RuleDefinition, Substitution, TransferCriterionDefinition,
};
