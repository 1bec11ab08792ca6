//! Predicate compilation
//!
//! Turns rule text into the opaque predicates the engine consumes. The
//! engine never sees the text, only the compiled closures.

use std::sync::Arc;

use super::condition::{Condition, PairCondition};
use crate::criteria::OperationPredicate;
use crate::error::{LogbookError, LogbookResult};
use crate::models::Operation;
use crate::storage::from_yaml_str;
use crate::transfers::PairPredicate;

/// Compiles rule text into deterministic, side-effect-free predicates
pub trait PredicateCompiler {
    /// Compile a predicate over one operation
    fn compile_operation(&self, text: &str) -> LogbookResult<OperationPredicate>;

    /// Compile a predicate over a (source, sink) pair
    fn compile_pair(&self, text: &str) -> LogbookResult<PairPredicate>;
}

/// Compiler for conditions written as YAML (or JSON, which YAML accepts)
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionCompiler;

impl ConditionCompiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self
    }

    /// Parse text into a single-operation condition
    pub fn parse_condition(&self, text: &str) -> LogbookResult<Condition> {
        parse(text, "condition")
    }

    /// Parse text into a pair condition
    pub fn parse_pair(&self, text: &str) -> LogbookResult<PairCondition> {
        parse(text, "pair condition")
    }
}

impl PredicateCompiler for ConditionCompiler {
    fn compile_operation(&self, text: &str) -> LogbookResult<OperationPredicate> {
        let condition = self.parse_condition(text)?;
        Ok(Arc::new(move |operation: &Operation| condition.evaluate(operation)))
    }

    fn compile_pair(&self, text: &str) -> LogbookResult<PairPredicate> {
        let condition = self.parse_pair(text)?;
        Ok(Arc::new(move |source: &Operation, sink: &Operation| {
            condition.evaluate(source, sink)
        }))
    }
}

fn parse<T: serde::de::DeserializeOwned>(text: &str, what: &str) -> LogbookResult<T> {
    if text.trim().is_empty() {
        return Err(LogbookError::Rule(format!("empty {}", what)));
    }
    from_yaml_str(text)
        .map_err(|e| LogbookError::Rule(format!("invalid {} '{}': {}", what, text.trim(), e)))
}
