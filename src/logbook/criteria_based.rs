//! Logbook tree mirroring a criterion tree
//!
//! Each node records the operations its criterion matched and forwards them
//! to the one child its criterion routes to. Children are created lazily the
//! first time an operation is routed to them.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::logbook::Logbook;
use crate::criteria::Criterion;
use crate::error::{LogbookError, LogbookResult};
use crate::models::{Operation, OperationId};

/// A criterion node paired with the logbook of operations it matched
#[derive(Debug, Clone)]
pub struct CriteriaBasedLogbook {
    criterion: Arc<Criterion>,
    logbook: Logbook,
    children: BTreeMap<String, CriteriaBasedLogbook>,
}

/// Outcome of registering many operations
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Number of operations accepted by the root
    pub registered: usize,
    /// Rejected operations with the reason
    pub failures: Vec<(OperationId, LogbookError)>,
}

impl RegistrationReport {
    /// Check if every operation was accepted
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl CriteriaBasedLogbook {
    /// Create an empty tree rooted at `criterion`
    pub fn new(criterion: impl Into<Arc<Criterion>>) -> Self {
        Self {
            criterion: criterion.into(),
            logbook: Logbook::new(),
            children: BTreeMap::new(),
        }
    }

    /// Register an operation at this node and along its matching path
    pub fn register(&mut self, operation: Arc<Operation>) -> LogbookResult<()> {
        if !self.criterion.matched(&operation) {
            return Err(LogbookError::did_not_match(
                operation.id,
                self.criterion.description(),
            ));
        }

        self.logbook.register(Arc::clone(&operation))?;

        let Some(subcriterion) = self.criterion.matched_subcriterion(&operation) else {
            return Ok(());
        };

        tracing::debug!(
            operation = %operation.id,
            criterion = %self.criterion.description(),
            subcriterion = %subcriterion.description(),
            "routing operation"
        );

        let operation_id = operation.id;
        self.children
            .entry(subcriterion.description().to_string())
            .or_insert_with(|| CriteriaBasedLogbook::new(subcriterion))
            .register(operation)
            .map_err(|reason| {
                LogbookError::did_not_match_subcriteria(
                    operation_id,
                    self.criterion.description(),
                    reason,
                )
            })
    }

    /// Register every operation, continuing past rejections
    pub fn register_all<I>(&mut self, operations: I) -> RegistrationReport
    where
        I: IntoIterator<Item = Arc<Operation>>,
    {
        let mut report = RegistrationReport::default();
        for operation in operations {
            let id = operation.id;
            match self.register(operation) {
                Ok(()) => report.registered += 1,
                Err(reason) => {
                    tracing::warn!(operation = %id, %reason, "operation rejected");
                    report.failures.push((id, reason));
                }
            }
        }

        tracing::info!(
            criterion = %self.criterion.description(),
            registered = report.registered,
            rejected = report.failures.len(),
            "registration finished"
        );
        report
    }

    /// The criterion of this node
    pub fn criterion(&self) -> &Arc<Criterion> {
        &self.criterion
    }

    /// Operations matched at this node, including those routed further down
    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    /// Nested logbooks keyed by subcriterion description
    pub fn children(&self) -> &BTreeMap<String, CriteriaBasedLogbook> {
        &self.children
    }

    /// Look up a nested logbook by subcriterion description
    pub fn child(&self, description: &str) -> Option<&CriteriaBasedLogbook> {
        self.children.get(description)
    }

    /// The same tree restricted to `from <= timestamp <= till`
    ///
    /// Every node's logbook is sliced; the result shares no mutable state
    /// with `self`.
    pub fn slice(&self, from: DateTime<Utc>, till: DateTime<Utc>) -> CriteriaBasedLogbook {
        CriteriaBasedLogbook {
            criterion: Arc::clone(&self.criterion),
            logbook: self.logbook.slice(from, till),
            children: self
                .children
                .iter()
                .map(|(description, child)| (description.clone(), child.slice(from, till)))
                .collect(),
        }
    }
}
