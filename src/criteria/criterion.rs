//! Criterion tree
//!
//! A [`Criterion`] tests whether an operation belongs to a category and may
//! delegate to ordered subcriteria. Subcriteria are evaluated first-match in
//! declaration order, except for substitution nodes which synthesize one
//! child per derived description.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{LogbookError, LogbookResult};
use crate::models::{Operation, Tag};

/// Injected boolean function over one operation
pub type OperationPredicate = Arc<dyn Fn(&Operation) -> bool + Send + Sync>;

/// Injected function deriving a description from an operation
pub type SubstitutionFn = Arc<dyn Fn(&Operation) -> String + Send + Sync>;

/// How a tag-based criterion compares tag sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMode {
    /// The operation must carry all of the criterion's tags
    Including,
    /// The operation must carry none of the criterion's tags
    Excluding,
}

/// The matching rule of a criterion node
pub enum CriterionKind {
    /// Matches every operation
    Universal,
    /// Matches when the predicate returns true
    Predicate(OperationPredicate),
    /// Matches on the operation's tag set
    Tags { mode: TagMode, tags: BTreeSet<Tag> },
    /// Matches everything and routes to children synthesized per derived
    /// description
    Substitution {
        substitution: SubstitutionFn,
        synthesized: Mutex<BTreeMap<String, Arc<Criterion>>>,
    },
}

impl fmt::Debug for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("Universal"),
            Self::Predicate(_) => f.write_str("Predicate"),
            Self::Tags { mode, tags } => f
                .debug_struct("Tags")
                .field("mode", mode)
                .field("tags", tags)
                .finish(),
            Self::Substitution { synthesized, .. } => {
                let count = synthesized
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .len();
                f.debug_struct("Substitution")
                    .field("synthesized", &count)
                    .finish()
            }
        }
    }
}

/// A named rule node with ordered subcriteria
#[derive(Debug)]
pub struct Criterion {
    description: String,
    kind: CriterionKind,
    subcriteria: Vec<Arc<Criterion>>,
}

impl Criterion {
    fn with_kind(description: impl Into<String>, kind: CriterionKind) -> Self {
        Self {
            description: description.into(),
            kind,
            subcriteria: Vec::new(),
        }
    }

    /// A criterion matching every operation
    pub fn universal(description: impl Into<String>) -> Self {
        Self::with_kind(description, CriterionKind::Universal)
    }

    /// A criterion matching when `predicate` returns true
    pub fn predicate<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Operation) -> bool + Send + Sync + 'static,
    {
        Self::with_kind(description, CriterionKind::Predicate(Arc::new(predicate)))
    }

    /// A criterion built from an already shared predicate
    pub fn from_predicate(description: impl Into<String>, predicate: OperationPredicate) -> Self {
        Self::with_kind(description, CriterionKind::Predicate(predicate))
    }

    /// A criterion matching operations carrying all of `tags`
    pub fn including<I, T>(description: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        Self::tagged(description, TagMode::Including, tags)
    }

    /// A criterion matching operations carrying none of `tags`
    pub fn excluding<I, T>(description: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        Self::tagged(description, TagMode::Excluding, tags)
    }

    /// A tag-based criterion with an explicit mode
    pub fn tagged<I, T>(description: impl Into<String>, mode: TagMode, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        let tags = tags.into_iter().map(Into::into).collect();
        Self::with_kind(description, CriterionKind::Tags { mode, tags })
    }

    /// A criterion grouping operations by a derived description
    ///
    /// Subcriteria added to a substitution node become the subcriteria of
    /// every synthesized child.
    pub fn substitution<F>(description: impl Into<String>, substitution: F) -> Self
    where
        F: Fn(&Operation) -> String + Send + Sync + 'static,
    {
        Self::from_substitution(description, Arc::new(substitution))
    }

    /// A substitution criterion built from an already shared function
    pub fn from_substitution(description: impl Into<String>, substitution: SubstitutionFn) -> Self {
        Self::with_kind(
            description,
            CriterionKind::Substitution {
                substitution,
                synthesized: Mutex::new(BTreeMap::new()),
            },
        )
    }

    /// Append a subcriterion
    pub fn with_subcriterion(mut self, subcriterion: Criterion) -> Self {
        self.subcriteria.push(Arc::new(subcriterion));
        self
    }

    /// Append several subcriteria in order
    pub fn with_subcriteria<I>(mut self, subcriteria: I) -> Self
    where
        I: IntoIterator<Item = Criterion>,
    {
        self.subcriteria
            .extend(subcriteria.into_iter().map(Arc::new));
        self
    }

    /// The description, unique among siblings
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The matching rule
    pub fn kind(&self) -> &CriterionKind {
        &self.kind
    }

    /// Declared subcriteria in evaluation order
    pub fn subcriteria(&self) -> &[Arc<Criterion>] {
        &self.subcriteria
    }

    /// Test this node's own rule, ignoring children
    pub fn matched(&self, operation: &Operation) -> bool {
        match &self.kind {
            CriterionKind::Universal | CriterionKind::Substitution { .. } => true,
            CriterionKind::Predicate(predicate) => predicate(operation),
            CriterionKind::Tags {
                mode: TagMode::Including,
                tags,
            } => tags.is_subset(&operation.tags),
            CriterionKind::Tags {
                mode: TagMode::Excluding,
                tags,
            } => tags.is_disjoint(&operation.tags),
        }
    }

    /// Find the direct child the operation is routed to
    ///
    /// Ordinary nodes return the first subcriterion whose own rule matches.
    /// Substitution nodes return the memoized child for the derived
    /// description, creating it on first sight.
    pub fn matched_subcriterion(&self, operation: &Operation) -> Option<Arc<Criterion>> {
        match &self.kind {
            CriterionKind::Substitution {
                substitution,
                synthesized,
            } => {
                let description = substitution(operation);
                let mut synthesized = synthesized.lock().unwrap_or_else(PoisonError::into_inner);
                let child = synthesized.entry(description).or_insert_with_key(|key| {
                    tracing::debug!(
                        parent = %self.description,
                        child = %key,
                        "synthesized subcriterion"
                    );
                    Arc::new(Criterion {
                        description: key.clone(),
                        kind: CriterionKind::Universal,
                        subcriteria: self.subcriteria.clone(),
                    })
                });
                Some(Arc::clone(child))
            }
            _ => self
                .subcriteria
                .iter()
                .find(|subcriterion| subcriterion.matched(operation))
                .cloned(),
        }
    }

    /// Children synthesized so far by a substitution node, by description
    pub fn synthesized(&self) -> Vec<Arc<Criterion>> {
        match &self.kind {
            CriterionKind::Substitution { synthesized, .. } => synthesized
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Check that sibling descriptions are unique throughout the tree
    pub fn validate(&self) -> LogbookResult<()> {
        let mut seen = HashSet::new();
        for subcriterion in &self.subcriteria {
            if !seen.insert(subcriterion.description.as_str()) {
                return Err(LogbookError::DuplicateCriterion {
                    parent: self.description.clone(),
                    description: subcriterion.description.clone(),
                });
            }
            subcriterion.validate()?;
        }
        Ok(())
    }
}
