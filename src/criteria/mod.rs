//! Classification criteria
//!
//! Criteria form a tree of named rules. The tree is usually built by the
//! rule loader in [`crate::rules`], but can be assembled directly in code.

pub mod criterion;

pub use criterion::{Criterion, CriterionKind, OperationPredicate, SubstitutionFn, TagMode};
