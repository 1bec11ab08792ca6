//! Custom error types for criteria-logbook
//!
//! Every expected domain condition (a rejected operation, a pair that is not a
//! transfer) is a variant of [`LogbookError`] and travels as a value through
//! [`LogbookResult`]. Nothing in the engine panics for these.

use thiserror::Error;

use crate::models::{Currency, OperationId};

/// The main error type for criteria-logbook operations
#[derive(Error, Debug)]
pub enum LogbookError {
    /// A logbook received an operation in a currency other than its own
    #[error("Unexpected currency for operation {operation}: expected {expected}, got {actual}")]
    UnexpectedCurrency {
        operation: OperationId,
        expected: Currency,
        actual: Currency,
    },

    /// The criterion of a logbook node rejected the operation
    #[error("Operation {operation} did not match criterion '{criterion}'")]
    OperationDidNotMatchCriteria {
        operation: OperationId,
        criterion: String,
    },

    /// A matched subcriterion failed to register the operation
    #[error("Operation {operation} did not match subcriteria of '{criterion}': {reason}")]
    OperationDidNotMatchSubcriteria {
        operation: OperationId,
        criterion: String,
        reason: Box<LogbookError>,
    },

    /// The debit leg of a candidate transfer is not negative
    #[error("Source operation {0} is not a withdraw")]
    SourceIsNotAWithdraw(OperationId),

    /// The credit leg of a candidate transfer is not positive
    #[error("Sink operation {0} is not an income")]
    SinkIsNotAnIncome(OperationId),

    /// The legs of a candidate transfer use different currencies
    #[error("Source {source_currency} and sink {sink_currency} have different currencies")]
    SourceAndSinkHaveDifferentCurrencies {
        source_currency: Currency,
        sink_currency: Currency,
    },

    /// No configured transfer criterion accepted the pair
    #[error("No transfer criteria matched operations {source_id} and {sink_id}")]
    NoTransferCriteriaMatched {
        source_id: OperationId,
        sink_id: OperationId,
    },

    /// Arithmetic between two money amounts of different currencies
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// Invalid currency code
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Invalid money literal
    #[error("Invalid money format: {0}")]
    InvalidMoney(String),

    /// Two siblings in a criterion tree share a description
    #[error("Duplicate criterion '{description}' under '{parent}'")]
    DuplicateCriterion { parent: String, description: String },

    /// Rule definition or condition errors
    #[error("Rule error: {0}")]
    Rule(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors for input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Reading or writing a data file failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl LogbookError {
    /// Create a "did not match" error for a criterion
    pub fn did_not_match(operation: OperationId, criterion: impl Into<String>) -> Self {
        Self::OperationDidNotMatchCriteria {
            operation,
            criterion: criterion.into(),
        }
    }

    /// Wrap a child's failure as a subcriteria failure of `criterion`
    pub fn did_not_match_subcriteria(
        operation: OperationId,
        criterion: impl Into<String>,
        reason: LogbookError,
    ) -> Self {
        Self::OperationDidNotMatchSubcriteria {
            operation,
            criterion: criterion.into(),
            reason: Box::new(reason),
        }
    }

    /// Check if this is an expected rejection produced by the engine
    /// (as opposed to configuration or I/O failures)
    pub fn is_domain_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedCurrency { .. }
                | Self::OperationDidNotMatchCriteria { .. }
                | Self::OperationDidNotMatchSubcriteria { .. }
                | Self::SourceIsNotAWithdraw(_)
                | Self::SinkIsNotAnIncome(_)
                | Self::SourceAndSinkHaveDifferentCurrencies { .. }
                | Self::NoTransferCriteriaMatched { .. }
        )
    }

    /// Follow subcriteria wrappers down to the innermost reason
    pub fn root_cause(&self) -> &LogbookError {
        match self {
            Self::OperationDidNotMatchSubcriteria { reason, .. } => reason.root_cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for LogbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LogbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for LogbookError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for criteria-logbook operations
pub type LogbookResult<T> = Result<T, LogbookError>;
