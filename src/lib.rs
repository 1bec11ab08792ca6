//! criteria-logbook - rule-based classification of financial operations
//!
//! Operations are routed through a tree of criteria into a tree of
//! single-currency, time-ordered logbooks, and pairs of operations moving
//! money between the user's own budgets are detected as transfers.
//!
//! # Architecture
//!
//! - `models`: Money, currencies, tags, ids and the operation record
//! - `criteria`: the criterion tree (universal, predicate, tag and substitution nodes)
//! - `logbook`: the flat logbook and the criteria-based logbook tree
//! - `transfers`: transfer criteria, the pair detector and the stream builder
//! - `rules`: user-authored conditions and criterion trees as YAML data
//! - `config`, `storage`: paths, settings and file I/O
//! - `reports`, `display`, `cli`: the command-line surface
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logbook::criteria::Criterion;
//! use logbook::logbook::CriteriaBasedLogbook;
//!
//! let tree = Criterion::universal("All").with_subcriterion(
//!     Criterion::predicate("Income", |op: &logbook::models::Operation| op.is_income()),
//! );
//! let mut book = CriteriaBasedLogbook::new(tree);
//! book.register(Arc::new(operation))?;
//! ```

use std::sync::Once;

pub mod cli;
pub mod config;
pub mod criteria;
pub mod display;
pub mod error;
pub mod logbook;
pub mod models;
pub mod reports;
pub mod rules;
pub mod storage;
pub mod transfers;

pub use error::{LogbookError, LogbookResult};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` wins over `default_filter` when set. Later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
