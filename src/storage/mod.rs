//! Storage layer for criteria-logbook
//!
//! The engine keeps nothing on disk. This layer only reads operation and rule
//! files and writes exported reports.

pub mod file_io;

pub use file_io::{
    from_yaml_str, read_json, read_json_required, read_yaml_required, to_yaml_string,
    write_json_atomic, write_yaml_atomic,
};

use std::path::Path;

use crate::error::LogbookResult;
use crate::models::Operation;

/// Load a JSON array of operations
pub fn load_operations<P: AsRef<Path>>(path: P) -> LogbookResult<Vec<Operation>> {
    let operations: Vec<Operation> = read_json_required(path.as_ref())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        count = operations.len(),
        "operations loaded"
    );
    Ok(operations)
}
