//! Display formatting for terminal output

pub mod report;

pub use report::{
    double_separator, format_range, format_sum, indent, separator, truncate,
};
