//! Report formatting utilities for terminal output

use chrono::{DateTime, Utc};

use crate::models::Money;

/// Format the sum of a logbook, `-` for an empty one
pub fn format_sum(sum: Option<&Money>) -> String {
    sum.map_or_else(|| "-".to_string(), Money::to_string)
}

/// Format an inclusive time range, `-` when unbounded
pub fn format_range(
    from: Option<DateTime<Utc>>,
    till: Option<DateTime<Utc>>,
    date_format: &str,
) -> String {
    match (from, till) {
        (Some(from), Some(till)) => format!(
            "{} .. {}",
            from.format(date_format),
            till.format(date_format)
        ),
        _ => "-".to_string(),
    }
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Indent a label by tree depth
pub fn indent(label: &str, depth: usize) -> String {
    format!("{}{}", "  ".repeat(depth), label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Café au lait", 7), "Café...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Hello", 2), "..");
    }

    #[test]
    fn test_format_sum() {
        let sum = Money::new(dec!(-12.5), Currency::eur());
        assert_eq!(format_sum(Some(&sum)), "-12.50 EUR");
        assert_eq!(format_sum(None), "-");
    }

    #[test]
    fn test_format_range() {
        let from = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let till = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(
            format_range(Some(from), Some(till), "%Y-%m-%d"),
            "2024-01-02 .. 2024-03-04"
        );
        assert_eq!(format_range(None, Some(till), "%Y-%m-%d"), "-");
    }

    #[test]
    fn test_indent_and_separators() {
        assert_eq!(indent("Food", 2), "    Food");
        assert_eq!(separator(3), "───");
        assert_eq!(double_separator(2), "══");
    }
}
