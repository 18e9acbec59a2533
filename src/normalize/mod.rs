//! Field normalization for tracker exports.
//!
//! Tracker spreadsheets arrive with US-style dates and accounting-formatted
//! currency strings. Normalization is tolerant by contract: a value that
//! cannot be parsed becomes `None` (dates) or `0.0` (amounts), never an
//! error.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Date formats seen across tracker exports, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%d-%b-%Y",
];

/// Parse a calendar date from a cell value.
///
/// Returns `None` for blank or unparseable values. Datetime strings are
/// accepted and truncated to their date component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    // Excel exports sometimes render dates as full timestamps.
    for fmt in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Accounting notation: a value wrapped in parentheses is negative.
static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(.*\)$").expect("valid regex"));

/// Parse a currency string into a number.
///
/// Strips `$`, `,` and whitespace; `"(500.00)"` becomes `-500.00`;
/// blank or non-numeric values become `0.0`.
///
/// # Example
/// ```
/// use grantline::normalize::parse_currency;
///
/// assert_eq!(parse_currency("$1,234.50"), 1234.50);
/// assert_eq!(parse_currency("(500.00)"), -500.00);
/// assert_eq!(parse_currency("n/a"), 0.0);
/// ```
pub fn parse_currency(value: &str) -> f64 {
    parse_currency_checked(value).unwrap_or(0.0)
}

/// Like [`parse_currency`], but distinguishes a genuinely non-numeric value
/// (`None`) from a parsed zero. The quality report uses this to count
/// defaulted amounts.
pub fn parse_currency_checked(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let negative = PARENTHESIZED.is_match(trimmed);

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')') && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(n) if negative => Some(-n.abs()),
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

/// Trim a cell value, mapping blank to `None`.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(
            parse_date("2025-04-16"),
            Some(NaiveDate::from_ymd_opt(2025, 4, 16).unwrap())
        );
    }

    #[test]
    fn test_parse_date_us() {
        assert_eq!(
            parse_date("4/16/2025"),
            Some(NaiveDate::from_ymd_opt(2025, 4, 16).unwrap())
        );
        assert_eq!(
            parse_date("12/01/23"),
            Some(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_date_timestamp() {
        assert_eq!(
            parse_date("2025-04-16 00:00:00"),
            Some(NaiveDate::from_ymd_opt(2025, 4, 16).unwrap())
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("TBD"), None);
        assert_eq!(parse_date("13/45/2025"), None);
    }

    #[test]
    fn test_parse_currency_plain() {
        assert_eq!(parse_currency("$1,234.50"), 1234.50);
        assert_eq!(parse_currency("1000"), 1000.0);
        assert_eq!(parse_currency(" $2,000,000 "), 2_000_000.0);
    }

    #[test]
    fn test_parse_currency_accounting_negative() {
        assert_eq!(parse_currency("(500.00)"), -500.00);
        assert_eq!(parse_currency("($1,250.75)"), -1250.75);
    }

    #[test]
    fn test_parse_currency_defaults_to_zero() {
        assert_eq!(parse_currency(""), 0.0);
        assert_eq!(parse_currency("N/A"), 0.0);
        assert_eq!(parse_currency("pending"), 0.0);
    }

    #[test]
    fn test_parse_currency_checked_distinguishes_garbage_from_zero() {
        assert_eq!(parse_currency_checked("$0.00"), Some(0.0));
        assert_eq!(parse_currency_checked("pending"), None);
        assert_eq!(parse_currency_checked(""), None);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  Smith  "), Some("Smith".to_string()));
        assert_eq!(non_blank("   "), None);
    }
}
