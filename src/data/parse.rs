//! Tolerant field parsing for NSE-style exports.
//!
//! NSE option-chain dumps carry thousands separators in numeric columns and
//! `-` / `N/A` placeholders for missing values; timestamps appear in a
//! handful of formats depending on the export path.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Timestamp formats tried in order by [`parse_timestamp`].
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// Date-only formats; rows parsed this way land at midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y"];

/// Clean a numeric field: strips commas and whitespace, maps the NSE
/// missing-value placeholders to `None`.
pub fn clean_numeric(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if matches!(cleaned, "" | "-" | "N/A" | "NA") {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Parse a timestamp string, trying the common NSE formats in order.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(timestamp);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clean_numeric() {
        assert_eq!(clean_numeric("1,234.50"), Some(dec!(1234.50)));
        assert_eq!(clean_numeric("  42 "), Some(dec!(42)));
        assert_eq!(clean_numeric("-1.5"), Some(dec!(-1.5)));
        assert_eq!(clean_numeric("-"), None);
        assert_eq!(clean_numeric("N/A"), None);
        assert_eq!(clean_numeric(""), None);
        assert_eq!(clean_numeric("abc"), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-15 09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("15-Jan-2024 09:15:00"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-15"), Some(expected));
        assert_eq!(parse_timestamp("15-Jan-2024"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
    }
}
