//! Display formatting helpers

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder for missing optional values
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Format a timestamp as `M/D/YYYY`.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates; anything else is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The value, or `-` when it is missing or blank
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => EMPTY_PLACEHOLDER,
    }
}

/// Average rating with one decimal place
pub fn format_rating(average: f64) -> String {
    format!("{:.1}", average)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05T10:00:00.000Z"), "3/5/2024");
        assert_eq!(format_date("2024-11-25 08:15:00"), "11/25/2024");
        assert_eq!(format_date("2024-01-09"), "1/9/2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("1 Main St")), "1 Main St");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(None), "-");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(4.26), "4.3");
        assert_eq!(format_rating(0.0), "0.0");
        assert_eq!(format_rating(3.96), "4.0");
    }
}
