//! Loose date string normalization.
//!
//! Listing and birth dates arrive in whatever shape the source list uses:
//! ISO dates, "12 Mar 1964", "03.05.1978", sometimes just a year. Every date
//! field in the model goes through [`parse_date`], which returns the
//! canonical ISO-8601 form (`YYYY-MM-DD`, or the partial `YYYY` / `YYYY-MM`
//! when that is all the source gives) and degrades to `None` on anything it
//! cannot read. A bad date never aborts an ingestion run.

use chrono::NaiveDate;

/// Full-date formats tried in order. Day-first for the numeric forms, which
/// matches the European lists this library was written against.
const FULL_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Normalize a loosely formatted date string.
///
/// Returns `None` for empty or unparseable input rather than an error.
pub fn parse_date(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in FULL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    if let Some(partial) = parse_year_month(text) {
        return Some(partial);
    }

    parse_year(text)
}

/// `YYYY-MM` or `MM/YYYY`, zero-padding the month on the way out.
fn parse_year_month(text: &str) -> Option<String> {
    let (year, month) = match text.split_once('-') {
        Some((y, m)) => (y, m),
        None => {
            let (m, y) = text.split_once('/')?;
            (y, m)
        }
    };
    let year = parse_year(year)?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("{}-{:02}", year, month))
}

/// A bare four-digit year within a sane range.
fn parse_year(text: &str) -> Option<String> {
    if text.len() != 4 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = text.parse().ok()?;
    if (1000..=2999).contains(&year) {
        Some(text.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_round_trip() {
        assert_eq!(parse_date("1964-03-12"), Some("1964-03-12".to_string()));
    }

    #[test]
    fn test_common_source_formats() {
        assert_eq!(parse_date("12 Mar 1964"), Some("1964-03-12".to_string()));
        assert_eq!(parse_date("12 March 1964"), Some("1964-03-12".to_string()));
        assert_eq!(parse_date("Mar 12, 1964"), Some("1964-03-12".to_string()));
        assert_eq!(parse_date("03.05.1978"), Some("1978-05-03".to_string()));
        assert_eq!(parse_date("03/05/1978"), Some("1978-05-03".to_string()));
        assert_eq!(parse_date("1978/05/03"), Some("1978-05-03".to_string()));
    }

    #[test]
    fn test_partial_dates() {
        assert_eq!(parse_date("1964"), Some("1964".to_string()));
        assert_eq!(parse_date("1964-3"), Some("1964-03".to_string()));
        assert_eq!(parse_date("03/1964"), Some("1964-03".to_string()));
        assert_eq!(parse_date("1964-13"), None);
    }

    #[test]
    fn test_garbage_degrades_to_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("unknown"), None);
        assert_eq!(parse_date("circa nineteen-eighty"), None);
        assert_eq!(parse_date("0000"), None);
    }

    #[test]
    fn test_invalid_calendar_dates() {
        assert_eq!(parse_date("2001-02-30"), None);
        assert_eq!(parse_date("31/04/1990"), None);
    }
}
