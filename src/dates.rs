//! Date parsing and formatting for exercise entries.
//!
//! All instants are handled in UTC. Three representations exist:
//! - user input (`date`, `from`, `to`), see [`parse_date_input`]
//! - the storage column, a fixed-width RFC 3339 string so that SQL range
//!   comparisons on the text are chronological
//! - the calendar string returned by the API, e.g. `Mon Jan 01 2024`

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const CALENDAR_FORMAT: &str = "%a %b %d %Y";

const NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Years representable in the fixed-width storage column.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Parses a date supplied by a client.
///
/// Accepted forms:
/// - RFC 3339 (`2023-01-15T10:00:00Z`, `2023-01-15T10:00:00+02:00`)
/// - a calendar date (`2023-01-15`, `2023/01/15`, `01/15/2023`, `January 15, 2023`,
///   `Jan 15, 2023`, `15 January 2023`), taken as midnight UTC
/// - a date-time without offset (`2023-01-15T10:00`, `2023-01-15 10:00:00`), taken as UTC
///
/// Returns `None` for anything else, and for years outside `0000..=9999`.
pub fn parse_date_input(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_any(s).filter(|dt| (MIN_YEAR..=MAX_YEAR).contains(&dt.year()))
}

fn parse_any(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(date) = DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok()) {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `Sun Jan 15 2023`
pub fn format_calendar_date(dt: &DateTime<Utc>) -> String {
    dt.format(CALENDAR_FORMAT).to_string()
}

pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

pub fn from_storage(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_bare_date_is_utc_midnight() {
        let dt = parse_date_input("2023-01-15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 1, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn test_parse_rfc3339_with_offset_converts_to_utc() {
        let dt = parse_date_input("2023-01-15T01:30:00+02:00").unwrap();
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_naive_datetimes() {
        let a = parse_date_input("2023-01-15T10:00").unwrap();
        let b = parse_date_input("2023-01-15 10:00:00").unwrap();
        let c = parse_date_input("2023-01-15T10:00:00.250").unwrap();
        assert_eq!(a, b);
        assert_eq!(c.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date_input("").is_none());
        assert!(parse_date_input("   ").is_none());
        assert!(parse_date_input("yesterday").is_none());
        assert!(parse_date_input("2023-13-01").is_none());
        assert!(parse_date_input("2023-02-30").is_none());
    }

    #[test]
    fn test_parse_common_calendar_spellings() {
        let expected = parse_date_input("2023-01-15").unwrap();
        for input in ["2023/01/15", "01/15/2023", "January 15, 2023", "Jan 15, 2023", "15 January 2023"] {
            assert_eq!(parse_date_input(input), Some(expected), "input {:?}", input);
        }
        assert_eq!(parse_date_input("2023/01/15 10:00:00").unwrap().hour(), 10);
    }

    #[test]
    fn test_parse_rejects_years_outside_storage_range() {
        assert!(parse_date_input("-0001-01-01").is_none());
        assert!(parse_date_input("+12345-01-01").is_none());
        assert!(parse_date_input("-0001-01-01T00:00:00").is_none());
        assert!(parse_date_input("12345-01-01 10:00").is_none());

        let first = parse_date_input("0000-01-01").unwrap();
        let last = parse_date_input("9999-12-31T23:59:59.999Z").unwrap();
        assert_eq!(from_storage(&to_storage(&first)).unwrap(), first);
        assert!(to_storage(&first) < to_storage(&last));
    }

    #[test]
    fn test_calendar_format() {
        let dt = parse_date_input("2024-01-01").unwrap();
        assert_eq!(format_calendar_date(&dt), "Mon Jan 01 2024");
        let dt = parse_date_input("2023-01-15").unwrap();
        assert_eq!(format_calendar_date(&dt), "Sun Jan 15 2023");
    }

    #[test]
    fn test_storage_format_is_fixed_width_and_reversible() {
        let dt = parse_date_input("2023-01-15T10:00:00.5Z").unwrap();
        let stored = to_storage(&dt);
        assert_eq!(stored, "2023-01-15T10:00:00.500Z");
        assert_eq!(from_storage(&stored).unwrap(), dt);

        let midnight = to_storage(&parse_date_input("2023-01-15").unwrap());
        assert_eq!(midnight.len(), stored.len());
    }

    #[test]
    fn test_storage_strings_sort_chronologically() {
        let early = to_storage(&parse_date_input("2023-01-15T09:59:59.999Z").unwrap());
        let late = to_storage(&parse_date_input("2023-01-15T10:00:00Z").unwrap());
        assert!(early < late);
    }
}
