use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Timestamp layouts tried, in order, before falling back to date-only layouts.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, anchored to midnight when matched.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%b. %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse a publication date cell.
///
/// Accepts RFC 3339 / RFC 2822 timestamps (converted to UTC), common
/// `YYYY-MM-DD HH:MM:SS` layouts, and date-only layouts such as `2024-10-15`,
/// `10/15/2024`, `15.10.2024`, and `Oct 15, 2024`. Returns `None` for empty or
/// unrecognized input.
pub fn parse_publication_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
