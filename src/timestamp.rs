//! Timestamp Grammar
//!
//! Shared parsing and canonical rendering of instants. The dataset loader and
//! the query normalizer both go through here, so a reading's timestamp and a
//! query bound spelled the same way always land on the same instant.
//!
//! Accepted inputs (surrounding whitespace is ignored):
//!
//! ```text
//! 2024-01-15T10:30:00Z          RFC 3339, any offset
//! 2024-01-15T10:30:00+0200      basic offset, `T` or space separator
//! 2024-01-15T10:30Z             minute precision, `Z` or an offset
//! 2024-01-15T10:30:00.250       naive, fractional seconds optional
//! 2024-01-15 10:30:00
//! 2024-01-15T10:30 / 2024-01-15 10:30
//! 2024-01-15 / 2024/01/15       midnight
//! 2024/01/15 10:30:00
//! 20240115 / 20240115T103000Z   ISO basic
//! ```
//!
//! Naive values are taken as UTC. Day/month-first forms like `01/02/2024` are
//! rejected since they cannot be read unambiguously.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const BASIC_OFFSET_FORMATS: &[&str] = &["%Y%m%dT%H%M%S%:z", "%Y%m%dT%H%M%S%z"];

const BASIC_DATETIME_FORMATS: &[&str] = &["%Y%m%dT%H%M%S"];

const BASIC_DATE_FORMATS: &[&str] = &["%Y%m%d"];

/// Parse a timestamp string into a UTC instant.
///
/// Returns `None` when the input matches none of the supported spellings.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let (offset_formats, datetime_formats, date_formats) = if has_basic_shape(s) {
        (BASIC_OFFSET_FORMATS, BASIC_DATETIME_FORMATS, BASIC_DATE_FORMATS)
    } else {
        (OFFSET_FORMATS, DATETIME_FORMATS, DATE_FORMATS)
    };

    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // A `Z` suffix is UTC and only follows a time of day
    if let Some(naive) = s.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return parse_naive_datetime(naive, datetime_formats);
    }

    if let Some(dt) = parse_naive_datetime(s, datetime_formats) {
        return Some(dt);
    }

    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

fn parse_naive_datetime(s: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// ISO basic spellings: exactly `YYYYMMDD`, optionally followed by
/// `THHMMSS` and a zone. Numeric fields without separators parse with
/// variable width, so `2024011` must not reach the basic formats.
fn has_basic_shape(s: &str) -> bool {
    let digits = |part: Option<&str>| part.is_some_and(|p| p.bytes().all(|b| b.is_ascii_digit()));

    if !digits(s.get(..8)) {
        return false;
    }
    if s.len() == 8 {
        return true;
    }

    s.get(8..9) == Some("T")
        && digits(s.get(9..15))
        && s.get(15..)
            .is_some_and(|zone| !zone.starts_with(|c: char| c.is_ascii_digit()))
}

/// Render an instant in its canonical ISO-8601 form.
///
/// Always UTC with a `Z` suffix; fractional seconds appear only when non-zero.
pub fn canonical_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024-01-15"), Some(utc(2024, 1, 15, 0, 0, 0)));
        assert_eq!(parse_timestamp("2024/01/15"), Some(utc(2024, 1, 15, 0, 0, 0)));
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = Some(utc(2024, 1, 15, 10, 30, 0));
        assert_eq!(parse_timestamp("2024-01-15T10:30:00"), expected);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00"), expected);
        assert_eq!(parse_timestamp("2024-01-15T10:30"), expected);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z"), expected);
        assert_eq!(parse_timestamp("  2024-01-15T10:30:00Z \n"), expected);
        assert_eq!(parse_timestamp("2024-01-15T12:30:00+02:00"), expected);
        assert_eq!(parse_timestamp("2024-01-15 12:30:00+02:00"), expected);

        // Minute precision with a zone
        assert_eq!(parse_timestamp("2024-01-15T10:30Z"), expected);
        assert_eq!(parse_timestamp("2024-01-15 10:30Z"), expected);
        assert_eq!(parse_timestamp("2024-01-15 12:30+02:00"), expected);
        assert_eq!(parse_timestamp("2024-01-15T05:30-05:00"), expected);

        // Offsets without a colon
        assert_eq!(parse_timestamp("2024-01-15T12:30:00+0200"), expected);
        assert_eq!(parse_timestamp("2024-01-15 12:30+0200"), expected);

        // ISO basic
        assert_eq!(parse_timestamp("20240115T103000"), expected);
        assert_eq!(parse_timestamp("20240115T103000Z"), expected);
        assert_eq!(parse_timestamp("20240115T123000+0200"), expected);
    }

    #[test]
    fn test_parse_basic_date() {
        assert_eq!(parse_timestamp("20240115"), Some(utc(2024, 1, 15, 0, 0, 0)));
        assert_eq!(parse_timestamp("2024011"), None);
        assert_eq!(parse_timestamp("202401150"), None);
        assert_eq!(parse_timestamp("20241315"), None);
    }

    #[test]
    fn test_zulu_suffix_needs_a_time() {
        assert_eq!(parse_timestamp("2024-01-15Z"), None);
        assert_eq!(parse_timestamp("Z"), None);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = parse_timestamp("2024-01-15T10:30:00.250").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
        assert_eq!(parse_timestamp("01/02/2024"), None);
    }

    #[test]
    fn test_canonical_iso() {
        assert_eq!(canonical_iso(&utc(2024, 1, 15, 0, 0, 0)), "2024-01-15T00:00:00Z");

        let ts = parse_timestamp("2024-01-15T10:30:00.250").unwrap();
        assert_eq!(canonical_iso(&ts), "2024-01-15T10:30:00.250Z");
    }

    #[test]
    fn test_equivalent_spellings_share_canonical_form() {
        let a = parse_timestamp("2024-01-15").unwrap();
        let b = parse_timestamp(" 2024-01-15T00:00:00Z").unwrap();
        let c = parse_timestamp("2024-01-15 02:00:00+02:00").unwrap();
        assert_eq!(canonical_iso(&a), canonical_iso(&b));
        assert_eq!(canonical_iso(&a), canonical_iso(&c));
    }
}
