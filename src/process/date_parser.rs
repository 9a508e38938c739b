use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static US_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2,4})$").expect("US date regex should compile")
});

// Only tried when the value opens with a four-digit year, so `8/10/25`
// never reads as the year 8.
const YEAR_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const YEAR_FIRST_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const TEXT_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
];

/// Posting date of a listing with time-of-day dropped.
///
/// Common machine formats are tried first, then the sheet's hand-typed
/// `M/D/YYYY` / `M/D/YY` form (two-digit years land in 2000–2099).
/// Returns `None` for anything else, including impossible calendar dates.
pub fn parse_posted_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    parse_generic(s).or_else(|| parse_us_date(s))
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }

    let year_first = s.len() >= 4 && s.as_bytes()[..4].iter().all(u8::is_ascii_digit);
    if year_first {
        let parsed = YEAR_FIRST_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|dt| dt.date())
            .or_else(|| {
                YEAR_FIRST_DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            });
        if parsed.is_some() {
            return parsed;
        }
    }
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_us_date(s: &str) -> Option<NaiveDate> {
    let caps = US_DATE.captures(s)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
