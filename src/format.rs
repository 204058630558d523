//! Display Formatting
//!
//! Pure helpers that turn raw API values into display strings. None of
//! these functions fail: invalid input is replaced by a sentinel string.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use num_format::{Locale, ToFormattedString};

/// Sentinel for values that cannot be displayed
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel for a timestamp that was never recorded
pub const NEVER: &str = "Never";

/// Rendered when a timestamp string cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

const HUNDRED_MILLION: f64 = 100_000_000.0;
const TEN_THOUSAND: f64 = 10_000.0;

/// Magnitude bucket used by [`format_number`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    /// 亿 (10^8)
    HundredMillion,
    /// 万 (10^4)
    TenThousand,
    /// No suffix, locale-grouped
    Unit,
}

impl Magnitude {
    /// Pick the bucket for a value
    pub fn of(value: f64) -> Self {
        if value >= HUNDRED_MILLION {
            Magnitude::HundredMillion
        } else if value >= TEN_THOUSAND {
            Magnitude::TenThousand
        } else {
            Magnitude::Unit
        }
    }

    pub fn divisor(&self) -> f64 {
        match self {
            Magnitude::HundredMillion => HUNDRED_MILLION,
            Magnitude::TenThousand => TEN_THOUSAND,
            Magnitude::Unit => 1.0,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Magnitude::HundredMillion => "亿",
            Magnitude::TenThousand => "万",
            Magnitude::Unit => "",
        }
    }
}

/// Format a share count or amount for display.
///
/// Zero is always `"0"`. Values of at least 10^8 are shown in 亿 and values of
/// at least 10^4 in 万, both with two decimals. Anything smaller is grouped
/// with thousands separators and keeps at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    match Magnitude::of(value) {
        Magnitude::Unit => locale_grouped(value),
        magnitude => format!("{:.2}{}", value / magnitude.divisor(), magnitude.suffix()),
    }
}

/// en-US grouping: `,` every three digits, up to three fraction digits
fn locale_grouped(value: f64) -> String {
    // Past this point three fraction digits no longer fit in a u64 and f64
    // carries no fractional precision anyway.
    if value.abs() >= 1e15 {
        return group_integer_digits(value);
    }

    let scaled = (value.abs() * 1000.0).round() as u64;
    let whole = scaled / 1000;
    let fraction = scaled % 1000;

    let mut out = String::new();
    if value < 0.0 && scaled != 0 {
        out.push('-');
    }
    out.push_str(&whole.to_formatted_string(&Locale::en));

    if fraction != 0 {
        let digits = format!("{:03}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }

    out
}

/// Group the rounded integer part of a large value digit by digit
fn group_integer_digits(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Turn a `YYYYMMDD` string into `YYYY-MM-DD`.
///
/// Missing, empty and `"nan"` input yields `"N/A"`. Input that is too short
/// to slice is returned unchanged.
pub fn format_date(date: Option<&str>) -> String {
    let date = match date {
        Some(d) if !d.is_empty() && d != "nan" => d,
        _ => return NOT_AVAILABLE.to_string(),
    };

    match (date.get(0..4), date.get(4..6), date.get(6..8)) {
        (Some(year), Some(month), Some(day)) => format!("{}-{}-{}", year, month, day),
        _ => date.to_string(),
    }
}

/// Render a timestamp in local time, e.g. `1/15/2024, 10:30:00 AM`.
///
/// Missing or empty input yields `"Never"`.
pub fn format_date_time(timestamp: Option<&str>) -> String {
    let timestamp = match timestamp {
        Some(t) if !t.is_empty() => t,
        _ => return NEVER.to_string(),
    };

    match parse_timestamp(timestamp) {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Accepts the shapes the dashboard server emits: ISO-8601 with or without an
/// offset, HTTP dates from the JSON encoder, and bare dates (taken as UTC).
fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}
