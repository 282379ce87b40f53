//! Business-timezone time helpers
//!
//! Calendar dates are converted to timestamps here; repositories only ever
//! see `i64` Unix millis.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

/// Fallback business timezone
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Ho_Chi_Minh;

/// Longest DST gap searched when a local time is skipped
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Parse an IANA timezone name, falling back to [`DEFAULT_TIMEZONE`]
pub fn parse_timezone(name: &str) -> Tz {
    name.trim().parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!(
            "Invalid BUSINESS_TIMEZONE '{}': {}, falling back to {}",
            name,
            e,
            DEFAULT_TIMEZONE
        );
        DEFAULT_TIMEZONE
    })
}

/// Date + time of day → Unix millis (business timezone)
///
/// A repeated local time resolves to its first occurrence. A skipped local
/// time (DST gap) resolves to the first minute after it that exists.
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    (0..=MAX_GAP_MINUTES)
        .find_map(|minute| {
            (naive + Duration::minutes(minute))
                .and_local_timezone(tz)
                .earliest()
        })
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day → Unix millis (business timezone)
///
/// Midnight when it exists, otherwise the first local instant of the day.
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_time_to_millis(date, NaiveTime::MIN, tz)
}

/// Calendar date of a timestamp in the business timezone
pub fn local_date(millis: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
