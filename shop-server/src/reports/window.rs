//! Calendar month aggregation window

use crate::utils::time::{day_start_millis, local_date};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 9999;

/// Client-facing validation message (Vietnamese console)
pub const INVALID_PARAMS_MESSAGE: &str =
    "Tham số không hợp lệ. Yêu cầu: month (1-12) và year (>=2000)";

/// Raw `?month=&year=` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// One calendar month in the business timezone
///
/// `[start_millis, end_millis]` runs from 00:00:00.000 on day 1 to
/// 23:59:59.999 on the last day, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub month: u32,
    pub year: i32,
    pub tz: Tz,
    pub start_millis: i64,
    pub end_millis: i64,
    first_day: NaiveDate,
    days: u32,
}

impl MonthWindow {
    pub fn new(month: u32, year: i32, tz: Tz) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(invalid(ErrorCode::InvalidReportMonth, "month"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid(ErrorCode::InvalidReportYear, "year"));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| invalid(ErrorCode::InvalidReportMonth, "month"))?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| invalid(ErrorCode::InvalidReportYear, "year"))?;

        Ok(Self {
            month,
            year,
            tz,
            start_millis: day_start_millis(first_day, tz),
            end_millis: day_start_millis(next_first, tz) - 1,
            first_day,
            days: (next_first - first_day).num_days() as u32,
        })
    }

    /// Validate query parameters: required, trimmed base-10 integers
    pub fn parse(month: Option<&str>, year: Option<&str>, tz: Tz) -> AppResult<Self> {
        let month = month
            .and_then(|m| m.trim().parse::<u32>().ok())
            .ok_or_else(|| invalid(ErrorCode::InvalidReportMonth, "month"))?;
        let year = year
            .and_then(|y| y.trim().parse::<i32>().ok())
            .ok_or_else(|| invalid(ErrorCode::InvalidReportYear, "year"))?;
        Self::new(month, year, tz)
    }

    pub fn from_query(query: &MonthQuery, tz: Tz) -> AppResult<Self> {
        Self::parse(query.month.as_deref(), query.year.as_deref(), tz)
    }

    /// Number of calendar days in the month
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Every date of the month, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first_day.iter_days().take(self.days as usize)
    }

    pub fn contains(&self, millis: i64) -> bool {
        (self.start_millis..=self.end_millis).contains(&millis)
    }

    /// Day of month (1-based) a timestamp falls on, if inside the window
    pub fn day_of(&self, millis: i64) -> Option<u32> {
        if !self.contains(millis) {
            return None;
        }
        local_date(millis, self.tz).map(|date| date.day())
    }

    /// `baocao-thang-MM-YYYY.xlsx`
    pub fn file_name(&self) -> String {
        format!("baocao-thang-{:02}-{}.xlsx", self.month, self.year)
    }
}

fn invalid(code: ErrorCode, field: &str) -> AppError {
    AppError::with_message(code, INVALID_PARAMS_MESSAGE).with_detail("field", field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::DEFAULT_TIMEZONE as VN;

    #[test]
    fn test_leap_february_has_29_days() {
        let window = MonthWindow::new(2, 2024, VN).unwrap();
        assert_eq!(window.days(), 29);
        let dates: Vec<_> = window.dates().collect();
        assert_eq!(dates.len(), 29);
        assert_eq!(dates[28], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert_eq!(MonthWindow::new(2, 2023, VN).unwrap().days(), 28);
        assert_eq!(MonthWindow::new(12, 2024, VN).unwrap().days(), 31);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        // 2024-03-01 00:00 +07:00
        assert_eq!(window.start_millis, 1_709_226_000_000);
        // 2024-03-31 23:59:59.999 +07:00
        assert_eq!(window.end_millis, 1_711_904_399_999);
        assert!(window.contains(window.start_millis));
        assert!(window.contains(window.end_millis));
        assert!(!window.contains(window.end_millis + 1));
        assert!(!window.contains(window.start_millis - 1));
        assert_eq!(window.day_of(window.start_millis), Some(1));
        assert_eq!(window.day_of(window.end_millis), Some(31));
        assert_eq!(window.day_of(window.end_millis + 1), None);
    }

    #[test]
    fn test_month_starting_in_dst_gap() {
        // Asuncion skips 2017-10-01 00:00 -04, the day starts at 01:00 -03
        let tz = chrono_tz::America::Asuncion;
        let october = MonthWindow::new(10, 2017, tz).unwrap();
        assert_eq!(october.start_millis, 1_506_830_400_000);

        // 2017-09-30 21:00 -04 belongs to September
        let late_september_order = 1_506_819_600_000;
        assert!(!october.contains(late_september_order));
        assert_eq!(october.day_of(late_september_order), None);

        let september = MonthWindow::new(9, 2017, tz).unwrap();
        assert_eq!(september.end_millis, 1_506_830_399_999);
        assert_eq!(september.day_of(late_september_order), Some(30));
        assert_eq!(october.day_of(october.start_millis), Some(1));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let cases = [
            (None, Some("2024")),
            (Some("13"), Some("2024")),
            (Some("0"), Some("2024")),
            (Some("abc"), Some("2024")),
            (Some("3.5"), Some("2024")),
            (Some("3"), None),
            (Some("3"), Some("1999")),
            (Some("3"), Some("10000")),
            (Some("3"), Some("20x4")),
        ];
        for (month, year) in cases {
            let err = MonthWindow::parse(month, year, VN).unwrap_err();
            assert_eq!(err.message, INVALID_PARAMS_MESSAGE);
            assert!(err.is_client_error(), "{:?}/{:?}", month, year);
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let window = MonthWindow::parse(Some(" 07 "), Some("2025 "), VN).unwrap();
        assert_eq!((window.month, window.year), (7, 2025));
    }

    #[test]
    fn test_file_name_is_zero_padded() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        assert_eq!(window.file_name(), "baocao-thang-03-2024.xlsx");
        let window = MonthWindow::new(11, 2024, VN).unwrap();
        assert_eq!(window.file_name(), "baocao-thang-11-2024.xlsx");
    }
}
