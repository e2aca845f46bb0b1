//! Calendar windows and day-key canonicalization.
//!
//! All date math in this crate is timezone-naive and injected-clock based:
//! callers pass "today" in, nothing here reads the system clock. Log entries
//! and "now" can originate from different sources (server UTC vs. browser
//! local time), so comparisons always go through the canonical `yyyy-MM-dd`
//! day key produced by [`day_key`], never raw timestamps.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// Canonical day-key format.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonicalize a calendar date to its `yyyy-MM-dd` day key.
///
/// This is the single canonicalization function; every date comparison in
/// the crate is performed on its output.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Canonicalize a UTC timestamp to its day key.
pub fn day_key_utc(ts: DateTime<Utc>) -> String {
    day_key(ts.date_naive())
}

/// Parse a day key back into a calendar date.
pub fn parse_day_key(key: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .map_err(|_| DateError::InvalidDayKey(key.to_string()))
}

/// Week start convention for this-week/last-week bounds.
///
/// Defaults to ISO Monday; configurable because week boundaries are
/// observably different under a Sunday-start locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// ISO 8601 week start.
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Named rolling windows over which points are aggregated.
///
/// Each window is fetched, refreshed, and invalidated independently
/// ("today" refreshes on window focus far more often than "last 90 days"),
/// so there is no combined query spanning several of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsWindow {
    Today,
    ThisWeek,
    LastWeek,
    LastMonth,
    #[serde(rename = "last_90_days")]
    Last90Days,
}

impl PointsWindow {
    /// All windows, in display order.
    pub const ALL: [PointsWindow; 5] = [
        PointsWindow::Today,
        PointsWindow::ThisWeek,
        PointsWindow::LastWeek,
        PointsWindow::LastMonth,
        PointsWindow::Last90Days,
    ];

    /// Stable wire/display name for the window.
    pub fn label(&self) -> &'static str {
        match self {
            PointsWindow::Today => "today",
            PointsWindow::ThisWeek => "this_week",
            PointsWindow::LastWeek => "last_week",
            PointsWindow::LastMonth => "last_month",
            PointsWindow::Last90Days => "last_90_days",
        }
    }
}

/// An inclusive `[start, end]` pair of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A one-day range.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Whether `day` falls inside the range (inclusive on both ends).
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of days covered, inclusive.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// First day of the week containing `day` under the given convention.
fn start_of_week(day: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = day.weekday().days_since(week_start.weekday());
    day - Duration::days(i64::from(offset))
}

/// Compute the inclusive calendar bounds for a window, given an injected
/// "today".
///
/// This-week and last-week span the full week (the key stays stable across
/// the week); last-month is the previous calendar month; last-90-days is
/// the 90-day range ending today.
pub fn window_bounds(window: PointsWindow, today: NaiveDate, week_start: WeekStart) -> DateRange {
    match window {
        PointsWindow::Today => DateRange::single(today),
        PointsWindow::ThisWeek => {
            let start = start_of_week(today, week_start);
            DateRange {
                start,
                end: start + Duration::days(6),
            }
        }
        PointsWindow::LastWeek => {
            let this_start = start_of_week(today, week_start);
            DateRange {
                start: this_start - Duration::days(7),
                end: this_start - Duration::days(1),
            }
        }
        PointsWindow::LastMonth => {
            let first_of_this_month = today.with_day(1).unwrap_or(today);
            let end = first_of_this_month - Duration::days(1);
            let start = end.with_day(1).unwrap_or(end);
            DateRange { start, end }
        }
        PointsWindow::Last90Days => DateRange {
            start: today - Duration::days(89),
            end: today,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_key_round_trip() {
        let d = date(2024, 6, 10);
        assert_eq!(day_key(d), "2024-06-10");
        assert_eq!(parse_day_key("2024-06-10").unwrap(), d);
    }

    #[test]
    fn test_day_key_rejects_non_canonical() {
        assert!(parse_day_key("06/10/2024").is_err());
        assert!(parse_day_key("2024-6-1x").is_err());
        assert!(parse_day_key("").is_err());
    }

    #[test]
    fn test_day_key_utc_drops_time_of_day() {
        let ts = DateTime::parse_from_rfc3339("2024-06-10T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(day_key_utc(ts), "2024-06-10");
    }

    #[test]
    fn test_today_window() {
        let bounds = window_bounds(PointsWindow::Today, date(2024, 6, 10), WeekStart::Monday);
        assert_eq!(bounds, DateRange::single(date(2024, 6, 10)));
        assert_eq!(bounds.num_days(), 1);
    }

    #[test]
    fn test_this_week_monday_start() {
        // 2024-06-12 is a Wednesday.
        let bounds = window_bounds(PointsWindow::ThisWeek, date(2024, 6, 12), WeekStart::Monday);
        assert_eq!(bounds.start, date(2024, 6, 10));
        assert_eq!(bounds.end, date(2024, 6, 16));
    }

    #[test]
    fn test_this_week_sunday_start() {
        let bounds = window_bounds(PointsWindow::ThisWeek, date(2024, 6, 12), WeekStart::Sunday);
        assert_eq!(bounds.start, date(2024, 6, 9));
        assert_eq!(bounds.end, date(2024, 6, 15));
    }

    #[test]
    fn test_last_week_is_full_week_before_this_one() {
        let bounds = window_bounds(PointsWindow::LastWeek, date(2024, 6, 12), WeekStart::Monday);
        assert_eq!(bounds.start, date(2024, 6, 3));
        assert_eq!(bounds.end, date(2024, 6, 9));
        assert_eq!(bounds.num_days(), 7);
    }

    #[test]
    fn test_last_month_is_previous_calendar_month() {
        let bounds = window_bounds(PointsWindow::LastMonth, date(2024, 3, 15), WeekStart::Monday);
        // February 2024 is a leap month.
        assert_eq!(bounds.start, date(2024, 2, 1));
        assert_eq!(bounds.end, date(2024, 2, 29));
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        let bounds = window_bounds(PointsWindow::LastMonth, date(2024, 1, 5), WeekStart::Monday);
        assert_eq!(bounds.start, date(2023, 12, 1));
        assert_eq!(bounds.end, date(2023, 12, 31));
    }

    #[test]
    fn test_last_90_days_inclusive_length() {
        let bounds = window_bounds(PointsWindow::Last90Days, date(2024, 6, 10), WeekStart::Monday);
        assert_eq!(bounds.end, date(2024, 6, 10));
        assert_eq!(bounds.num_days(), 90);
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let bounds = DateRange {
            start: date(2024, 6, 1),
            end: date(2024, 6, 7),
        };
        assert!(bounds.contains(date(2024, 6, 1)));
        assert!(bounds.contains(date(2024, 6, 7)));
        assert!(!bounds.contains(date(2024, 5, 31)));
        assert!(!bounds.contains(date(2024, 6, 8)));
    }
}
