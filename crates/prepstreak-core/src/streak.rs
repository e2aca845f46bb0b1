//! Consecutive-day study streak calculation.
//!
//! The streak is derived from a sparse log of study dates: count backwards
//! from "today" while each day is present, stop at the first gap. A user
//! who has not studied yet today is still on a streak from prior days --
//! today is excluded from the count, not treated as a break.
//!
//! The walk is capped at a bounded horizon so cost stays bounded no matter
//! how large the log is; "today" is always caller-injected for
//! determinism.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::day_key;

/// Default upper bound on the backwards scan, in days.
pub const DEFAULT_STREAK_HORIZON_DAYS: u32 = 100;

/// One entry per distinct day the user performed qualifying study
/// activity. Entries are created server-side and read-only here; duplicate
/// dates within a collection are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDayLogEntry {
    pub study_date: NaiveDate,
}

impl StudyDayLogEntry {
    pub fn new(study_date: NaiveDate) -> Self {
        Self { study_date }
    }
}

/// Count the current consecutive-day streak ending at or immediately
/// before `today`.
///
/// Duplicates collapse, future-dated entries never contribute, and an
/// empty log yields 0. Gaps beyond `horizon_days` are not inspected.
pub fn current_streak(entries: &[StudyDayLogEntry], today: NaiveDate, horizon_days: u32) -> u32 {
    if entries.is_empty() {
        return 0;
    }
    let logged: HashSet<String> = entries.iter().map(|e| day_key(e.study_date)).collect();

    // If today is not logged yet, start scanning at yesterday instead.
    let mut offset: i64 = if logged.contains(&day_key(today)) { 0 } else { 1 };

    let mut count = 0u32;
    while count < horizon_days {
        let day = today - Duration::days(offset);
        if !logged.contains(&day_key(day)) {
            break;
        }
        count += 1;
        offset += 1;
    }
    count
}

/// Streak calculator carrying the configured scan horizon.
#[derive(Debug, Clone)]
pub struct StreakCalculator {
    horizon_days: u32,
}

impl StreakCalculator {
    /// Create a calculator with the default horizon.
    pub fn new() -> Self {
        Self {
            horizon_days: DEFAULT_STREAK_HORIZON_DAYS,
        }
    }

    /// Create a calculator with a custom horizon (minimum 1).
    pub fn with_horizon(horizon_days: u32) -> Self {
        Self {
            horizon_days: horizon_days.max(1),
        }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// See [`current_streak`].
    pub fn current_streak(&self, entries: &[StudyDayLogEntry], today: NaiveDate) -> u32 {
        current_streak(entries, today, self.horizon_days)
    }
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::new()
    }
}
