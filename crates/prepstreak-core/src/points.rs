//! Windowed point totals read model.
//!
//! Each window is an independently fetched and cached query keyed by
//! `(window, start, end)`. Windows are never combined into one request:
//! they are requested, refreshed, and invalidated on their own cadence
//! ("today" refreshes on window focus far more often than "last 90 days").
//!
//! Read contract: a window with no cached or fetched data resolves to 0,
//! never to an optional, so arithmetic over several windows never branches
//! on nullability.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dates::{window_bounds, DateRange, PointsWindow, WeekStart};

/// One day's point total as reported by the backend. Sparse: a day with no
/// activity is absent rather than present with 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPointSummary {
    pub date: NaiveDate,
    pub total_points: u32,
}

/// Cache key for one windowed points query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowQueryKey {
    pub window: PointsWindow,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WindowQueryKey {
    pub fn new(window: PointsWindow, bounds: DateRange) -> Self {
        Self {
            window,
            start: bounds.start,
            end: bounds.end,
        }
    }

    pub fn bounds(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    /// Not yet fetched, or invalidated. Reads as 0.
    Pending,
    Loaded(u32),
}

#[derive(Debug, Clone)]
struct WindowSlot {
    key: WindowQueryKey,
    state: SlotState,
}

/// Merged read model over the per-window point queries.
///
/// The fetch layer asks [`PointsAggregator::query_key`] what to request,
/// performs the fetch, and records the result; results whose key no longer
/// matches the slot (the owning view navigated away, or the date rolled
/// over) are discarded on arrival.
#[derive(Debug, Clone)]
pub struct PointsAggregator {
    slots: HashMap<PointsWindow, WindowSlot>,
    week_start: WeekStart,
    today: NaiveDate,
}

impl PointsAggregator {
    pub fn new(today: NaiveDate, week_start: WeekStart) -> Self {
        let mut slots = HashMap::new();
        for window in PointsWindow::ALL {
            slots.insert(
                window,
                WindowSlot {
                    key: WindowQueryKey::new(window, window_bounds(window, today, week_start)),
                    state: SlotState::Pending,
                },
            );
        }
        Self {
            slots,
            week_start,
            today,
        }
    }

    /// The key (window plus bounds) the fetch layer should query next for
    /// this window.
    pub fn query_key(&self, window: PointsWindow) -> WindowQueryKey {
        self.slots[&window].key
    }

    /// Total for a window. Unknown, loading, and invalidated windows
    /// resolve to 0, never to an optional.
    pub fn total(&self, window: PointsWindow) -> u32 {
        match self.slots[&window].state {
            SlotState::Loaded(total) => total,
            SlotState::Pending => 0,
        }
    }

    pub fn is_loaded(&self, window: PointsWindow) -> bool {
        matches!(self.slots[&window].state, SlotState::Loaded(_))
    }

    /// Record a pre-aggregated total. Returns false (and stores nothing)
    /// when the result's key no longer matches the slot's current key.
    pub fn record_total(&mut self, key: WindowQueryKey, total: u32) -> bool {
        let Some(slot) = self.slots.get_mut(&key.window) else {
            return false;
        };
        if slot.key != key {
            debug!(
                "discarding stale points result for '{}' window",
                key.window.label()
            );
            return false;
        }
        slot.state = SlotState::Loaded(total);
        true
    }

    /// Record sparse per-day summaries for a window, summing only the days
    /// inside the window's bounds.
    pub fn record_summaries(&mut self, key: WindowQueryKey, summaries: &[DailyPointSummary]) -> bool {
        let bounds = key.bounds();
        let total = summaries
            .iter()
            .filter(|s| bounds.contains(s.date))
            .map(|s| s.total_points)
            .sum();
        self.record_total(key, total)
    }

    /// Drop one window back to pending; its next read is 0 until the fetch
    /// layer records a fresh result.
    pub fn invalidate(&mut self, window: PointsWindow) {
        if let Some(slot) = self.slots.get_mut(&window) {
            slot.state = SlotState::Pending;
        }
    }

    /// Drop every window back to pending.
    pub fn invalidate_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.state = SlotState::Pending;
        }
    }

    /// Recompute every window's bounds for a new "today". Slots whose
    /// bounds actually changed fall back to pending under the new key;
    /// slots with unchanged bounds keep their cached total.
    pub fn rekey(&mut self, today: NaiveDate) {
        self.today = today;
        let week_start = self.week_start;
        for (window, slot) in self.slots.iter_mut() {
            let key = WindowQueryKey::new(*window, window_bounds(*window, today, week_start));
            if slot.key != key {
                slot.key = key;
                slot.state = SlotState::Pending;
            }
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn aggregator() -> PointsAggregator {
        PointsAggregator::new(date(2024, 6, 12), WeekStart::Monday)
    }

    #[test]
    fn test_unfetched_windows_read_zero() {
        let agg = aggregator();
        for window in PointsWindow::ALL {
            assert_eq!(agg.total(window), 0);
            assert!(!agg.is_loaded(window));
        }
        // Summing every window is always total-defined.
        let sum: u32 = PointsWindow::ALL.iter().map(|w| agg.total(*w)).sum();
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_record_total_then_read() {
        let mut agg = aggregator();
        let key = agg.query_key(PointsWindow::Today);
        assert!(agg.record_total(key, 120));
        assert_eq!(agg.total(PointsWindow::Today), 120);
        // Other windows stay independent.
        assert_eq!(agg.total(PointsWindow::ThisWeek), 0);
    }

    #[test]
    fn test_record_summaries_sums_in_bounds_days_only() {
        let mut agg = aggregator();
        let key = agg.query_key(PointsWindow::ThisWeek);
        let summaries = vec![
            DailyPointSummary {
                date: date(2024, 6, 10),
                total_points: 30,
            },
            DailyPointSummary {
                date: date(2024, 6, 12),
                total_points: 45,
            },
            // Outside this week; ignored.
            DailyPointSummary {
                date: date(2024, 6, 3),
                total_points: 500,
            },
        ];
        assert!(agg.record_summaries(key, &summaries));
        assert_eq!(agg.total(PointsWindow::ThisWeek), 75);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut agg = aggregator();
        let old_key = agg.query_key(PointsWindow::Today);
        // The date rolls over before the response arrives.
        agg.rekey(date(2024, 6, 13));
        assert!(!agg.record_total(old_key, 99));
        assert_eq!(agg.total(PointsWindow::Today), 0);
    }

    #[test]
    fn test_invalidate_resets_to_zero() {
        let mut agg = aggregator();
        let key = agg.query_key(PointsWindow::Last90Days);
        agg.record_total(key, 1000);
        agg.invalidate(PointsWindow::Last90Days);
        assert_eq!(agg.total(PointsWindow::Last90Days), 0);
        assert!(!agg.is_loaded(PointsWindow::Last90Days));
    }

    #[test]
    fn test_rekey_keeps_windows_with_unchanged_bounds() {
        let mut agg = aggregator();
        let week_key = agg.query_key(PointsWindow::ThisWeek);
        let today_key = agg.query_key(PointsWindow::Today);
        agg.record_total(week_key, 200);
        agg.record_total(today_key, 50);

        // Next day, same week: "today" re-pends, "this week" survives.
        agg.rekey(date(2024, 6, 13));
        assert_eq!(agg.total(PointsWindow::Today), 0);
        assert_eq!(agg.total(PointsWindow::ThisWeek), 200);
    }

    #[test]
    fn test_query_key_carries_window_bounds() {
        let agg = aggregator();
        let key = agg.query_key(PointsWindow::LastWeek);
        assert_eq!(key.start, date(2024, 6, 3));
        assert_eq!(key.end, date(2024, 6, 9));
    }
}
