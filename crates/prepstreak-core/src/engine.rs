//! Composition root wiring the profile store, guard ledger, and windowed
//! points read model behind one object.
//!
//! The outer client owns fetching and rendering; it hands results in and
//! reads models out. `observe_outcome` is the render-side effect from the
//! result view: safe to call on every render with the same outcome, it
//! applies deltas at most once per attempt.

use chrono::NaiveDate;

use crate::cache::QueryInvalidator;
use crate::config::EngineConfig;
use crate::dates::PointsWindow;
use crate::outcome::SessionOutcome;
use crate::points::{DailyPointSummary, PointsAggregator, WindowQueryKey};
use crate::profile::{ProfileStore, UserProfile};
use crate::reconcile::{reconcile, GuardLedger, ReconcileReport};
use crate::streak::{current_streak, StudyDayLogEntry};

/// The gamification engine: one per client process.
pub struct GamificationEngine<S, I> {
    config: EngineConfig,
    store: S,
    invalidator: I,
    ledger: GuardLedger,
    points: PointsAggregator,
}

impl<S, I> GamificationEngine<S, I>
where
    S: ProfileStore,
    I: QueryInvalidator,
{
    pub fn new(config: EngineConfig, store: S, invalidator: I, today: NaiveDate) -> Self {
        let points = PointsAggregator::new(today, config.week_start);
        Self {
            config,
            store,
            invalidator,
            ledger: GuardLedger::new(),
            points,
        }
    }

    /// Run the reconciling side effect for an outcome. Idempotent per
    /// attempt; a call before the profile store hydrates is a no-op that
    /// retries naturally on the next render.
    pub fn observe_outcome(&mut self, outcome: &SessionOutcome) -> ReconcileReport {
        reconcile(
            outcome,
            &mut self.store,
            &mut self.ledger,
            &mut self.invalidator,
        )
    }

    /// Current profile snapshot, if the store has hydrated.
    pub fn profile(&self) -> Option<UserProfile> {
        self.store.get()
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn invalidator(&self) -> &I {
        &self.invalidator
    }

    /// Windowed points read model.
    pub fn points(&self) -> &PointsAggregator {
        &self.points
    }

    pub fn points_total(&self, window: PointsWindow) -> u32 {
        self.points.total(window)
    }

    /// Key the fetch layer should use for its next windowed points query.
    pub fn points_query_key(&self, window: PointsWindow) -> WindowQueryKey {
        self.points.query_key(window)
    }

    /// Hand a fetched windowed result to the read model. Stale results
    /// (key no longer current) are discarded.
    pub fn record_points(&mut self, key: WindowQueryKey, summaries: &[DailyPointSummary]) -> bool {
        self.points.record_summaries(key, summaries)
    }

    /// Drop all windowed totals back to pending (e.g. after the fetch
    /// layer refetched the underlying summaries).
    pub fn reset_points(&mut self) {
        self.points.invalidate_all();
    }

    /// Advance the injected clock; window bounds that changed re-pend.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.points.rekey(today);
    }

    /// Current streak from a study-day log, using the configured horizon.
    pub fn streak_from_log(&self, entries: &[StudyDayLogEntry], today: NaiveDate) -> u32 {
        current_streak(entries, today, self.config.streak_horizon_days)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachedQuery, RecordingInvalidator};
    use crate::outcome::StreakInfo;
    use crate::profile::{InMemoryProfileStore, UserProfile};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> GamificationEngine<InMemoryProfileStore, RecordingInvalidator> {
        GamificationEngine::new(
            EngineConfig::default(),
            InMemoryProfileStore::new(),
            RecordingInvalidator::new(),
            date(2024, 6, 10),
        )
    }

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            attempt_id: Uuid::new_v4(),
            overall_score: Some(90.0),
            correct_answers: 18,
            incorrect_answers: 1,
            skipped_answers: 1,
            total_questions: 20,
            points_from_completion: 50,
            points_from_correct_answers: 90,
            total_points_earned: 140,
            streak_info: Some(StreakInfo {
                current_days: 6,
                updated: true,
            }),
            badges_won: Vec::new(),
            level_determined: false,
            is_fallback: false,
        }
    }

    #[test]
    fn test_observe_before_hydration_then_after() {
        let mut engine = engine();
        let outcome = outcome();

        assert!(!engine.observe_outcome(&outcome).is_applied());

        engine.store_mut().hydrate(UserProfile {
            id: Uuid::new_v4(),
            display_name: String::new(),
            points: 0,
            current_streak_days: 5,
            level_determined: true,
        });
        assert!(engine.observe_outcome(&outcome).is_applied());
        let profile = engine.profile().unwrap();
        assert_eq!(profile.points, 140);
        assert_eq!(profile.current_streak_days, 6);
        assert!(engine.invalidator().contains(CachedQuery::WindowedPoints));

        // Re-render with the same outcome: no second application.
        assert!(!engine.observe_outcome(&outcome).is_applied());
        assert_eq!(engine.profile().unwrap().points, 140);
    }

    #[test]
    fn test_points_flow_through_engine() {
        let mut engine = engine();
        let key = engine.points_query_key(PointsWindow::Today);
        assert!(engine.record_points(
            key,
            &[DailyPointSummary {
                date: date(2024, 6, 10),
                total_points: 35,
            }],
        ));
        assert_eq!(engine.points_total(PointsWindow::Today), 35);

        engine.set_today(date(2024, 6, 11));
        assert_eq!(engine.points_total(PointsWindow::Today), 0);
    }

    #[test]
    fn test_streak_uses_configured_horizon() {
        let config = EngineConfig {
            streak_horizon_days: 2,
            ..Default::default()
        };
        let engine = GamificationEngine::new(
            config,
            InMemoryProfileStore::new(),
            RecordingInvalidator::new(),
            date(2024, 6, 10),
        );
        let entries: Vec<StudyDayLogEntry> = (0u32..5)
            .map(|offset| StudyDayLogEntry::new(date(2024, 6, 10 - offset)))
            .collect();
        assert_eq!(engine.streak_from_log(&entries, date(2024, 6, 10)), 2);
    }
}
