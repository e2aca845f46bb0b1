//! Exactly-once application of session outcome deltas to the profile.
//!
//! The reconciling side effect re-runs on every render that sees the same
//! outcome; exactly-once semantics are enforced by a per-attempt one-shot
//! guard, not by deduplicating the trigger. Every skip path here is an
//! expected state, not a fault -- the whole transition is pure over
//! already-fetched data and cannot fail.

use std::collections::HashSet;

use log::debug;
use uuid::Uuid;

use crate::cache::{CachedQuery, QueryInvalidator};
use crate::outcome::SessionOutcome;
use crate::profile::{ProfileStore, ProfileUpdate};

/// Process-wide ledger of consumed per-attempt guards.
///
/// A guard is consumed the first time a non-empty delta is applied for its
/// attempt, and is never reset for that outcome's in-memory lifetime.
#[derive(Debug, Clone, Default)]
pub struct GuardLedger {
    consumed: HashSet<Uuid>,
}

impl GuardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_consumed(&self, attempt_id: Uuid) -> bool {
        self.consumed.contains(&attempt_id)
    }

    fn consume(&mut self, attempt_id: Uuid) {
        self.consumed.insert(attempt_id);
    }
}

/// Why a reconcile call applied nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Review-fallback outcomes carry no gamification deltas.
    Fallback,
    /// Profile store has not hydrated; retried on a later render.
    ProfileUnavailable,
    /// Guard already consumed for this attempt (idempotence path).
    GuardConsumed,
    /// Outcome implies no field change; guard left unconsumed.
    NoChange,
}

/// Result of one reconcile call.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileReport {
    Applied {
        update: ProfileUpdate,
        /// Whether the downstream aggregate reads were invalidated.
        invalidated: bool,
    },
    Skipped(SkipReason),
}

impl ReconcileReport {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileReport::Applied { .. })
    }
}

/// Apply `outcome`'s gamification deltas to the cached profile exactly
/// once, then invalidate only the reads that could now be stale.
pub fn reconcile<S, I>(
    outcome: &SessionOutcome,
    store: &mut S,
    ledger: &mut GuardLedger,
    invalidator: &mut I,
) -> ReconcileReport
where
    S: ProfileStore,
    I: QueryInvalidator,
{
    if outcome.is_fallback {
        debug!("reconcile skipped: fallback outcome {}", outcome.attempt_id);
        return ReconcileReport::Skipped(SkipReason::Fallback);
    }
    if ledger.is_consumed(outcome.attempt_id) {
        debug!(
            "reconcile skipped: guard already consumed for {}",
            outcome.attempt_id
        );
        return ReconcileReport::Skipped(SkipReason::GuardConsumed);
    }
    let Some(profile) = store.get() else {
        debug!("reconcile skipped: profile store not hydrated");
        return ReconcileReport::Skipped(SkipReason::ProfileUnavailable);
    };

    let mut update = ProfileUpdate::default();
    let points_delta = outcome.total_points_earned;
    if points_delta > 0 {
        update.points = Some(profile.points.saturating_add(points_delta));
    }
    if let Some(streak) = &outcome.streak_info {
        if streak.current_days != profile.current_streak_days {
            update.current_streak_days = Some(streak.current_days);
        }
    }
    if !profile.level_determined && outcome.level_determined {
        update.level_determined = Some(true);
    }

    if update.is_empty() {
        return ReconcileReport::Skipped(SkipReason::NoChange);
    }

    store.set(&update);
    ledger.consume(outcome.attempt_id);

    // Only a points or streak change can stale the aggregate reads; a
    // level-flag-only update invalidates nothing.
    let invalidated = update.touches_aggregates();
    if invalidated {
        invalidator.invalidate(CachedQuery::WindowedPoints);
        invalidator.invalidate(CachedQuery::StudyDayLog);
        debug!(
            "reconciled attempt {}: invalidated points and study-log reads",
            outcome.attempt_id
        );
    }

    ReconcileReport::Applied {
        update,
        invalidated,
    }
}
