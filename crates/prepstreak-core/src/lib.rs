//! # PrepStreak Core Library
//!
//! This library provides the client-side gamification engine for the
//! PrepStreak test-prep application: it turns raw backend payloads into a
//! consistent session-outcome view, applies point/streak deltas to the
//! locally cached user profile exactly once per attempt, derives the
//! consecutive-day study streak, and keeps windowed point totals coherent.
//!
//! ## Architecture
//!
//! - **Outcome Normalizer**: Collapses the two mutually exclusive upstream
//!   result shapes (fresh completion vs. review fallback) into one
//!   canonical [`SessionOutcome`]
//! - **Profile Reconciler**: Exactly-once, guard-protected application of
//!   outcome deltas to the profile cache, with selective invalidation of
//!   dependent reads
//! - **Streak Calculator**: Consecutive-day streak over a sparse study-day
//!   log, injected-clock based and horizon-capped
//! - **Points Aggregator**: Independent per-window cached totals that
//!   always read as a number, never as an optional
//!
//! The crate performs no network I/O: the outer client owns fetching and
//! rendering and talks to this engine through the [`ProfileStore`] and
//! [`QueryInvalidator`] seams.
//!
//! ## Key Components
//!
//! - [`SessionOutcome`]: Canonical read model for a finished attempt
//! - [`GamificationEngine`]: Composition root over store, guards, and
//!   windowed totals
//! - [`reconcile`]: The pure exactly-once state transition
//! - [`EngineConfig`]: Week-start and streak-horizon configuration

pub mod cache;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod points;
pub mod profile;
pub mod reconcile;
pub mod streak;

pub use cache::{CachedQuery, NullInvalidator, QueryInvalidator, RecordingInvalidator};
pub use config::EngineConfig;
pub use dates::{
    day_key, day_key_utc, parse_day_key, window_bounds, DateRange, PointsWindow, WeekStart,
};
pub use engine::GamificationEngine;
pub use error::{ConfigError, DateError, EngineError, Result};
pub use outcome::{
    AnswerDetails, AttemptPayload, Badge, CompletionPayload, ReviewPayload, ReviewQuestion,
    ScoreBreakdown, SessionOutcome, StreakInfo,
};
pub use points::{DailyPointSummary, PointsAggregator, WindowQueryKey};
pub use profile::{InMemoryProfileStore, ProfileStore, ProfileUpdate, UserProfile};
pub use reconcile::{reconcile, GuardLedger, ReconcileReport, SkipReason};
pub use streak::{current_streak, StreakCalculator, StudyDayLogEntry};
