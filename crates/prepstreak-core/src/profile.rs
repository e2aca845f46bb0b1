//! Locally cached user profile and the store seam around it.
//!
//! The backend is the single source of truth; this cache must never
//! diverge from it by more than one unacknowledged reconciliation.
//! Gamification fields have a single writer, the reconciler in
//! [`crate::reconcile`]; nothing else mutates them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The locally cached user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub current_streak_days: u32,
    #[serde(default)]
    pub level_determined: bool,
}

/// Partial profile update carrying only changed fields.
///
/// Writes are never unconditional: an update is only issued when at least
/// one field actually changed, so redundant re-renders and redundant cache
/// invalidations never happen downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_streak_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_determined: Option<bool>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.points.is_none()
            && self.current_streak_days.is_none()
            && self.level_determined.is_none()
    }

    /// Whether the update touches a points or streak field (the fields the
    /// windowed aggregates summarize).
    pub fn touches_aggregates(&self) -> bool {
        self.points.is_some() || self.current_streak_days.is_some()
    }

    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(points) = self.points {
            profile.points = points;
        }
        if let Some(days) = self.current_streak_days {
            profile.current_streak_days = days;
        }
        if let Some(flag) = self.level_determined {
            profile.level_determined = flag;
        }
    }
}

/// Process-wide profile cache.
///
/// `get` returns `None` until the store has hydrated; `set` applies a
/// partial update synchronously, so the current view reads its own write.
pub trait ProfileStore {
    fn get(&self) -> Option<UserProfile>;
    fn set(&mut self, update: &ProfileUpdate);
}

/// Simple in-process store, used by shells without a platform cache and by
/// tests. Starts unhydrated.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profile: Option<UserProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hydrated(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    pub fn hydrate(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    pub fn clear(&mut self) {
        self.profile = None;
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self) -> Option<UserProfile> {
        self.profile.clone()
    }

    fn set(&mut self, update: &ProfileUpdate) {
        // Setting before hydration is a no-op; the outcome is simply not
        // reflected until a later render once the store is available.
        if let Some(profile) = self.profile.as_mut() {
            update.apply_to(profile);
        }
    }
}
