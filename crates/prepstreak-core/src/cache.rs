//! Invalidation seam toward the outer fetch layer.
//!
//! The engine never fetches. It only tells the keyed request cache which
//! reads could now be stale; the next read of an invalidated key refetches
//! from the server instead of serving a stale aggregate.

use serde::{Deserialize, Serialize};

/// The downstream cached reads the reconciler may invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachedQuery {
    /// Windowed point totals (all windows).
    WindowedPoints,
    /// Paginated study-day log backing the streak.
    StudyDayLog,
}

/// Implemented by the outer fetch layer's cache.
pub trait QueryInvalidator {
    fn invalidate(&mut self, query: CachedQuery);
}

/// Invalidator that drops requests on the floor, for callers with no
/// request cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInvalidator;

impl QueryInvalidator for NullInvalidator {
    fn invalidate(&mut self, _query: CachedQuery) {}
}

/// Records invalidations instead of performing them. Test double.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvalidator {
    pub invalidated: Vec<CachedQuery>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, query: CachedQuery) -> bool {
        self.invalidated.contains(&query)
    }
}

impl QueryInvalidator for RecordingInvalidator {
    fn invalidate(&mut self, query: CachedQuery) {
        self.invalidated.push(query);
    }
}
