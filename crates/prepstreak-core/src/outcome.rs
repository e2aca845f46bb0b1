//! Session outcome normalization.
//!
//! A finished test attempt reaches the client in one of two shapes: the
//! authoritative completion payload computed right after submission
//! (carrying score breakdown and gamification deltas), or the review
//! payload reconstructed later from persisted per-question answers (no
//! deltas). This module collapses both into one canonical
//! [`SessionOutcome`] read model so downstream code never branches on the
//! upstream shape.

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-section score breakdown from the completion endpoint, 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall: f64,
    #[serde(default)]
    pub verbal: Option<f64>,
    #[serde(default)]
    pub quantitative: Option<f64>,
}

/// Day-streak state reported alongside a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_days: u32,
    /// Whether this attempt extended the streak.
    pub updated: bool,
}

/// A badge awarded by this attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Authoritative result payload produced immediately after finishing an
/// attempt. The only gamification source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionPayload {
    pub attempt_id: Uuid,
    /// Presence of a computed score is what marks this shape as usable.
    #[serde(default)]
    pub score: Option<ScoreBreakdown>,
    #[serde(default)]
    pub answered_question_count: u32,
    #[serde(default)]
    pub correct_answers_in_test_count: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub points_from_test_completion_event: u32,
    #[serde(default)]
    pub points_from_correct_answers_this_test: u32,
    #[serde(default)]
    pub streak_info: Option<StreakInfo>,
    #[serde(default)]
    pub badges_won: Vec<Badge>,
    /// Whether this attempt determined the user's level.
    #[serde(default)]
    pub level_determined: bool,
}

/// The user's persisted answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDetails {
    #[serde(default)]
    pub selected_choice: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQuestion {
    #[serde(default)]
    pub user_answer_details: Option<AnswerDetails>,
}

/// Fallback payload reconstructable at any later time (direct navigation,
/// page refresh) from persisted per-question answers. Carries no
/// gamification deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPayload {
    pub attempt_id: Uuid,
    #[serde(default)]
    pub questions: Vec<ReviewQuestion>,
    #[serde(default)]
    pub score_percentage: Option<f64>,
}

/// The two mutually exclusive upstream shapes as an explicit tagged union.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptPayload {
    Completion(CompletionPayload),
    Review(ReviewPayload),
}

impl AttemptPayload {
    /// Pick the authoritative shape when both may be cached at once. The
    /// completion shape wins whenever it carries a computed score; the
    /// review shape is only consulted when completion data was never
    /// cached (e.g. after a page reload). Neither usable shape yields
    /// `None` -- the caller renders a "not available" state rather than a
    /// fabricated score.
    pub fn select(
        completion: Option<CompletionPayload>,
        review: Option<ReviewPayload>,
    ) -> Option<Self> {
        match completion {
            Some(c) if c.score.is_some() => Some(AttemptPayload::Completion(c)),
            _ => {
                if review.is_some() {
                    debug!("no completion payload cached; using review fallback");
                }
                review.map(AttemptPayload::Review)
            }
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        match self {
            AttemptPayload::Completion(c) => c.attempt_id,
            AttemptPayload::Review(r) => r.attempt_id,
        }
    }
}

/// Unified read model for a finished attempt.
///
/// Invariant: `correct + incorrect + skipped == total` whenever
/// `total > 0`; point fields decompose as
/// `total_points_earned == points_from_completion + points_from_correct_answers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub attempt_id: Uuid,
    /// 0-100 scale; `None` when not computable from the source payload.
    pub overall_score: Option<f64>,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub skipped_answers: u32,
    pub total_questions: u32,
    pub points_from_completion: u32,
    pub points_from_correct_answers: u32,
    pub total_points_earned: u32,
    pub streak_info: Option<StreakInfo>,
    pub badges_won: Vec<Badge>,
    pub level_determined: bool,
    /// True when derived from the review fallback, which carries no
    /// gamification deltas by construction.
    pub is_fallback: bool,
}

impl SessionOutcome {
    /// Normalize whichever upstream shape is available, preferring the
    /// completion shape. `None` when neither shape is usable.
    pub fn normalize(
        completion: Option<CompletionPayload>,
        review: Option<ReviewPayload>,
    ) -> Option<Self> {
        AttemptPayload::select(completion, review).map(Self::from_payload)
    }

    pub fn from_payload(payload: AttemptPayload) -> Self {
        match payload {
            AttemptPayload::Completion(c) => Self::from_completion(c),
            AttemptPayload::Review(r) => Self::from_review(r),
        }
    }

    fn from_completion(c: CompletionPayload) -> Self {
        let total = c.total_questions;
        let answered = c.answered_question_count;
        let correct = c.correct_answers_in_test_count;
        // Clamped even though well-formed upstream data never goes
        // negative here.
        let incorrect = answered.saturating_sub(correct);
        let skipped = total.saturating_sub(answered);
        let points_from_completion = c.points_from_test_completion_event;
        let points_from_correct_answers = c.points_from_correct_answers_this_test;
        Self {
            attempt_id: c.attempt_id,
            overall_score: c.score.map(|s| s.overall),
            correct_answers: correct,
            incorrect_answers: incorrect,
            skipped_answers: skipped,
            total_questions: total,
            points_from_completion,
            points_from_correct_answers,
            total_points_earned: points_from_completion + points_from_correct_answers,
            streak_info: c.streak_info,
            badges_won: c.badges_won,
            level_determined: c.level_determined,
            is_fallback: false,
        }
    }

    fn from_review(r: ReviewPayload) -> Self {
        let total = r.questions.len() as u32;
        let answered = r
            .questions
            .iter()
            .filter(|q| {
                q.user_answer_details
                    .as_ref()
                    .map_or(false, |d| d.selected_choice.is_some())
            })
            .count() as u32;
        let correct = r
            .questions
            .iter()
            .filter(|q| {
                q.user_answer_details
                    .as_ref()
                    .map_or(false, |d| d.is_correct == Some(true))
            })
            .count() as u32;
        let correct = correct.min(answered);
        let incorrect = answered.saturating_sub(correct);
        let skipped = total.saturating_sub(answered);
        Self {
            attempt_id: r.attempt_id,
            overall_score: r.score_percentage,
            correct_answers: correct,
            incorrect_answers: incorrect,
            skipped_answers: skipped,
            total_questions: total,
            points_from_completion: 0,
            points_from_correct_answers: 0,
            total_points_earned: 0,
            streak_info: None,
            badges_won: Vec::new(),
            level_determined: false,
            is_fallback: true,
        }
    }
}
