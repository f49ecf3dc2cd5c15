//! Per-learner progress on one pattern: mastery plus spaced-repetition state.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Longest interval the scheduler hands out, roughly a hundred years.
/// Repeated fast reviews on the same day would otherwise grow it past chrono's date range.
pub const MAX_INTERVAL_DAYS: i32 = 36_500;

/// `at` plus whole days, or an invariant error when the date falls outside chrono's range.
pub(crate) fn add_days(at: DateTime<Utc>, days: i32) -> Result<DateTime<Utc>> {
    Duration::try_days(days as i64)
        .and_then(|d| at.checked_add_signed(d))
        .ok_or_else(|| EngineError::invariant(format!("{} + {} days is out of range", at, days)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternProgress {
    pub pattern_id: String,
    pub mastery_score: u8,
    pub times_practiced: u32,
    pub times_correct: u32,
    pub ease_factor: f64,
    pub interval_days: i32,
    #[serde(default)]
    pub repetitions: u32,
    pub last_practiced_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
}

impl PatternProgress {
    /// Fresh progress, created on the first attempt at a pattern.
    pub fn new(pattern_id: &str) -> Self {
        Self {
            pattern_id: pattern_id.to_string(),
            mastery_score: 0,
            times_practiced: 0,
            times_correct: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 1,
            repetitions: 0,
            last_practiced_at: None,
            next_review_at: None,
        }
    }

    /// Percentage of attempts that were correct, 0 when never practised.
    pub fn accuracy(&self) -> u8 {
        if self.times_practiced == 0 {
            return 0;
        }
        (self.times_correct as f64 / self.times_practiced as f64 * 100.0).round() as u8
    }

    pub fn is_learned(&self, threshold: u8) -> bool {
        self.mastery_score >= threshold
    }

    /// Never-scheduled progress is not due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_some_and(|at| at <= now)
    }

    /// Checks the stored-state invariants. Used on progress coming from outside the engine.
    pub fn check_invariants(&self) -> Result<()> {
        if self.pattern_id.trim().is_empty() {
            return Err(EngineError::invariant("pattern id must not be empty"));
        }
        if self.mastery_score > 100 {
            return Err(EngineError::invariant(format!(
                "mastery {} is above 100",
                self.mastery_score
            )));
        }
        if self.times_correct > self.times_practiced {
            return Err(EngineError::invariant(format!(
                "times correct ({}) exceeds times practiced ({})",
                self.times_correct, self.times_practiced
            )));
        }
        if !(self.ease_factor >= MIN_EASE_FACTOR) {
            return Err(EngineError::invariant(format!(
                "ease factor {} is below {}",
                self.ease_factor, MIN_EASE_FACTOR
            )));
        }
        if !(1..=MAX_INTERVAL_DAYS).contains(&self.interval_days) {
            return Err(EngineError::invariant(format!(
                "interval {} days is outside 1-{}",
                self.interval_days, MAX_INTERVAL_DAYS
            )));
        }
        match (self.last_practiced_at, self.next_review_at) {
            (Some(last), Some(next)) => {
                if next != add_days(last, self.interval_days)? {
                    return Err(EngineError::invariant(
                        "next review is not last practice plus interval",
                    ));
                }
            }
            (None, None) => {}
            _ => {
                return Err(EngineError::invariant(
                    "last practice and next review must be set together",
                ));
            }
        }
        Ok(())
    }
}
