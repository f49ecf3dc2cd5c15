//! Per-attempt pipeline and session planning.
//!
//! validate -> match answer (free text only) -> quality -> mastery + schedule -> streak.
//! Nothing here reads the clock or touches storage: prior state and "now" come in,
//! new state comes out, and the caller persists it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result, ValidationErrors};
use crate::export::json::import_attempt;
use crate::models::{
    AnswerKey, AnswerVerdict, ExerciseAttempt, LevelProgress, PatternInfo, PatternProgress,
    ReviewCandidate, ReviewSession, StreakState, StreakUpdate, answer_matcher, mastery, quality,
    review_queue, sm2,
};

/// Outbound result of one attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    pub pattern_id: String,
    pub is_correct: bool,
    pub new_mastery: u8,
    pub mastery_change: i16,
    pub quality: u8,
    pub new_ease_factor: f64,
    pub new_interval_days: i32,
    pub next_review_at: DateTime<Utc>,
    pub streak: StreakUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerVerdict>,
}

/// New state to persist plus the report for the learner.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub progress: PatternProgress,
    pub streak: StreakState,
    pub report: AttemptReport,
}

/// What to present in the next session: due reviews first, then unseen patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPlan {
    pub reviews: Vec<String>,
    pub new_patterns: Vec<String>,
}

impl SessionPlan {
    pub fn pattern_ids(&self) -> Vec<String> {
        self.reviews
            .iter()
            .chain(&self.new_patterns)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty() && self.new_patterns.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    config: EngineConfig,
}

impl ProgressEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Processes one validated attempt.
    ///
    /// `progress` is the learner's prior state for the pattern, or None on the first attempt.
    /// When an answer key is given and the attempt carries user input, the fuzzy match decides
    /// correctness instead of the submitted `is_correct` flag.
    pub fn record_attempt(
        &self,
        progress: Option<&PatternProgress>,
        streak: &StreakState,
        attempt: &ExerciseAttempt,
        answer_key: Option<&AnswerKey>,
        now: DateTime<Utc>,
    ) -> Result<AttemptOutcome> {
        if attempt.pattern_id.trim().is_empty() {
            let mut errors = ValidationErrors::default();
            errors.push("patternId", "must be a non-empty string");
            return Err(errors.into());
        }

        let prior = match progress {
            Some(p) => {
                if p.pattern_id != attempt.pattern_id {
                    return Err(EngineError::invariant(format!(
                        "progress for '{}' supplied with an attempt at '{}'",
                        p.pattern_id, attempt.pattern_id
                    )));
                }
                p.check_invariants()?;
                p.clone()
            }
            None => PatternProgress::new(&attempt.pattern_id),
        };

        let answer = match (answer_key, attempt.user_input.as_deref()) {
            (Some(key), Some(input)) => Some(answer_matcher::evaluate(
                input,
                key,
                self.config.matching.acceptable_threshold,
            )),
            _ => None,
        };
        let is_correct = answer.map_or(attempt.is_correct, |v| v.accepted);

        let quality = quality::quality(
            is_correct,
            attempt.response_time_ms,
            self.config.quality.average_time_ms,
        );
        let new_mastery =
            mastery::new_mastery(prior.mastery_score, is_correct, attempt.exercise_type)?;
        let schedule = sm2::schedule_progress(&prior, quality, now)?;
        let (streak_state, streak_update) = streak.record_practice(now)?;

        let progress = PatternProgress {
            pattern_id: prior.pattern_id.clone(),
            mastery_score: new_mastery,
            times_practiced: prior.times_practiced.saturating_add(1),
            times_correct: prior.times_correct.saturating_add(u32::from(is_correct)),
            ease_factor: schedule.ease_factor,
            interval_days: schedule.interval_days,
            repetitions: schedule.repetitions,
            last_practiced_at: Some(now),
            next_review_at: Some(schedule.next_review_at),
        };

        let mastery_change = new_mastery as i16 - prior.mastery_score as i16;
        log::debug!(
            "attempt {} ({}): correct={} quality={} mastery {}->{} interval {}d streak {}",
            attempt.pattern_id,
            attempt.exercise_type,
            is_correct,
            quality,
            prior.mastery_score,
            new_mastery,
            schedule.interval_days,
            streak_update.new_current
        );

        Ok(AttemptOutcome {
            report: AttemptReport {
                pattern_id: progress.pattern_id.clone(),
                is_correct,
                new_mastery,
                mastery_change,
                quality,
                new_ease_factor: schedule.ease_factor,
                new_interval_days: schedule.interval_days,
                next_review_at: schedule.next_review_at,
                streak: streak_update,
                answer,
            },
            progress,
            streak: streak_state,
        })
    }

    /// Validates a raw JSON submission and processes it.
    pub fn submit_json(
        &self,
        payload: &str,
        progress: Option<&PatternProgress>,
        streak: &StreakState,
        answer_key: Option<&AnswerKey>,
        now: DateTime<Utc>,
    ) -> Result<AttemptOutcome> {
        let attempt = import_attempt(payload)?;
        self.record_attempt(progress, streak, &attempt, answer_key, now)
    }

    /// Picks due reviews (earliest first) and then unseen patterns of the level (catalogue order),
    /// each capped by the queue configuration.
    pub fn plan_session(
        &self,
        candidates: &[ReviewCandidate],
        patterns_at_level: &[PatternInfo],
        now: DateTime<Utc>,
    ) -> SessionPlan {
        let reviews: Vec<String> = review_queue::due_for_review(candidates, now)
            .into_iter()
            .take(self.config.queue.reviews_per_session)
            .map(|c| c.pattern_id().to_string())
            .collect();

        let practiced: HashSet<String> = candidates
            .iter()
            .map(|c| c.pattern_id().to_string())
            .collect();
        let new_patterns: Vec<String> =
            review_queue::new_patterns_for_level(patterns_at_level, &practiced)
                .into_iter()
                .take(self.config.queue.new_patterns_per_session)
                .map(|p| p.id.clone())
                .collect();

        log::debug!(
            "session plan: {} reviews, {} new patterns",
            reviews.len(),
            new_patterns.len()
        );
        SessionPlan {
            reviews,
            new_patterns,
        }
    }

    /// Starts a review session over the given patterns with the configured exercise sequence.
    pub fn start_review(&self, pattern_ids: Vec<String>) -> ReviewSession {
        ReviewSession::new(
            pattern_ids,
            self.config.session.review_sequence.clone(),
            self.config.session.pass_ratio,
        )
    }

    pub fn level_progress(
        &self,
        patterns_at_level: &[PatternInfo],
        progress: &[PatternProgress],
    ) -> LevelProgress {
        review_queue::level_progress(
            patterns_at_level,
            progress,
            self.config.mastery.learned_threshold,
        )
    }

    pub fn is_learned(&self, progress: &PatternProgress) -> bool {
        mastery::is_learned(progress.mastery_score, self.config.mastery.learned_threshold)
    }
}
