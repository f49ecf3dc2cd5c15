//! In-progress review session.
//! Walks a fixed exercise sequence for each pattern and collects outcomes for the summary.

use super::ExerciseType;
use super::session_summary::{
    ExerciseOutcome, ReviewSessionResult, detect_milestone, overall_percentage, summarize,
    summarize_review,
};
use crate::error::{EngineError, Result};

/// One step of a review session: which pattern, which exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStep<'a> {
    pub pattern_id: &'a str,
    pub exercise_type: ExerciseType,
}

/// Steps run pattern by pattern: every exercise of the sequence for the first
/// pattern, then the second pattern, and so on.
pub struct ReviewSession {
    pub pattern_ids: Vec<String>,
    pub sequence: Vec<ExerciseType>,
    pub outcomes: Vec<ExerciseOutcome>,
    pub pass_ratio: f64,
}

impl ReviewSession {
    pub fn new(pattern_ids: Vec<String>, sequence: Vec<ExerciseType>, pass_ratio: f64) -> Self {
        Self {
            pattern_ids,
            sequence,
            outcomes: Vec::new(),
            pass_ratio,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.pattern_ids.len() * self.sequence.len()
    }

    pub fn completed_steps(&self) -> usize {
        self.outcomes.len()
    }

    pub fn remaining_steps(&self) -> usize {
        self.total_steps().saturating_sub(self.completed_steps())
    }

    pub fn current_step(&self) -> Option<ReviewStep<'_>> {
        if self.sequence.is_empty() {
            return None;
        }
        let step = self.completed_steps();
        let pattern_id = self.pattern_ids.get(step / self.sequence.len())?;
        Some(ReviewStep {
            pattern_id,
            exercise_type: self.sequence[step % self.sequence.len()],
        })
    }

    /// Records the learner's answer for the current step.
    pub fn record(&mut self, is_correct: bool, response_time_ms: u64) -> Result<()> {
        let Some(step) = self.current_step() else {
            return Err(EngineError::invariant(
                "cannot record an answer, the review session is already complete",
            ));
        };
        let outcome = ExerciseOutcome {
            pattern_id: step.pattern_id.to_string(),
            exercise_type: step.exercise_type,
            is_correct,
            response_time_ms,
        };
        self.outcomes.push(outcome);
        Ok(())
    }

    pub fn overall_percentage(&self) -> u8 {
        overall_percentage(self.completed_steps(), self.total_steps())
    }

    /// Accuracy so far, 0 before any answer.
    pub fn accuracy(&self) -> u8 {
        summarize(&self.outcomes).accuracy
    }

    pub fn is_completed(&self) -> bool {
        self.current_step().is_none()
    }

    pub fn phase_message(&self) -> String {
        match self.current_step() {
            Some(step) => format!(
                "Pattern {} of {}: {}",
                self.completed_steps() / self.sequence.len() + 1,
                self.pattern_ids.len(),
                step.exercise_type
            ),
            None => "Review complete".to_string(),
        }
    }

    pub fn finish(self) -> ReviewSessionResult {
        let result = summarize_review(&self.outcomes, self.pass_ratio);
        log::debug!(
            "review session finished: {} patterns, {} passed, accuracy {}%",
            result.patterns.len(),
            result.passed_count,
            result.summary.accuracy
        );
        result
    }

    /// Like `finish`, and also reports the milestone this session reached.
    /// `mastery_before` and `mastery_after` are the learner's mastery around the session.
    pub fn finish_with_milestone(
        self,
        is_first_session: bool,
        mastery_before: u8,
        mastery_after: u8,
    ) -> ReviewSessionResult {
        let mut result = self.finish();
        result.milestone = detect_milestone(
            is_first_session,
            result.summary.accuracy,
            mastery_before,
            mastery_after,
        );
        if let Some(milestone) = result.milestone {
            log::info!("milestone reached: {:?}", milestone);
        }
        result
    }
}
