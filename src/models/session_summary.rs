//! Folding exercise outcomes into session summaries, plus milestone detection.
use serde::{Deserialize, Serialize};

use super::ExerciseType;

pub const DEFAULT_PASS_RATIO: f64 = 0.5;

/// Result of one exercise inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOutcome {
    pub pattern_id: String,
    pub exercise_type: ExerciseType,
    pub is_correct: bool,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub total_count: usize,
    pub correct_count: usize,
    pub accuracy: u8,
    pub average_response_time_ms: u64,
    pub total_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReviewResult {
    pub pattern_id: String,
    pub exercise_count: usize,
    pub correct_count: usize,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSessionResult {
    pub summary: SessionResult,
    pub patterns: Vec<PatternReviewResult>,
    pub passed_count: usize,
    pub failed_count: usize,
    /// Set only when the caller supplied first-session and mastery context on finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Milestone {
    #[serde(rename = "first-practice")]
    FirstPractice,
    #[serde(rename = "perfect-score")]
    PerfectScore,
    #[serde(rename = "mastery-50")]
    Mastery50,
    #[serde(rename = "mastery-75")]
    Mastery75,
    #[serde(rename = "mastery-100")]
    Mastery100,
}

pub fn summarize(outcomes: &[ExerciseOutcome]) -> SessionResult {
    let total_count = outcomes.len();
    let correct_count = outcomes.iter().filter(|o| o.is_correct).count();
    let total_time_ms: u64 = outcomes.iter().map(|o| o.response_time_ms).sum();

    if total_count == 0 {
        return SessionResult {
            total_count,
            correct_count,
            accuracy: 0,
            average_response_time_ms: 0,
            total_time_ms,
        };
    }

    SessionResult {
        total_count,
        correct_count,
        accuracy: percentage(correct_count, total_count),
        average_response_time_ms: (total_time_ms as f64 / total_count as f64).round() as u64,
        total_time_ms,
    }
}

/// Per-pattern pass marks for a review session. Patterns are listed in first-seen order;
/// a pattern passes when at least `pass_ratio` of its exercises were correct.
pub fn summarize_review(outcomes: &[ExerciseOutcome], pass_ratio: f64) -> ReviewSessionResult {
    let mut patterns: Vec<PatternReviewResult> = Vec::new();
    for outcome in outcomes {
        let idx = match patterns
            .iter()
            .position(|p| p.pattern_id == outcome.pattern_id)
        {
            Some(idx) => idx,
            None => {
                patterns.push(PatternReviewResult {
                    pattern_id: outcome.pattern_id.clone(),
                    exercise_count: 0,
                    correct_count: 0,
                    passed: false,
                });
                patterns.len() - 1
            }
        };
        let entry = &mut patterns[idx];
        entry.exercise_count += 1;
        if outcome.is_correct {
            entry.correct_count += 1;
        }
    }

    for p in &mut patterns {
        p.passed = p.correct_count as f64 / p.exercise_count as f64 >= pass_ratio;
    }

    let passed_count = patterns.iter().filter(|p| p.passed).count();
    ReviewSessionResult {
        summary: summarize(outcomes),
        failed_count: patterns.len() - passed_count,
        passed_count,
        patterns,
        milestone: None,
    }
}

/// Progress through a session in percent. No steps at all counts as complete.
pub fn overall_percentage(completed_steps: usize, total_steps: usize) -> u8 {
    if total_steps == 0 {
        return 100;
    }
    percentage(completed_steps.min(total_steps), total_steps)
}

/// First matching milestone, checked in priority order.
pub fn detect_milestone(
    is_first_session: bool,
    accuracy: u8,
    mastery_before: u8,
    mastery_after: u8,
) -> Option<Milestone> {
    if is_first_session {
        return Some(Milestone::FirstPractice);
    }
    if accuracy == 100 {
        return Some(Milestone::PerfectScore);
    }
    [
        (50, Milestone::Mastery50),
        (75, Milestone::Mastery75),
        (100, Milestone::Mastery100),
    ]
    .into_iter()
    .find(|(threshold, _)| mastery_before < *threshold && mastery_after >= *threshold)
    .map(|(_, milestone)| milestone)
}

fn percentage(part: usize, whole: usize) -> u8 {
    (part as f64 / whole as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(pattern: &str, t: ExerciseType, ok: bool, ms: u64) -> ExerciseOutcome {
        ExerciseOutcome {
            pattern_id: pattern.to_string(),
            exercise_type: t,
            is_correct: ok,
            response_time_ms: ms,
        }
    }

    #[test]
    fn test_summarize() {
        let outcomes = vec![
            outcome("a", ExerciseType::Comparison, true, 1000),
            outcome("a", ExerciseType::Speed, false, 2000),
            outcome("b", ExerciseType::Dictation, true, 4001),
        ];
        let result = summarize(&outcomes);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.accuracy, 67);
        assert_eq!(result.total_time_ms, 7001);
        assert_eq!(result.average_response_time_ms, 2334);
    }

    #[test]
    fn test_summarize_empty() {
        let result = summarize(&[]);
        assert_eq!(result.total_count, 0);
        assert_eq!(result.accuracy, 0);
        assert_eq!(result.average_response_time_ms, 0);
    }

    #[test]
    fn test_review_pass_marks() {
        let outcomes = vec![
            outcome("gonna", ExerciseType::Discrimination, true, 1500),
            outcome("gonna", ExerciseType::Dictation, false, 3000),
            outcome("wanna", ExerciseType::Discrimination, false, 1500),
            outcome("wanna", ExerciseType::Dictation, false, 3000),
            outcome("gotta", ExerciseType::Discrimination, true, 1500),
            outcome("gotta", ExerciseType::Dictation, true, 3000),
        ];
        let result = summarize_review(&outcomes, DEFAULT_PASS_RATIO);

        let passed: Vec<(&str, bool)> = result
            .patterns
            .iter()
            .map(|p| (p.pattern_id.as_str(), p.passed))
            .collect();
        // half right is a pass
        assert_eq!(passed, vec![("gonna", true), ("wanna", false), ("gotta", true)]);
        assert_eq!(result.passed_count, 2);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.summary.accuracy, 50);
    }

    #[test]
    fn test_overall_percentage() {
        assert_eq!(overall_percentage(0, 0), 100);
        assert_eq!(overall_percentage(1, 3), 33);
        assert_eq!(overall_percentage(2, 3), 67);
        assert_eq!(overall_percentage(4, 4), 100);
    }

    #[test]
    fn test_milestone_priority() {
        assert_eq!(detect_milestone(true, 100, 40, 60), Some(Milestone::FirstPractice));
        assert_eq!(detect_milestone(false, 100, 40, 60), Some(Milestone::PerfectScore));
        assert_eq!(detect_milestone(false, 80, 40, 60), Some(Milestone::Mastery50));
        assert_eq!(detect_milestone(false, 80, 60, 76), Some(Milestone::Mastery75));
        assert_eq!(detect_milestone(false, 80, 95, 100), Some(Milestone::Mastery100));
        assert_eq!(detect_milestone(false, 80, 50, 60), None);
        assert_eq!(detect_milestone(false, 80, 60, 40), None);
    }

    #[test]
    fn test_milestone_serializes_as_kebab() {
        let json = serde_json::to_string(&Milestone::Mastery75).unwrap();
        assert_eq!(json, "\"mastery-75\"");
    }
}
