//! Chooses which patterns to present next.
//!
//! All functions return new sequences and leave their inputs untouched.
//! Sorts are stable so equal keys keep input order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::PatternProgress;
use super::mastery::DEFAULT_LEARNED_THRESHOLD;

/// Static pattern metadata from the content catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub id: String,
    pub category: String,
    pub order_index: u32,
    pub level: u32,
}

/// Read view joining a learner's progress with the pattern it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCandidate {
    pub pattern: PatternInfo,
    pub progress: PatternProgress,
}

impl ReviewCandidate {
    pub fn pattern_id(&self) -> &str {
        &self.pattern.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: Option<u32>,
    pub total: usize,
    pub practiced: usize,
    pub learned: usize,
    pub percentage: u8,
}

/// Due candidates, earliest first. Never-scheduled candidates are excluded.
pub fn due_for_review(candidates: &[ReviewCandidate], now: DateTime<Utc>) -> Vec<&ReviewCandidate> {
    let mut due: Vec<&ReviewCandidate> = candidates
        .iter()
        .filter(|c| c.progress.is_due(now))
        .collect();
    due.sort_by_key(|c| c.progress.next_review_at);
    due
}

/// Patterns at a level the learner has never attempted, by catalogue order.
pub fn new_patterns_for_level<'a>(
    patterns_at_level: &'a [PatternInfo],
    practiced_ids: &HashSet<String>,
) -> Vec<&'a PatternInfo> {
    let mut fresh: Vec<&PatternInfo> = patterns_at_level
        .iter()
        .filter(|p| !practiced_ids.contains(&p.id))
        .collect();
    fresh.sort_by_key(|p| p.order_index);
    fresh
}

/// Next pattern to present:
/// 1. the earliest due review,
/// 2. otherwise the lowest mastery below the learned threshold,
/// 3. otherwise the least practised.
pub fn next_recommended(candidates: &[ReviewCandidate], now: DateTime<Utc>) -> Option<&str> {
    if let Some(first_due) = due_for_review(candidates, now).first().copied() {
        return Some(first_due.pattern_id());
    }

    // min_by_key keeps the first of equal elements
    let weakest = candidates
        .iter()
        .filter(|c| c.progress.mastery_score < DEFAULT_LEARNED_THRESHOLD)
        .min_by_key(|c| c.progress.mastery_score);
    if let Some(c) = weakest {
        return Some(c.pattern_id());
    }

    candidates
        .iter()
        .min_by_key(|c| c.progress.times_practiced)
        .map(ReviewCandidate::pattern_id)
}

/// How far a learner is through the patterns of one level.
pub fn level_progress(
    patterns_at_level: &[PatternInfo],
    progress: &[PatternProgress],
    learned_threshold: u8,
) -> LevelProgress {
    let ids: HashSet<&str> = patterns_at_level.iter().map(|p| p.id.as_str()).collect();
    let relevant: Vec<&PatternProgress> = progress
        .iter()
        .filter(|p| ids.contains(p.pattern_id.as_str()) && p.times_practiced > 0)
        .collect();

    let total = ids.len();
    let practiced = relevant.len();
    let learned = relevant
        .iter()
        .filter(|p| p.is_learned(learned_threshold))
        .count();
    let percentage = if total == 0 {
        0
    } else {
        (learned as f64 / total as f64 * 100.0).round() as u8
    };

    LevelProgress {
        level: patterns_at_level.first().map(|p| p.level),
        total,
        practiced,
        learned,
        percentage,
    }
}
