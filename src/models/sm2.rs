//! SM-2 (SuperMemo 2) spaced repetition scheduling.
//!
//! - Each pattern has an ease factor (EF) adjusted after every review, never below 1.3
//! - Quality 0-2 is a lapse: repetitions reset to 0 and the interval back to 1 day
//! - Quality 3-5 grows the interval: 1 day, then 6 days, then previous interval × EF,
//!   capped at `MAX_INTERVAL_DAYS`
//!
//! The caller supplies "now" so the same inputs always produce the same schedule.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PatternProgress;
use super::pattern_progress::{MAX_INTERVAL_DAYS, MIN_EASE_FACTOR, add_days};
use crate::error::{EngineError, Result};

/// Scheduling state after one review
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: u32,
    pub next_review_at: DateTime<Utc>,
}

/// Calculates the next schedule according to SM-2.
/// quality: 0-5 (0 = complete blackout, 5 = perfect response)
pub fn schedule(
    quality: u8,
    prior_ease_factor: f64,
    prior_interval_days: i32,
    prior_repetitions: u32,
    now: DateTime<Utc>,
) -> Result<Schedule> {
    if quality > 5 {
        return Err(EngineError::invariant(format!(
            "quality {} is outside 0-5",
            quality
        )));
    }
    if prior_interval_days < 0 {
        return Err(EngineError::invariant(format!(
            "prior interval {} days is negative",
            prior_interval_days
        )));
    }
    if !(prior_ease_factor >= MIN_EASE_FACTOR) {
        return Err(EngineError::invariant(format!(
            "prior ease factor {} is below {}",
            prior_ease_factor, MIN_EASE_FACTOR
        )));
    }

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let q = 5.0 - quality as f64;
    let ease_factor = (prior_ease_factor + (0.1 - q * (0.08 + q * 0.02))).max(MIN_EASE_FACTOR);

    let (interval_days, repetitions) = if quality < 3 {
        (1, 0)
    } else {
        let reps = prior_repetitions.saturating_add(1);
        let interval = match reps {
            1 => 1,
            2 => 6,
            _ => (prior_interval_days as f64 * ease_factor).round() as i32,
        };
        (interval.clamp(1, MAX_INTERVAL_DAYS), reps)
    };

    log::trace!(
        "sm2: q={} ef {:.2}->{:.2} interval {}->{} reps {}->{}",
        quality,
        prior_ease_factor,
        ease_factor,
        prior_interval_days,
        interval_days,
        prior_repetitions,
        repetitions
    );

    Ok(Schedule {
        ease_factor,
        interval_days,
        repetitions,
        next_review_at: add_days(now, interval_days)?,
    })
}

/// Schedules the next review straight from stored progress.
pub fn schedule_progress(
    progress: &PatternProgress,
    quality: u8,
    now: DateTime<Utc>,
) -> Result<Schedule> {
    schedule(
        quality,
        progress.ease_factor,
        progress.interval_days,
        progress.repetitions,
        now,
    )
}

/// Intervals the next review would get for qualities 1, 3, 4 and 5,
/// i.e. a miss and the three speeds of correct answer.
pub fn preview_intervals(progress: &PatternProgress, now: DateTime<Utc>) -> Result<[i32; 4]> {
    let mut out = [0; 4];
    for (slot, quality) in out.iter_mut().zip([1u8, 3, 4, 5]) {
        *slot = schedule_progress(progress, quality, now)?.interval_days;
    }
    Ok(out)
}
