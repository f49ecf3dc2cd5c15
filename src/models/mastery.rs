//! Mastery score updates.
//!
//! Correct answers add up to the exercise weight with diminishing returns near 100,
//! incorrect answers subtract half the weight. Results stay in 0-100.

use super::ExerciseType;
use crate::error::{EngineError, Result};

pub const DEFAULT_LEARNED_THRESHOLD: u8 = 50;

pub fn new_mastery(current: u8, is_correct: bool, exercise_type: ExerciseType) -> Result<u8> {
    if current > 100 {
        return Err(EngineError::invariant(format!(
            "mastery {} is above 100",
            current
        )));
    }

    let weight = exercise_type.weight();
    let current = current as f64;
    let next = if is_correct {
        let increase = weight.min((100.0 - current) * 0.2 + weight * 0.5);
        current + increase
    } else {
        current - weight * 0.5
    };

    Ok(next.round().clamp(0.0, 100.0) as u8)
}

pub fn is_learned(mastery: u8, threshold: u8) -> bool {
    mastery >= threshold
}
