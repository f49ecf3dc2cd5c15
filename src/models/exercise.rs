//! Exercise types and the validated attempt a learner submits for one exercise.
use crate::error::{EngineError, Result, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of exercise. Each kind moves mastery by a fixed weight reflecting how much
/// it tells us about real comprehension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Comparison,
    Discrimination,
    Dictation,
    Speed,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 4] = [
        ExerciseType::Comparison,
        ExerciseType::Discrimination,
        ExerciseType::Dictation,
        ExerciseType::Speed,
    ];

    /// Mastery weight. Dictation requires production so it counts the most.
    pub fn weight(self) -> f64 {
        match self {
            ExerciseType::Comparison => 5.0,
            ExerciseType::Discrimination => 10.0,
            ExerciseType::Dictation => 15.0,
            ExerciseType::Speed => 10.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Comparison => "comparison",
            ExerciseType::Discrimination => "discrimination",
            ExerciseType::Dictation => "dictation",
            ExerciseType::Speed => "speed",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ExerciseType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let mut errors = ValidationErrors::default();
                errors.push("exerciseType", format!("unknown exercise type '{}'", s));
                EngineError::Validation(errors)
            })
    }
}

/// One submission for one exercise.
///
/// Build it with `new` or `from_value`; deserializing runs the same field-by-field
/// validation as `from_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct ExerciseAttempt {
    pub pattern_id: String,
    pub exercise_type: ExerciseType,
    pub is_correct: bool,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ExerciseAttempt {
    /// Typed constructor for callers that already hold well-typed values.
    pub fn new(
        pattern_id: &str,
        exercise_type: ExerciseType,
        is_correct: bool,
        response_time_ms: u64,
    ) -> Result<Self> {
        if pattern_id.trim().is_empty() {
            let mut errors = ValidationErrors::default();
            errors.push("patternId", "must be a non-empty string");
            return Err(errors.into());
        }
        Ok(Self {
            pattern_id: pattern_id.to_string(),
            exercise_type,
            is_correct,
            response_time_ms,
            user_input: None,
            session_id: None,
        })
    }

    pub fn with_user_input(mut self, input: impl Into<String>) -> Self {
        self.user_input = Some(input.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Validates an untyped payload.
    ///
    /// Every field is checked before returning so the caller can show all problems at once.
    pub fn from_value(payload: &Value) -> Result<Self> {
        let mut errors = ValidationErrors::default();

        let Some(obj) = payload.as_object() else {
            errors.push("payload", "must be a JSON object");
            return Err(errors.into());
        };

        let pattern_id = match obj.get("patternId") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => {
                errors.push("patternId", "must be a non-empty string");
                None
            }
        };

        let exercise_type = match obj.get("exerciseType") {
            Some(Value::String(s)) => match s.parse::<ExerciseType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push(
                        "exerciseType",
                        "must be one of comparison, discrimination, dictation, speed",
                    );
                    None
                }
            },
            _ => {
                errors.push(
                    "exerciseType",
                    "must be one of comparison, discrimination, dictation, speed",
                );
                None
            }
        };

        let is_correct = match obj.get("isCorrect") {
            Some(Value::Bool(b)) => Some(*b),
            _ => {
                errors.push("isCorrect", "must be a boolean");
                None
            }
        };

        let response_time_ms = match obj.get("responseTimeMs").and_then(Value::as_f64) {
            Some(ms) if ms.is_finite() && ms >= 0.0 => Some(ms.round() as u64),
            _ => {
                errors.push("responseTimeMs", "must be a non-negative number");
                None
            }
        };

        let user_input = optional_string(obj.get("userInput"), "userInput", &mut errors);
        let session_id = optional_string(obj.get("sessionId"), "sessionId", &mut errors);

        match (pattern_id, exercise_type, is_correct, response_time_ms) {
            (Some(pattern_id), Some(exercise_type), Some(is_correct), Some(response_time_ms))
                if errors.is_empty() =>
            {
                Ok(Self {
                    pattern_id,
                    exercise_type,
                    is_correct,
                    response_time_ms,
                    user_input,
                    session_id,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

impl TryFrom<Value> for ExerciseAttempt {
    type Error = EngineError;

    fn try_from(payload: Value) -> Result<Self> {
        ExerciseAttempt::from_value(&payload)
    }
}

fn optional_string(
    value: Option<&Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(field, "must be a string when present");
            None
        }
    }
}
