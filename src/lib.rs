//! Learning-progress engine for pattern practice.
//!
//! Pure, synchronous computations: answer matching, mastery scoring, SM-2 scheduling,
//! daily streaks, review queue selection and session summaries. Callers pass prior
//! state and the current time in and persist whatever comes back.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;

pub use config::EngineConfig;
pub use engine::{AttemptOutcome, AttemptReport, ProgressEngine, SessionPlan};
pub use error::{EngineError, Result, ValidationErrors};
pub use models::{
    AnswerKey, ExerciseAttempt, ExerciseType, PatternInfo, PatternProgress, ReviewCandidate,
    ReviewSession, StreakState,
};
