pub mod answer_matcher;
pub mod exercise;
pub mod mastery;
pub mod pattern_progress;
pub mod quality;
pub mod review_queue;
pub mod review_session;
pub mod session_summary;
pub mod sm2;
pub mod streak;

pub use answer_matcher::{AnswerKey, AnswerVerdict, BestMatch, Segment};
pub use exercise::{ExerciseAttempt, ExerciseType};
pub use pattern_progress::PatternProgress;
pub use review_queue::{LevelProgress, PatternInfo, ReviewCandidate};
pub use review_session::{ReviewSession, ReviewStep};
pub use session_summary::{
    ExerciseOutcome, Milestone, PatternReviewResult, ReviewSessionResult, SessionResult,
};
pub use sm2::Schedule;
pub use streak::{StreakState, StreakUpdate};
