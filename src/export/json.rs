//! JSON import/export at the engine boundary.
//! Inbound attempts and stored progress are validated on the way in; reports and session
//! results go out as pretty JSON with camelCase field names.

use serde_json::Value;

use crate::engine::AttemptReport;
use crate::error::Result;
use crate::models::{ExerciseAttempt, PatternProgress, ReviewSessionResult, SessionResult};

/// Parses and validates one attempt submission.
/// Malformed JSON is a `Json` error; well-formed JSON with bad fields lists every bad field.
pub fn import_attempt(json: &str) -> Result<ExerciseAttempt> {
    let payload: Value = serde_json::from_str(json)?;
    ExerciseAttempt::from_value(&payload)
}

/// Loads stored progress and checks its invariants.
pub fn import_progress(json: &str) -> Result<PatternProgress> {
    let progress: PatternProgress = serde_json::from_str(json)?;
    progress.check_invariants()?;
    Ok(progress)
}

pub fn export_progress(progress: &PatternProgress) -> Result<String> {
    Ok(serde_json::to_string_pretty(progress)?)
}

pub fn export_report(report: &AttemptReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn export_session(result: &SessionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn export_review_session(result: &ReviewSessionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
