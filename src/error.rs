//! Error types shared by every part of the engine.
//!
//! Only two things can go wrong with valid code: a submission can be malformed
//! (`Validation`, reported field by field) or a caller can hand in state that breaks
//! a documented invariant (`Invariant`). The remaining variants cover configuration
//! and the JSON/TOML boundary.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single rejected field of an inbound submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every problem found while validating one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Errors that can occur while processing attempts, sessions or configuration
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid submission: {0}")]
    Validation(ValidationErrors),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    /// Builds an invariant violation and logs it, these should never happen with valid callers.
    pub fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!("invariant violation: {}", message);
        EngineError::Invariant(message)
    }
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        EngineError::Validation(errors)
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
