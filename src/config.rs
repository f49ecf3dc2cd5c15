//! Engine configuration.
//!
//! Every value has a default, so an empty TOML document is a valid configuration.
//! The engine never reads files itself; hosts pass the TOML text in.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::ExerciseType;
use crate::models::answer_matcher::DEFAULT_ACCEPTABLE_THRESHOLD;
use crate::models::mastery::DEFAULT_LEARNED_THRESHOLD;
use crate::models::quality::DEFAULT_AVERAGE_TIME_MS;
use crate::models::session_summary::DEFAULT_PASS_RATIO;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matching: MatchingConfig,
    pub quality: QualityConfig,
    pub mastery: MasteryConfig,
    pub session: SessionConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub acceptable_threshold: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            acceptable_threshold: DEFAULT_ACCEPTABLE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub average_time_ms: u64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            average_time_ms: DEFAULT_AVERAGE_TIME_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryConfig {
    pub learned_threshold: u8,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            learned_threshold: DEFAULT_LEARNED_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub pass_ratio: f64,
    pub review_sequence: Vec<ExerciseType>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pass_ratio: DEFAULT_PASS_RATIO,
            review_sequence: vec![ExerciseType::Discrimination, ExerciseType::Dictation],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub reviews_per_session: usize,
    pub new_patterns_per_session: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            reviews_per_session: 20,
            new_patterns_per_session: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.acceptable_threshold > 100 {
            return Err(EngineError::Config(format!(
                "matching.acceptable_threshold must be 0-100, got {}",
                self.matching.acceptable_threshold
            )));
        }
        if self.quality.average_time_ms == 0 {
            return Err(EngineError::Config(
                "quality.average_time_ms must be greater than 0".to_string(),
            ));
        }
        if self.mastery.learned_threshold > 100 {
            return Err(EngineError::Config(format!(
                "mastery.learned_threshold must be 0-100, got {}",
                self.mastery.learned_threshold
            )));
        }
        if !(self.session.pass_ratio > 0.0 && self.session.pass_ratio <= 1.0) {
            return Err(EngineError::Config(format!(
                "session.pass_ratio must be in (0, 1], got {}",
                self.session.pass_ratio
            )));
        }
        if self.session.review_sequence.is_empty() {
            return Err(EngineError::Config(
                "session.review_sequence must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.matching.acceptable_threshold, 85);
        assert_eq!(config.quality.average_time_ms, 5000);
        assert_eq!(config.mastery.learned_threshold, 50);
        assert_eq!(config.session.pass_ratio, 0.5);
        assert_eq!(
            config.session.review_sequence,
            vec![ExerciseType::Discrimination, ExerciseType::Dictation]
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
[quality]
average_time_ms = 8000

[session]
review_sequence = ["comparison", "speed", "dictation"]

[queue]
new_patterns_per_session = 3
"#,
        )
        .unwrap();
        assert_eq!(config.quality.average_time_ms, 8000);
        assert_eq!(config.session.review_sequence.len(), 3);
        assert_eq!(config.session.pass_ratio, 0.5);
        assert_eq!(config.queue.new_patterns_per_session, 3);
        assert_eq!(config.queue.reviews_per_session, 20);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let err = EngineConfig::from_toml_str("[quality]\naverage_time_ms = 0\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str("[session]\npass_ratio = 1.5\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str("[session]\nreview_sequence = []\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("[quality\n").unwrap_err();
        assert!(matches!(err, EngineError::Toml(_)));

        let err = EngineConfig::from_toml_str("[session]\nreview_sequence = [\"reading\"]\n")
            .unwrap_err();
        assert!(matches!(err, EngineError::Toml(_)));
    }
}
