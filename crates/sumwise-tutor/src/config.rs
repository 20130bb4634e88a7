//! Configuration types for the Sumwise tutor.
//!
//! All timing and cadence knobs live here: how many examples and practice
//! questions a lesson has, how often correct answers trigger the reward
//! game, the auto-play period, the success-feedback delay, and the order
//! countdown duration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sumwise_solver::Tier;

use crate::error::{Result, TutorError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "sumwise.json";

/// Default number of teaching examples per lesson (the first is always
/// carry-free).
const fn default_example_count() -> u32 {
    3
}

/// Default number of practice questions per lesson.
const fn default_practice_questions() -> u32 {
    6
}

/// Default number of consecutive correct answers that triggers the
/// reward game.
const fn default_reward_streak() -> u32 {
    2
}

/// Default auto-play period for worked examples, in seconds.
const fn default_auto_play_seconds() -> u64 {
    4
}

/// Default delay before a post-answer transition, in milliseconds, so
/// success feedback can render first.
const fn default_feedback_delay_ms() -> u64 {
    1500
}

/// Default countdown duration per reward-game order, in seconds.
const fn default_order_timer_seconds() -> u32 {
    20
}

/// Default progress file path for the persisted session counter.
fn default_progress_file() -> String {
    ".sumwise/progress.json".to_string()
}

/// Main configuration for the tutor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorConfig {
    /// Difficulty tier for generated examples and practice questions.
    #[serde(default)]
    pub tier: Tier,

    /// Number of teaching examples shown before practice begins.
    #[serde(default = "default_example_count")]
    pub example_count: u32,

    /// Number of practice questions in the lesson.
    #[serde(default = "default_practice_questions")]
    pub practice_questions: u32,

    /// Correct answers between reward-game sessions.
    #[serde(default = "default_reward_streak")]
    pub reward_streak: u32,

    /// Seconds between auto-played example steps.
    #[serde(default = "default_auto_play_seconds")]
    pub auto_play_seconds: u64,

    /// Milliseconds to let success feedback render before a phase
    /// transition.
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,

    /// Countdown seconds per reward-game order.
    #[serde(default = "default_order_timer_seconds")]
    pub order_timer_seconds: u32,

    /// Path to the progress file holding the completed-session counter.
    #[serde(default = "default_progress_file")]
    pub progress_file: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            tier: Tier::default(),
            example_count: default_example_count(),
            practice_questions: default_practice_questions(),
            reward_streak: default_reward_streak(),
            auto_play_seconds: default_auto_play_seconds(),
            feedback_delay_ms: default_feedback_delay_ms(),
            order_timer_seconds: default_order_timer_seconds(),
            progress_file: default_progress_file(),
        }
    }
}

impl TutorConfig {
    /// Loads configuration from a specific directory.
    ///
    /// Looks for `sumwise.json` in the given directory. If found, loads
    /// and validates the configuration. If not found, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON or
    /// invalid values.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::ConfigParseError` if the file exists but
    /// contains invalid JSON, and `TutorError::ConfigValidationError` if
    /// the values are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(TutorError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TutorError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.example_count == 0 {
            return Err(TutorError::config_validation(
                "exampleCount must be greater than 0",
                "Set exampleCount to at least 1 in your sumwise.json",
            ));
        }

        if self.practice_questions == 0 {
            return Err(TutorError::config_validation(
                "practiceQuestions must be greater than 0",
                "Set practiceQuestions to at least 1 in your sumwise.json",
            ));
        }

        if self.reward_streak == 0 {
            return Err(TutorError::config_validation(
                "rewardStreak must be greater than 0",
                "Set rewardStreak to at least 1 in your sumwise.json",
            ));
        }

        if self.auto_play_seconds == 0 {
            return Err(TutorError::config_validation(
                "autoPlaySeconds must be greater than 0",
                "Set autoPlaySeconds to at least 1 in your sumwise.json",
            ));
        }

        if self.order_timer_seconds == 0 {
            return Err(TutorError::config_validation(
                "orderTimerSeconds must be greater than 0",
                "Set orderTimerSeconds to at least 1 in your sumwise.json",
            ));
        }

        if self.progress_file.trim().is_empty() {
            return Err(TutorError::config_validation(
                "progressFile must not be empty",
                "Provide a valid progress file path in your sumwise.json",
            ));
        }

        Ok(())
    }

    /// Auto-play period as a [`Duration`].
    #[must_use]
    pub const fn auto_play_period(&self) -> Duration {
        Duration::from_secs(self.auto_play_seconds)
    }

    /// Post-answer feedback delay as a [`Duration`].
    #[must_use]
    pub const fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = TutorConfig::default();

        assert_eq!(config.tier, Tier::Easy);
        assert_eq!(config.example_count, 3);
        assert_eq!(config.practice_questions, 6);
        assert_eq!(config.reward_streak, 2);
        assert_eq!(config.auto_play_seconds, 4);
        assert_eq!(config.feedback_delay_ms, 1500);
        assert_eq!(config.order_timer_seconds, 20);
        assert_eq!(config.progress_file, ".sumwise/progress.json");
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        let config: TutorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.example_count, 3);
        assert_eq!(config.reward_streak, 2);
    }

    #[test]
    fn test_config_deserialization_with_overrides() {
        let json = r#"{
            "tier": "Medium",
            "rewardStreak": 3,
            "orderTimerSeconds": 15
        }"#;
        let config: TutorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.tier, Tier::Medium);
        assert_eq!(config.reward_streak, 3);
        assert_eq!(config.order_timer_seconds, 15);
        // Other fields keep their defaults.
        assert_eq!(config.practice_questions, 6);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"practiceQuestions": 4, "unknownField": true}"#;
        let config: TutorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.practice_questions, 4);
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        for (field, json) in [
            ("exampleCount", r#"{"exampleCount": 0}"#),
            ("practiceQuestions", r#"{"practiceQuestions": 0}"#),
            ("rewardStreak", r#"{"rewardStreak": 0}"#),
            ("autoPlaySeconds", r#"{"autoPlaySeconds": 0}"#),
            ("orderTimerSeconds", r#"{"orderTimerSeconds": 0}"#),
        ] {
            let config: TutorConfig = serde_json::from_str(json).unwrap();
            let err = config.validate().unwrap_err();
            assert!(
                matches!(&err, TutorError::ConfigValidationError { message, .. }
                    if message.contains(field)),
                "Expected validation error about {field}, got: {err:?}"
            );
        }
    }

    #[test]
    fn test_validation_rejects_blank_progress_file() {
        let config = TutorConfig {
            progress_file: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_nonexistent_returns_default() {
        let path = PathBuf::from("/nonexistent/path/sumwise.json");
        let config = TutorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.example_count, 3);
    }

    #[test]
    fn test_load_from_file_valid_json() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_sumwise_valid.json");

        let json = r#"{"tier": "hard", "practiceQuestions": 8}"#;
        let mut file = std::fs::File::create(&config_path).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = TutorConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.tier, Tier::Hard);
        assert_eq!(config.practice_questions, 8);

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_sumwise_invalid.json");

        let mut file = std::fs::File::create(&config_path).unwrap();
        file.write_all(b"{ not valid json }").unwrap();

        let err = TutorConfig::load_from_file(&config_path).unwrap_err();
        assert!(
            matches!(&err, TutorError::ConfigParseError { path, .. } if *path == config_path),
            "Expected ConfigParseError, got: {err:?}"
        );

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_load_from_file_validates_after_parsing() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_sumwise_validation.json");

        let mut file = std::fs::File::create(&config_path).unwrap();
        file.write_all(br#"{"rewardStreak": 0}"#).unwrap();

        let err = TutorConfig::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, TutorError::ConfigValidationError { .. }));

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_duration_helpers() {
        let config = TutorConfig::default();
        assert_eq!(config.auto_play_period(), Duration::from_secs(4));
        assert_eq!(config.feedback_delay(), Duration::from_millis(1500));
    }
}
