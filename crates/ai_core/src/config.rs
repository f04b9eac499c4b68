//! Configuration for the generation client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Configuration for the generation client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Per-request timeout in seconds, applied to every stage
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> f64 {
    120.0
}

fn default_user_agent() -> String {
    concat!("ollama-chain/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl InferenceConfig {
    /// Create a config with the given timeout
    pub fn with_timeout_secs(timeout_secs: f64) -> Self {
        Self {
            timeout_secs,
            ..Default::default()
        }
    }

    /// Request timeout as a [`Duration`]
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero, negative, or not finite.
    pub fn timeout(&self) -> Result<Duration, InferenceError> {
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
            return Err(InferenceError::ClientSetup(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout_secs
            )));
        }
        Duration::try_from_secs_f64(self.timeout_secs)
            .map_err(|e| InferenceError::ClientSetup(format!("invalid timeout: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = InferenceConfig::default();
        assert!((config.timeout_secs - 120.0).abs() < f64::EPSILON);
        assert!(config.user_agent.starts_with("ollama-chain/"));
    }

    #[test]
    fn timeout_converts_fractional_seconds() {
        let config = InferenceConfig::with_timeout_secs(1.5);
        assert_eq!(config.timeout().unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn timeout_rejects_non_positive_values() {
        assert!(InferenceConfig::with_timeout_secs(0.0).timeout().is_err());
        assert!(InferenceConfig::with_timeout_secs(-3.0).timeout().is_err());
        assert!(InferenceConfig::with_timeout_secs(f64::NAN).timeout().is_err());
        assert!(InferenceConfig::with_timeout_secs(f64::INFINITY).timeout().is_err());
    }

    #[test]
    fn config_deserialization_with_defaults() {
        let json = r"{}";
        let config: InferenceConfig = serde_json::from_str(json).unwrap();
        assert!((config.timeout_secs - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn config_deserialization() {
        let json = r#"{"timeout_secs":30.0,"user_agent":"test"}"#;
        let config: InferenceConfig = serde_json::from_str(json).unwrap();
        assert!((config.timeout_secs - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.user_agent, "test");
    }
}
