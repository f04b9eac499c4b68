//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Stage descriptor could not be parsed
    #[error("Invalid step definition: {0}")]
    InvalidStage(String),

    /// Initial prompt is missing or blank
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Endpoint could not be resolved to a base URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl DomainError {
    /// Create an error for a descriptor whose model portion is blank
    pub fn missing_model(raw: impl AsRef<str>) -> Self {
        Self::InvalidStage(format!("'{}': missing model name", raw.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_names_the_raw_token() {
        let err = DomainError::missing_model("@localhost:9000");
        assert_eq!(
            err.to_string(),
            "Invalid step definition: '@localhost:9000': missing model name"
        );
    }

    #[test]
    fn invalid_prompt_error_message() {
        let err = DomainError::InvalidPrompt("Prompt text cannot be empty.".to_string());
        assert_eq!(err.to_string(), "Invalid prompt: Prompt text cannot be empty.");
    }

    #[test]
    fn invalid_endpoint_error_message() {
        let err = DomainError::InvalidEndpoint("no endpoint or default".to_string());
        assert!(err.to_string().starts_with("Invalid endpoint"));
    }
}
