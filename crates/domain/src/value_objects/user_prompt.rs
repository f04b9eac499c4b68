//! Initial prompt value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// The trimmed, non-empty prompt that starts a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPrompt {
    value: String,
}

impl UserPrompt {
    /// Create a prompt, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns an error if the text is blank.
    pub fn new(text: impl AsRef<str>) -> Result<Self, DomainError> {
        let value = text.as_ref().trim();
        if value.is_empty() {
            return Err(DomainError::InvalidPrompt(
                "prompt text cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Get the prompt as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for UserPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
