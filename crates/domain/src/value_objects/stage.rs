//! Stage value object
//!
//! One step of the chain, parsed from a `model[@endpoint][#directive]`
//! descriptor.
//!
//! # Examples
//!
//! ```
//! use domain::Stage;
//!
//! let stage = Stage::parse("qwen2.5-coder:7b@localhost:11436#Review the code", "http://localhost:11434").unwrap();
//! assert_eq!(stage.model(), "qwen2.5-coder:7b");
//! assert_eq!(stage.endpoint(), "localhost:11436");
//! assert_eq!(stage.directive(), Some("Review the code"));
//!
//! let stage = Stage::parse("llama3.1:8b", "http://localhost:11434").unwrap();
//! assert_eq!(stage.endpoint(), "http://localhost:11434");
//! assert_eq!(stage.directive(), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const DIRECTIVE_SEPARATOR: char = '#';
const ENDPOINT_SEPARATOR: char = '@';

/// A single pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    model: String,
    endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    directive: Option<String>,
}

impl Stage {
    /// Parse a stage descriptor
    ///
    /// The directive is everything after the first `#`, the endpoint is
    /// everything between the first `@` and the directive. A missing or blank
    /// endpoint is replaced by `default_endpoint`; a blank directive becomes
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStage`] if the descriptor is blank or the
    /// model portion is blank.
    pub fn parse(raw: &str, default_endpoint: &str) -> Result<Self, DomainError> {
        let core = raw.trim();
        if core.is_empty() {
            return Err(DomainError::InvalidStage(
                "step definition may not be empty".to_string(),
            ));
        }

        let (core, directive) = match core.split_once(DIRECTIVE_SEPARATOR) {
            Some((head, tail)) => {
                let tail = tail.trim();
                (head, (!tail.is_empty()).then(|| tail.to_string()))
            },
            None => (core, None),
        };

        let (model, endpoint) = match core.split_once(ENDPOINT_SEPARATOR) {
            Some((model, endpoint)) if !endpoint.trim().is_empty() => (model, endpoint.trim()),
            Some((model, _)) => (model, default_endpoint),
            None => (core, default_endpoint),
        };

        let model = model.trim();
        if model.is_empty() {
            return Err(DomainError::missing_model(raw));
        }

        Ok(Self {
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            directive,
        })
    }

    /// Model identifier, also used as the history label
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Raw endpoint, normalized only at dispatch time
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Explicit directive from the descriptor, if any
    pub fn directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }
}

impl fmt::Display for Stage {
    /// Canonical descriptor form: `model@endpoint[#directive]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ENDPOINT_SEPARATOR}{}", self.model, self.endpoint)?;
        if let Some(directive) = &self.directive {
            write!(f, "{DIRECTIVE_SEPARATOR}{directive}")?;
        }
        Ok(())
    }
}
