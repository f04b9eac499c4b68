//! Endpoint value object
//!
//! A canonical base URL of a model-serving HTTP service.
//!
//! # Examples
//!
//! ```
//! use domain::Endpoint;
//!
//! let endpoint = Endpoint::normalize("localhost:9000/", "http://localhost:11434").unwrap();
//! assert_eq!(endpoint.as_str(), "http://localhost:9000");
//!
//! // Blank values fall back to the default
//! let endpoint = Endpoint::normalize("  ", "http://localhost:11434").unwrap();
//! assert_eq!(endpoint.as_str(), "http://localhost:11434");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Endpoint used when neither a stage nor the configuration names one
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// A normalized base URL (scheme present, no trailing slash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint {
    value: String,
}

impl Endpoint {
    /// Normalize a raw endpoint string
    ///
    /// Blank input is replaced by `default`. Trailing slashes are stripped,
    /// then a value without `//` gets an `http://` scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if both `raw` and `default` are blank, or the result
    /// has no host part.
    pub fn normalize(raw: &str, default: &str) -> Result<Self, DomainError> {
        let mut candidate = raw.trim();
        if candidate.is_empty() {
            candidate = default.trim();
        }
        if candidate.is_empty() {
            return Err(DomainError::InvalidEndpoint(
                "no endpoint given and no default configured".to_string(),
            ));
        }

        let stripped = candidate.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
        let tail = &candidate[stripped.len()..];
        if stripped.is_empty() || (stripped.ends_with(':') && tail.contains("//")) {
            return Err(DomainError::InvalidEndpoint(format!(
                "'{candidate}' has no host"
            )));
        }

        let value = if stripped.contains("//") {
            stripped.to_string()
        } else {
            format!("http://{stripped}")
        };

        Ok(Self { value })
    }

    /// Get the base URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Join an API path onto the base URL
    ///
    /// ```
    /// use domain::Endpoint;
    ///
    /// let endpoint = Endpoint::normalize("gpu-box:11434", "").unwrap();
    /// assert_eq!(endpoint.join("/api/generate"), "http://gpu-box:11434/api/generate");
    /// ```
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.value, path.trim_start_matches('/'))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
