//! Application-level errors

use std::fmt;

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Every variant is terminal for a chain run.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level validation error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration error (bad option combination, unusable settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Endpoint unreachable
    #[error("{0}")]
    Transport(String),

    /// Endpoint returned a non-success status
    #[error("{message}")]
    Protocol { status: u16, message: String },

    /// Response body is not well-formed JSON
    #[error("{0}")]
    Decode(String),

    /// Response lacks the expected text field
    #[error("{0}")]
    Shape(String),
}

/// Coarse error category, used for logging and exit reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Protocol,
    Decode,
    Shape,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Decode => "decode",
            Self::Shape => "shape",
        };
        f.write_str(name)
    }
}

impl ApplicationError {
    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Configuration(_) => ErrorKind::Config,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Shape(_) => ErrorKind::Shape,
        }
    }
}
