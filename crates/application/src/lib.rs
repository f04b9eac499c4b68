//! Application layer - Use cases and orchestration
//!
//! Contains the chain driver, prompt composition, directive policy and
//! transcript rendering, plus the ports adapters must implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, ErrorKind};
pub use ports::*;
pub use services::*;
