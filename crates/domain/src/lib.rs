//! Domain layer for ollama-chain
//!
//! Contains the pipeline vocabulary: stages, endpoints, the initial prompt
//! and the append-only history. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
