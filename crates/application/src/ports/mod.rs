//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod chain_observer;
mod generation_port;

pub use chain_observer::ChainObserver;
#[cfg(test)]
pub use generation_port::MockGenerationPort;
pub use generation_port::GenerationPort;
