//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and provides
//! configuration loading, logging setup and the endpoint wait poller.

pub mod adapters;
pub mod config;
pub mod endpoint_waiter;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ChainConfig, DEFAULT_CONFIG_NAME};
pub use endpoint_waiter::{EndpointWaiter, ProbeOutcome, WaitConfig, WaitError, WaitReport};
pub use telemetry::{LogFormat, TelemetryError, init_logging};
