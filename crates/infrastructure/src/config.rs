//! Application configuration
//!
//! Layered sources, lowest precedence first:
//! 1. built-in defaults
//! 2. TOML file (`--config`, or `ollama-chain.toml` in the working directory if present)
//! 3. `OLLAMA_CHAIN_*` environment variables (`__` separates nesting levels,
//!    e.g. `OLLAMA_CHAIN_CHAIN__TIMEOUT_SECS=300`)
//! 4. `OLLAMA_BASE_URL` for `chain.default_endpoint`
//!
//! Command-line flags are applied on top by the CLI.

use std::path::Path;

use ai_core::InferenceConfig;
use application::{DEFAULT_DIRECTIVE, DirectivePolicy, TranscriptFormat};
use domain::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endpoint_waiter::WaitConfig;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_NAME: &str = "ollama-chain";

/// Environment variable naming the fallback endpoint
pub const BASE_URL_ENV: &str = "OLLAMA_BASE_URL";

const ENV_PREFIX: &str = "OLLAMA_CHAIN";

/// Settings of the chain run itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Endpoint for stages without `@endpoint`
    #[serde(default = "default_endpoint")]
    pub default_endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Directive for stages after the first; empty disables it
    #[serde(default = "default_directive")]
    pub default_directive: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_timeout_secs() -> f64 {
    120.0
}

fn default_directive() -> String {
    DEFAULT_DIRECTIVE.to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            default_endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            default_directive: default_directive(),
        }
    }
}

impl ChainConfig {
    /// Client settings derived from this config
    pub fn inference(&self) -> InferenceConfig {
        InferenceConfig::with_timeout_secs(self.timeout_secs)
    }

    /// Directive policy derived from this config
    pub fn directive_policy(&self) -> DirectivePolicy {
        DirectivePolicy::new(&self.default_directive)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chain run settings
    #[serde(default)]
    pub chain: ChainConfig,

    /// Transcript rendering
    #[serde(default)]
    pub transcript: TranscriptFormat,

    /// Endpoint wait poller
    #[serde(default)]
    pub wait: WaitConfig,
}

impl AppConfig {
    /// Load configuration from all sources, reading `OLLAMA_BASE_URL`
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_base_url(path, std::env::var(BASE_URL_ENV).ok())
    }

    /// Load configuration with an explicit `OLLAMA_BASE_URL` value
    pub fn load_with_base_url(
        path: Option<&Path>,
        base_url: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let defaults = WaitConfig::default();
        let mut builder = config::Config::builder()
            .set_default("chain.default_endpoint", DEFAULT_ENDPOINT)?
            .set_default("chain.timeout_secs", default_timeout_secs())?
            .set_default("chain.default_directive", DEFAULT_DIRECTIVE)?
            .set_default("wait.retries", i64::from(defaults.retries))?
            .set_default("wait.delay_secs", defaults.delay_secs)?
            .set_default("wait.timeout_secs", defaults.timeout_secs)?;

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "chain.default_endpoint",
                base_url.filter(|url| !url.trim().is_empty()),
            )?;

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(
            default_endpoint = %config.chain.default_endpoint,
            timeout_secs = config.chain.timeout_secs,
            "Configuration loaded"
        );
        Ok(config)
    }
}
