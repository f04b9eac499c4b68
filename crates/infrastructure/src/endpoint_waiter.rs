//! Endpoint wait poller
//!
//! Polls HTTP endpoints until they answer with a status in 200–399, e.g. to
//! block until freshly started model servers are up before running a chain.
//! Redirects are followed and the final status is judged. URLs are polled one
//! after another.

use std::{fmt, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors raised before any polling happens
#[derive(Debug, Error)]
pub enum WaitError {
    /// Poller settings are unusable
    #[error("Invalid wait configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

/// Poller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Attempts per URL
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Seconds between attempts
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

const fn default_retries() -> u32 {
    24
}

const fn default_delay_secs() -> f64 {
    5.0
}

const fn default_timeout_secs() -> f64 {
    5.0
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            delay_secs: default_delay_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WaitConfig {
    fn delay(&self) -> Result<Duration, WaitError> {
        seconds("delay", self.delay_secs, true)
    }

    fn timeout(&self) -> Result<Duration, WaitError> {
        seconds("timeout", self.timeout_secs, false)
    }
}

fn seconds(name: &str, value: f64, allow_zero: bool) -> Result<Duration, WaitError> {
    let valid = value.is_finite() && if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !valid {
        return Err(WaitError::InvalidConfig(format!(
            "{name} must be a positive number of seconds, got {value}"
        )));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|e| WaitError::InvalidConfig(format!("{name}: {e}")))
}

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Status in 200–399
    Healthy(u16),
    /// Any other status
    Unhealthy(u16),
    /// No HTTP response at all
    Unreachable(String),
}

impl ProbeOutcome {
    /// Whether the endpoint counts as up
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy(_))
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy(status) => write!(f, "healthy (HTTP {status})"),
            Self::Unhealthy(status) => write!(f, "responded with HTTP {status}"),
            Self::Unreachable(reason) => write!(f, "not reachable: {reason}"),
        }
    }
}

/// Final state of one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitReport {
    /// The polled URL
    pub url: String,
    /// Whether it became healthy
    pub healthy: bool,
    /// Attempts made
    pub attempts: u32,
    /// Outcome of the last attempt, `None` if no attempt was made
    pub last_outcome: Option<ProbeOutcome>,
}

impl fmt::Display for WaitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.healthy {
            write!(f, "{} healthy after {} attempt(s)", self.url, self.attempts)
        } else {
            write!(
                f,
                "{} failed health check after {} attempt(s)",
                self.url, self.attempts
            )
        }
    }
}

/// Polls endpoints until they report healthy
pub struct EndpointWaiter {
    client: Client,
    config: WaitConfig,
    delay: Duration,
}

impl fmt::Debug for EndpointWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointWaiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EndpointWaiter {
    /// Create a poller
    pub fn new(config: WaitConfig) -> Result<Self, WaitError> {
        if config.retries == 0 {
            return Err(WaitError::InvalidConfig(
                "retries must be at least 1".to_string(),
            ));
        }
        let delay = config.delay()?;
        let client = Client::builder()
            .timeout(config.timeout()?)
            .build()
            .map_err(|e| WaitError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            config,
            delay,
        })
    }

    /// Issue one GET request
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || status.is_redirection() {
                    ProbeOutcome::Healthy(status.as_u16())
                } else {
                    ProbeOutcome::Unhealthy(status.as_u16())
                }
            },
            Err(e) if e.is_timeout() => ProbeOutcome::Unreachable("request timed out".to_string()),
            Err(e) => ProbeOutcome::Unreachable(e.to_string()),
        }
    }

    /// Poll one URL until healthy or out of attempts
    #[instrument(skip(self), fields(retries = self.config.retries))]
    pub async fn wait_for(&self, url: &str) -> WaitReport {
        let mut last_outcome = None;

        for attempt in 1..=self.config.retries {
            let outcome = self.probe(url).await;
            if outcome.is_healthy() {
                info!(attempt, "Endpoint healthy");
                return WaitReport {
                    url: url.to_string(),
                    healthy: true,
                    attempts: attempt,
                    last_outcome: Some(outcome),
                };
            }

            debug!(attempt, outcome = %outcome, "Endpoint not ready");
            last_outcome = Some(outcome);
            if attempt < self.config.retries {
                tokio::time::sleep(self.delay).await;
            }
        }

        warn!(
            outcome = ?last_outcome,
            "Endpoint failed health check"
        );
        WaitReport {
            url: url.to_string(),
            healthy: false,
            attempts: self.config.retries,
            last_outcome,
        }
    }

    /// Poll every URL in order
    pub async fn wait_for_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<WaitReport> {
        let mut reports = Vec::with_capacity(urls.len());
        for url in urls {
            reports.push(self.wait_for(url.as_ref()).await);
        }
        reports
    }
}
