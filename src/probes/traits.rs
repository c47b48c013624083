//! Probe trait and supporting types
//!
//! The `Probe` trait defines the interface for all duration-bounded probe
//! loops. Each loop gets the shared run context, checks expiry at its
//! head, and absorbs per-call failures internally - a transient fetch
//! failure never terminates a loop early.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::client::RegistryClient;
use crate::report::{OperationTally, StateHistory};

/// Errors that can surface from a probe loop itself
///
/// Individual fetch failures are swallowed inside the loops; this only
/// covers conditions that make a loop unable to run at all.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Client error: {0}")]
    Client(#[from] crate::client::RegistryError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration options for a probe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeOptions {
    /// Poll cadence; `None` uses the probe's default
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<Duration>,

    /// Probe-specific options (arbitrary key-value pairs)
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ProbeOptions {
    /// Get the interval or a default value
    pub fn interval_or(&self, default: Duration) -> Duration {
        self.interval.unwrap_or(default)
    }

    /// Get an extra option as a specific type
    pub fn get_extra<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.extra
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Shared context for one probe run
///
/// Carries the two shared accumulators, the client handle, and the run
/// window. Every probe loop shares the same start instant, so all loops
/// expire together.
#[derive(Clone)]
pub struct ProbeContext {
    /// Client for the target registry
    pub client: Arc<RegistryClient>,
    /// Shared attempt/failure counters
    pub tally: OperationTally,
    /// Shared snapshot history
    pub history: StateHistory,
    /// Stress worker count
    pub workers: usize,
    started: Instant,
    window: Duration,
}

impl ProbeContext {
    /// Create a context; the run window starts now
    pub fn new(
        client: RegistryClient,
        tally: OperationTally,
        history: StateHistory,
        workers: usize,
        window: Duration,
    ) -> Self {
        Self {
            client: Arc::new(client),
            tally,
            history,
            workers,
            started: Instant::now(),
            window,
        }
    }

    /// Whether the run window has elapsed
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.window
    }

    /// Time left in the run window
    pub fn remaining(&self) -> Duration {
        self.window.saturating_sub(self.started.elapsed())
    }

    /// Sleep for an interval, capped to the remaining window
    ///
    /// Capping keeps a slow-cadence loop from overshooting the deadline
    /// by most of an interval; expiry is still only decided at the loop
    /// head.
    pub async fn pause(&self, interval: Duration) {
        tokio::time::sleep(interval.min(self.remaining())).await;
    }
}

/// Trait for implementing probe loops
///
/// Each probe repeatedly performs one kind of check against the target
/// until the run window expires. Probes are registered in the `PROBES`
/// roster and selected by name.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Unique name for this probe (used in CLI and config)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Run the probe loop until the context window expires
    async fn run(&self, ctx: &ProbeContext, opts: &ProbeOptions) -> Result<(), ProbeError>;

    /// Default options for this probe
    fn default_options(&self) -> ProbeOptions {
        ProbeOptions::default()
    }
}
