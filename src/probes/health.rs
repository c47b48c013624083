//! Health check probe
//!
//! Polls the health endpoint. A healthy report is a debug line; anything
//! else is a warning carrying the registry's full detail map.
//!
//! ## Options
//!
//! - `interval`: poll cadence (default: 10s)

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::traits::{Probe, ProbeContext, ProbeError, ProbeOptions};
use crate::client::HealthState;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Continuous health sampling
pub struct HealthProbe;

#[async_trait]
impl Probe for HealthProbe {
    fn name(&self) -> &'static str {
        "health"
    }

    fn description(&self) -> &'static str {
        "Sample registry health and flag degradation"
    }

    async fn run(&self, ctx: &ProbeContext, opts: &ProbeOptions) -> Result<(), ProbeError> {
        let interval = opts.interval_or(DEFAULT_INTERVAL);
        info!(interval_secs = interval.as_secs(), "Starting health checks");

        while !ctx.expired() {
            match ctx.client.health().await {
                Ok(report) => {
                    if report.status == HealthState::Healthy {
                        debug!(status = %report.status, "Registry health");
                    } else {
                        warn!(status = %report.status, "Registry health degraded");
                        warn!(detail = ?report.detail, "Health detail");
                    }
                }
                Err(e) => error!(error = %e, "Failed to fetch registry health"),
            }

            ctx.pause(interval).await;
        }

        Ok(())
    }

    fn default_options(&self) -> ProbeOptions {
        ProbeOptions {
            interval: Some(DEFAULT_INTERVAL),
            extra: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RegistryClient;
    use crate::report::{OperationTally, StateHistory};
    use quaymaster_testkit::mock::MockRegistry;

    #[test]
    fn test_probe_metadata() {
        let probe = HealthProbe;
        assert_eq!(probe.name(), "health");
        assert_eq!(
            probe.default_options().interval,
            Some(Duration::from_secs(10))
        );
    }

    #[tokio::test]
    async fn test_health_probe_tolerates_degradation() {
        let mock = MockRegistry::new()
            .with_health("degraded")
            .with_health_detail("storage", serde_json::json!({"free_bytes": 0}))
            .spawn()
            .await;

        let client = RegistryClient::new(mock.base_url()).unwrap();
        let ctx = ProbeContext::new(
            client,
            OperationTally::new(),
            StateHistory::new(),
            1,
            Duration::from_millis(30),
        );
        let opts = ProbeOptions {
            interval: Some(Duration::from_millis(10)),
            extra: Default::default(),
        };

        // Degraded health is reported, never fatal
        HealthProbe.run(&ctx, &opts).await.unwrap();
    }

    #[tokio::test]
    async fn test_health_probe_survives_unavailable_target() {
        let mock = MockRegistry::new().spawn().await;
        mock.update(|reg| reg.fail_health = true);

        let client = RegistryClient::new(mock.base_url()).unwrap();
        let ctx = ProbeContext::new(
            client,
            OperationTally::new(),
            StateHistory::new(),
            1,
            Duration::from_millis(30),
        );
        let opts = ProbeOptions {
            interval: Some(Duration::from_millis(10)),
            extra: Default::default(),
        };

        HealthProbe.run(&ctx, &opts).await.unwrap();
    }
}
