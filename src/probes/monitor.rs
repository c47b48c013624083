//! State monitor probe
//!
//! Polls the aggregate state endpoint, appends each successful snapshot
//! to the shared history, and logs a one-line digest of the figures.
//!
//! ## Options
//!
//! - `interval`: poll cadence (default: 5s)

use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

use super::traits::{Probe, ProbeContext, ProbeError, ProbeOptions};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Registry state monitor
///
/// Produces the snapshot timeline the post-run analysis consumes.
pub struct MonitorProbe;

#[async_trait]
impl Probe for MonitorProbe {
    fn name(&self) -> &'static str {
        "monitor"
    }

    fn description(&self) -> &'static str {
        "Track aggregate registry state over the run window"
    }

    async fn run(&self, ctx: &ProbeContext, opts: &ProbeOptions) -> Result<(), ProbeError> {
        let interval = opts.interval_or(DEFAULT_INTERVAL);
        info!(interval_secs = interval.as_secs(), "Starting state monitor");

        while !ctx.expired() {
            match ctx.client.state().await {
                Ok(state) => {
                    info!(
                        repositories = state.summary.total_repositories,
                        manifests = state.summary.total_manifests,
                        blobs = state.summary.total_blobs,
                        sessions = state.active_sessions.count,
                        health = %state.health.status,
                        "Registry state"
                    );
                    ctx.history.append(state);
                }
                Err(e) => error!(error = %e, "Failed to fetch registry state"),
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
    use quaymaster_testkit::mock::{MockRegistry, MockRepository};

    #[test]
    fn test_probe_metadata() {
        let probe = MonitorProbe;
        assert_eq!(probe.name(), "monitor");
        assert!(!probe.description().is_empty());
        assert_eq!(
            probe.default_options().interval,
            Some(Duration::from_secs(5))
        );
    }

    #[tokio::test]
    async fn test_monitor_appends_snapshots() {
        let mock = MockRegistry::new()
            .with_repository(MockRepository::new("app").with_tag("v1", Some("sha256:aa"), true))
            .spawn()
            .await;

        let client = RegistryClient::new(mock.base_url()).unwrap();
        let history = StateHistory::new();
        let ctx = ProbeContext::new(
            client,
            OperationTally::new(),
            history.clone(),
            1,
            Duration::from_millis(50),
        );
        let opts = ProbeOptions {
            interval: Some(Duration::from_millis(10)),
            extra: Default::default(),
        };

        MonitorProbe.run(&ctx, &opts).await.unwrap();

        assert!(!history.is_empty());
        assert_eq!(history.snapshots()[0].repositories[0].name, "app");
    }

    #[tokio::test]
    async fn test_monitor_survives_unavailable_target() {
        let mock = MockRegistry::new().spawn().await;
        mock.update(|reg| reg.fail_state = true);

        let client = RegistryClient::new(mock.base_url()).unwrap();
        let history = StateHistory::new();
        let ctx = ProbeContext::new(
            client,
            OperationTally::new(),
            history.clone(),
            1,
            Duration::from_millis(30),
        );
        let opts = ProbeOptions {
            interval: Some(Duration::from_millis(10)),
            extra: Default::default(),
        };

        MonitorProbe.run(&ctx, &opts).await.unwrap();
        assert!(history.is_empty());
    }
}
