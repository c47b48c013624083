//! Session monitor probe
//!
//! Polls the active session listing, logs the total, and flags sessions
//! that have been open long enough to suggest a stuck upload.
//!
//! ## Options
//!
//! - `interval`: poll cadence (default: 20s)

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::traits::{Probe, ProbeContext, ProbeError, ProbeOptions};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(20);

/// Sessions older than this are flagged as long-running (5 minutes)
const LONG_SESSION_MS: u64 = 300_000;

/// Active session monitor
pub struct SessionProbe;

#[async_trait]
impl Probe for SessionProbe {
    fn name(&self) -> &'static str {
        "sessions"
    }

    fn description(&self) -> &'static str {
        "Track active upload sessions and flag long-running ones"
    }

    async fn run(&self, ctx: &ProbeContext, opts: &ProbeOptions) -> Result<(), ProbeError> {
        let interval = opts.interval_or(DEFAULT_INTERVAL);
        info!(
            interval_secs = interval.as_secs(),
            "Starting session monitoring"
        );

        while !ctx.expired() {
            match ctx.client.sessions().await {
                Ok(report) => {
                    info!(active = report.total_active_sessions, "Active sessions");

                    for session in &report.active_sessions {
                        debug!(
                            session = %session.id,
                            duration_ms = session.duration,
                            blobs = session.blob_count,
                            "Session"
                        );

                        if session.duration > LONG_SESSION_MS {
                            warn!(
                                session = %session.id,
                                duration_ms = session.duration,
                                "Long-running session detected"
                            );
                        }
                    }
                }
                Err(e) => error!(error = %e, "Failed to fetch active sessions"),
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
    use quaymaster_testkit::mock::{MockRegistry, MockSession};

    #[test]
    fn test_probe_metadata() {
        let probe = SessionProbe;
        assert_eq!(probe.name(), "sessions");
        assert_eq!(
            probe.default_options().interval,
            Some(Duration::from_secs(20))
        );
    }

    #[tokio::test]
    async fn test_session_probe_handles_long_running_sessions() {
        let mock = MockRegistry::new()
            .with_session(MockSession::new("upload-1", 12_000, 3))
            .with_session(MockSession::new("upload-2", LONG_SESSION_MS + 1, 40))
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

        SessionProbe.run(&ctx, &opts).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_probe_survives_unavailable_target() {
        let mock = MockRegistry::new().spawn().await;
        mock.update(|reg| reg.fail_sessions = true);

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

        SessionProbe.run(&ctx, &opts).await.unwrap();
    }
}
