//! Probe run orchestration
//!
//! Builds the shared run context, starts the selected probes as
//! concurrent tasks, waits for every loop to hit the deadline, then runs
//! the history analysis and emits the summary.
//!
//! Probe-level failures never fail the run; only being unable to start -
//! an unusable client, an unknown probe - is fatal.

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::Config;
use crate::probes::{roster, ProbeContext};
use crate::report::{Anomaly, OperationTally, RunSummary, StateHistory};

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub anomalies: Vec<Anomaly>,
}

/// Probe names this run will start, in roster order
///
/// Health and session sampling always run; the suite picks the optional
/// probes, and config can disable those.
fn selected_probes(config: &Config) -> Vec<&'static str> {
    roster::PROBES
        .keys()
        .copied()
        .filter(|name| match *name {
            "health" | "sessions" => true,
            other => config.run.suite.includes(other) && config.is_probe_enabled(other),
        })
        .collect()
}

/// Execute one probe run against the configured target
pub async fn run(config: &Config) -> Result<RunOutcome> {
    let client = config
        .target
        .to_client()
        .context("Failed to create registry client")?;

    match client.username() {
        Some(username) => info!(username = %username, "Using authentication"),
        None => info!("No authentication configured - using anonymous access"),
    }

    let tally = OperationTally::new();
    let history = StateHistory::new();
    let ctx = ProbeContext::new(
        client,
        tally.clone(),
        history.clone(),
        config.run.workers,
        config.run.duration,
    );

    let names = selected_probes(config);
    info!(
        duration_secs = config.run.duration.as_secs(),
        suite = %config.run.suite,
        probes = ?names,
        "Starting probe run"
    );

    let mut handles = Vec::new();
    for name in names {
        let probe = roster::get_probe(name).with_context(|| format!("Unknown probe {name}"))?;
        let opts = config
            .probe_config(name)
            .map(|c| c.to_probe_options(&probe.default_options()))
            .unwrap_or_else(|| probe.default_options());
        let ctx = ctx.clone();

        handles.push(tokio::spawn(async move {
            let result = probe.run(&ctx, &opts).await;
            (probe.name(), result)
        }));
    }

    for handle in handles {
        match handle.await {
            Ok((name, Ok(()))) => info!(probe = %name, "Probe stopped"),
            Ok((name, Err(e))) => error!(probe = %name, error = %e, "Probe failed"),
            Err(e) => error!(error = %e, "Probe task panicked"),
        }
    }

    let anomalies = history.analyze();
    let summary = RunSummary::collect(&tally, &history, &anomalies);
    summary.emit(&history);

    Ok(RunOutcome { summary, anomalies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProbeConfig, Suite};
    use quaymaster_testkit::mock::{MockRegistry, MockRepository, MockSession};
    use std::time::Duration;

    fn config_for(base_url: &str, suite: Suite, duration: Duration) -> Config {
        let mut config = Config::default();
        config.target.base_url = base_url.to_string();
        config.run.suite = suite;
        config.run.duration = duration;
        config.run.workers = 2;
        config
    }

    #[test]
    fn test_selection_always_includes_samplers() {
        for suite in [Suite::Monitor, Suite::Consistency, Suite::Stress, Suite::All] {
            let mut config = Config::default();
            config.run.suite = suite;
            let names = selected_probes(&config);
            assert!(names.contains(&"health"));
            assert!(names.contains(&"sessions"));
        }
    }

    #[test]
    fn test_selection_follows_suite() {
        let mut config = Config::default();
        config.run.suite = Suite::Monitor;
        let names = selected_probes(&config);
        assert!(names.contains(&"monitor"));
        assert!(!names.contains(&"consistency"));
        assert!(!names.contains(&"stress"));

        config.run.suite = Suite::All;
        assert_eq!(selected_probes(&config).len(), 5);
    }

    #[test]
    fn test_config_can_disable_optional_probes() {
        let mut config = Config::default();
        config.run.suite = Suite::All;
        config.probes.insert(
            "stress".to_string(),
            ProbeConfig {
                enabled: false,
                ..ProbeConfig::default()
            },
        );

        let names = selected_probes(&config);
        assert!(!names.contains(&"stress"));
        assert!(names.contains(&"monitor"));
    }

    #[tokio::test]
    async fn test_full_run_against_mock() {
        let mock = MockRegistry::new()
            .with_repository(MockRepository::new("app").with_tag("v1", Some("sha256:aa"), true))
            .with_session(MockSession::new("upload-1", 2_000, 1))
            .spawn()
            .await;

        let config = config_for(mock.base_url(), Suite::All, Duration::from_millis(300));
        let outcome = run(&config).await.unwrap();

        assert!(outcome.summary.operations > 0);
        assert!(outcome.summary.snapshots > 0);
        assert_eq!(outcome.summary.failures, 0);
        assert!(outcome.anomalies.is_empty());
    }

    #[tokio::test]
    async fn test_run_reports_injected_anomaly() {
        let mock = MockRegistry::new()
            .with_repository(MockRepository::new("app").with_tag("v1", Some("sha256:aa"), true))
            .with_repository(MockRepository::new("base").with_tag("v2", Some("sha256:bb"), true))
            .spawn()
            .await;

        let mut config = config_for(mock.base_url(), Suite::Monitor, Duration::from_millis(400));
        config.probes.insert(
            "monitor".to_string(),
            ProbeConfig {
                interval: Some(Duration::from_millis(50)),
                ..ProbeConfig::default()
            },
        );

        // shrink the dataset mid-run so adjacent snapshots disagree
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            mock.update(|reg| {
                reg.repositories.pop();
            });
            mock
        });

        let outcome = run(&config).await.unwrap();
        let _mock = handle.await.unwrap();

        assert!(outcome
            .anomalies
            .iter()
            .any(|a| matches!(a, Anomaly::RepositoryCountDecreased { .. })));
    }

    #[tokio::test]
    async fn test_run_with_unreachable_target_still_summarizes() {
        // nothing listens on this port; every probe call fails, the run
        // still completes and reports
        let config = config_for(
            "http://127.0.0.1:1",
            Suite::Stress,
            Duration::from_millis(200),
        );
        let outcome = run(&config).await.unwrap();

        assert!(outcome.summary.operations > 0);
        assert_eq!(outcome.summary.operations, outcome.summary.failures);
        assert_eq!(outcome.summary.success_rate, 0.0);
        assert_eq!(outcome.summary.snapshots, 0);
    }
}
