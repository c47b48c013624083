//! End-of-run summary
//!
//! Collects the final figures from the shared tally and history into one
//! value and emits the terminal summary block. The summary is the primary
//! signal of the run: everything else is the timeline behind it.

use serde::Serialize;
use tracing::info;

use super::history::{Anomaly, StateHistory};
use super::tally::OperationTally;

/// Final figures for one probe run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub operations: u64,
    pub failures: u64,
    /// Success rate in percent
    pub success_rate: f64,
    pub snapshots: usize,
    pub anomalies: usize,
}

impl RunSummary {
    /// Collect final figures from the shared run state
    pub fn collect(tally: &OperationTally, history: &StateHistory, anomalies: &[Anomaly]) -> Self {
        let (operations, failures) = tally.counts();
        Self {
            operations,
            failures,
            success_rate: tally.success_rate(),
            snapshots: history.len(),
            anomalies: anomalies.len(),
        }
    }

    /// Emit the terminal summary block
    pub fn emit(&self, history: &StateHistory) {
        info!("=== Probe run summary ===");
        info!(
            operations = self.operations,
            failures = self.failures,
            success_rate = %format_args!("{:.2}%", self.success_rate),
            "Operation tally"
        );
        info!(
            snapshots = self.snapshots,
            anomalies = self.anomalies,
            "State history"
        );

        let snapshots = history.snapshots();
        if let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) {
            info!(
                repositories = first.summary.total_repositories,
                manifests = first.summary.total_manifests,
                blobs = first.summary.total_blobs,
                health = %first.health.status,
                "Initial state"
            );
            info!(
                repositories = last.summary.total_repositories,
                manifests = last.summary.total_manifests,
                blobs = last.summary.total_blobs,
                health = %last.health.status,
                "Final state"
            );
        }
    }
}
