//! State history and post-run anomaly analysis
//!
//! An append-only, arrival-ordered sequence of registry snapshots, shared
//! by the probe loops that fetch state. Once every producer has stopped,
//! `analyze` walks adjacent snapshot pairs looking for regressions that a
//! healthy registry should never show.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::{HealthState, RegistryState};

/// A cross-snapshot regression found during analysis
///
/// Anomalies are report artifacts, not operation outcomes: they are
/// logged at warning severity and never touch the operation tally.
#[derive(Debug, Clone, PartialEq)]
pub enum Anomaly {
    /// Repository count went down between snapshots - possible data loss
    RepositoryCountDecreased { from: u64, to: u64 },
    /// Manifest count went down between snapshots
    ManifestCountDecreased { from: u64, to: u64 },
    /// Health left the healthy state
    HealthDegraded { from: HealthState, to: HealthState },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::RepositoryCountDecreased { from, to } => {
                write!(f, "repository count decreased: {from} -> {to}")
            }
            Anomaly::ManifestCountDecreased { from, to } => {
                write!(f, "manifest count decreased: {from} -> {to}")
            }
            Anomaly::HealthDegraded { from, to } => {
                write!(f, "health status degraded: {from} -> {to}")
            }
        }
    }
}

/// Shared, append-only snapshot history
///
/// Cloning yields another handle to the same sequence. Insertion order is
/// arrival order; snapshots are never removed or reordered.
#[derive(Debug, Clone, Default)]
pub struct StateHistory {
    inner: Arc<Mutex<Vec<RegistryState>>>,
}

impl StateHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one snapshot, preserving arrival order
    pub fn append(&self, snapshot: RegistryState) {
        self.inner.lock().push(snapshot);
    }

    /// Number of collected snapshots
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the collected snapshots, in arrival order
    pub fn snapshots(&self) -> Vec<RegistryState> {
        self.inner.lock().clone()
    }

    /// Walk adjacent snapshot pairs and flag regressions
    ///
    /// Runs once, after all producers have stopped. Each anomaly is
    /// logged at warning severity as it is found; none halts anything.
    pub fn analyze(&self) -> Vec<Anomaly> {
        let snapshots = self.inner.lock();
        info!(snapshots = snapshots.len(), "Analyzing state history");

        if snapshots.len() < 2 {
            warn!("Insufficient state history for analysis");
            return Vec::new();
        }

        let mut anomalies = Vec::new();
        for pair in snapshots.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);

            if curr.summary.total_repositories < prev.summary.total_repositories {
                warn!(
                    from = prev.summary.total_repositories,
                    to = curr.summary.total_repositories,
                    "Repository count decreased"
                );
                anomalies.push(Anomaly::RepositoryCountDecreased {
                    from: prev.summary.total_repositories,
                    to: curr.summary.total_repositories,
                });
            }

            if curr.summary.total_manifests < prev.summary.total_manifests {
                warn!(
                    from = prev.summary.total_manifests,
                    to = curr.summary.total_manifests,
                    "Manifest count decreased"
                );
                anomalies.push(Anomaly::ManifestCountDecreased {
                    from: prev.summary.total_manifests,
                    to: curr.summary.total_manifests,
                });
            }

            if prev.health.status == HealthState::Healthy
                && curr.health.status != HealthState::Healthy
            {
                warn!(
                    from = %prev.health.status,
                    to = %curr.health.status,
                    "Health status degraded"
                );
                anomalies.push(Anomaly::HealthDegraded {
                    from: prev.health.status,
                    to: curr.health.status,
                });
            }
        }

        anomalies
    }
}
