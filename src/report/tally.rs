//! Shared operation tally
//!
//! Attempt/failure counters shared by every probe loop and stress worker.
//! A single lock guards the pair, so concurrent records never lose an
//! update and a rate read always observes a consistent (attempts,
//! failures) snapshot.

use parking_lot::RwLock;
use std::sync::Arc;

/// Internal counter pair
///
/// Invariant: failures <= attempts, both monotonically non-decreasing
/// for the life of a run.
#[derive(Debug, Default)]
struct TallyInner {
    attempts: u64,
    failures: u64,
}

/// Concurrency-safe operation recorder
///
/// Cloning yields another handle to the same counters.
#[derive(Debug, Clone, Default)]
pub struct OperationTally {
    inner: Arc<RwLock<TallyInner>>,
}

impl OperationTally {
    /// Create a fresh tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one operation outcome
    ///
    /// Increments attempts, and failures iff the operation failed.
    /// Never blocks for long and has no failure mode of its own.
    pub fn record(&self, success: bool) {
        let mut inner = self.inner.write();
        inner.attempts += 1;
        if !success {
            inner.failures += 1;
        }
    }

    /// Consistent (attempts, failures) pair
    pub fn counts(&self) -> (u64, u64) {
        let inner = self.inner.read();
        (inner.attempts, inner.failures)
    }

    /// Total attempted operations
    pub fn attempts(&self) -> u64 {
        self.inner.read().attempts
    }

    /// Total failed operations
    pub fn failures(&self) -> u64 {
        self.inner.read().failures
    }

    /// Success rate in percent, in [0, 100]
    ///
    /// Zero attempts is a valid state and yields 0.0, not an error.
    pub fn success_rate(&self) -> f64 {
        let (attempts, failures) = self.counts();
        if attempts == 0 {
            0.0
        } else {
            (attempts - failures) as f64 / attempts as f64 * 100.0
        }
    }
}
