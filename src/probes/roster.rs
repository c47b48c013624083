//! Probe roster
//!
//! Central registry of all available probes. New probes should be
//! registered here.
//!
//! The roster order is the order probes are reported in: the always-on
//! samplers (health, sessions) first, then the suite-selected ones in
//! increasing cadence.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::consistency::ConsistencyProbe;
use super::health::HealthProbe;
use super::monitor::MonitorProbe;
use super::sessions::SessionProbe;
use super::stress::StressProbe;
use super::traits::Probe;

/// Global registry of all available probes
///
/// Uses IndexMap to preserve insertion order so runs report probes in a
/// deterministic sequence.
pub static PROBES: Lazy<IndexMap<&'static str, Arc<dyn Probe>>> = Lazy::new(|| {
    let mut m: IndexMap<&'static str, Arc<dyn Probe>> = IndexMap::new();

    // Always-on samplers
    m.insert("health", Arc::new(HealthProbe));
    m.insert("sessions", Arc::new(SessionProbe));

    // Suite-selected probes
    m.insert("monitor", Arc::new(MonitorProbe));
    m.insert("consistency", Arc::new(ConsistencyProbe));
    m.insert("stress", Arc::new(StressProbe));

    m
});

/// Get a probe by name
pub fn get_probe(name: &str) -> Option<Arc<dyn Probe>> {
    PROBES.get(name).cloned()
}

/// List all available probe names
pub fn list_probes() -> Vec<&'static str> {
    PROBES.keys().copied().collect()
}
