//! Quaymaster - Registry Torture-Test Harness
//!
//! A black-box verification harness for content-addressable registry
//! services. Quaymaster exercises a registry's read-only introspection
//! API under concurrent load and cross-checks the reported figures for
//! consistency, while independently sampling health and session state
//! over a bounded test window.
//!
//! ## Architecture
//!
//! Five duration-bounded probe loops run concurrently against one target,
//! feeding two shared accumulators; a post-run analysis pass walks the
//! collected state timeline for regressions.
//!
//! ## Modules
//!
//! - [`client`] - HTTP client for the registry introspection API
//! - `probes` - Probe loop implementations (monitor, health, consistency,
//!   sessions, stress)
//! - `config` - Configuration parsing (target, run window, per-probe)
//! - `report` - Shared tally, state history, analysis and summary
//! - `orchestrator` - Task scheduling and run execution

pub mod client;
pub mod config;
pub mod orchestrator;
pub mod probes;
pub mod report;
