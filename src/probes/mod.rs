//! Probe loop implementations
//!
//! This module provides the `Probe` trait and the five duration-bounded
//! loops that exercise the registry:
//!
//! - **health** / **sessions**: always-on samplers
//! - **monitor**: state timeline collection
//! - **consistency**: cross-checks between independently-reported views
//! - **stress**: concurrent randomized read load
//!
//! ## Adding New Probes
//!
//! 1. Create a new file in `src/probes/` (e.g., `myprobe.rs`)
//! 2. Implement the `Probe` trait
//! 3. Register in `roster.rs`
//! 4. Add to `mod.rs` exports

mod consistency;
mod health;
mod monitor;
pub mod roster;
mod sessions;
mod stress;
mod traits;

pub use consistency::ConsistencyProbe;
pub use health::HealthProbe;
pub use monitor::MonitorProbe;
pub use roster::PROBES;
pub use sessions::SessionProbe;
pub use stress::StressProbe;
pub use traits::*;
