//! Configuration parsing
//!
//! Handles the probe run configuration file and per-probe options.
//!
//! ## Configuration Format
//!
//! ```yaml
//! target:
//!   base_url: http://localhost:7000
//!   username: admin      # optional; absent = anonymous access
//!   password: admin
//!
//! run:
//!   duration: 60s
//!   workers: 10
//!   suite: all
//!
//! probes:
//!   monitor:
//!     enabled: true
//!     interval: 5s
//!
//!   stress:
//!     enabled: false
//! ```

mod probe_run;

pub use probe_run::{
    Config, ConfigError, ProbeConfig, RunConfig, Suite, TargetConfig, DEFAULT_BASE_URL,
    DEFAULT_DURATION, DEFAULT_WORKERS,
};
