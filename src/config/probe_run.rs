//! Run configuration types
//!
//! Defines the structure for probe run configuration files. Everything
//! here can also be set from the command line; CLI flags win.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::client::RegistryClient;
use crate::probes::ProbeOptions;

/// Default registry base URL - a local loopback instance
pub const DEFAULT_BASE_URL: &str = "http://localhost:7000";

/// Default run window
pub const DEFAULT_DURATION: Duration = Duration::from_secs(60);

/// Default stress worker count
pub const DEFAULT_WORKERS: usize = 10;

/// Errors that can occur during configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to create client: {0}")]
    Client(#[from] crate::client::RegistryError),
}

/// Which optional probes a run includes
///
/// Health and session sampling always run; the suite picks the rest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// State monitoring only
    Monitor,
    /// Consistency checks only
    Consistency,
    /// Stress workers only
    Stress,
    /// Everything
    #[default]
    All,
}

impl Suite {
    /// Whether this suite includes the named probe
    pub fn includes(&self, probe: &str) -> bool {
        match probe {
            "health" | "sessions" => true,
            "monitor" => matches!(self, Suite::Monitor | Suite::All),
            "consistency" => matches!(self, Suite::Consistency | Suite::All),
            "stress" => matches!(self, Suite::Stress | Suite::All),
            _ => false,
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Suite::Monitor => write!(f, "monitor"),
            Suite::Consistency => write!(f, "consistency"),
            Suite::Stress => write!(f, "stress"),
            Suite::All => write!(f, "all"),
        }
    }
}

/// Target registry endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Registry base URL (e.g., "http://localhost:7000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Basic auth username; absent means anonymous access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: None,
            password: None,
        }
    }
}

impl TargetConfig {
    /// Build a client for this target
    ///
    /// Credentials are attached only when both halves are present.
    pub fn to_client(&self) -> Result<RegistryClient, ConfigError> {
        let mut client = RegistryClient::new(&self.base_url)?;
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            client = client.with_credentials(username, password);
        }
        Ok(client)
    }
}

/// Run window and scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// How long the probe loops run
    #[serde(default = "default_duration", with = "humantime_serde")]
    pub duration: Duration,

    /// Stress worker count
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Which optional probes to include
    #[serde(default)]
    pub suite: Suite,
}

fn default_duration() -> Duration {
    DEFAULT_DURATION
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            workers: DEFAULT_WORKERS,
            suite: Suite::default(),
        }
    }
}

/// Configuration for a single probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Whether this probe is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Poll cadence override
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<Duration>,

    /// Additional probe-specific options
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: None,
            extra: HashMap::new(),
        }
    }
}

impl ProbeConfig {
    /// Convert to ProbeOptions, falling back to the probe's defaults
    pub fn to_probe_options(&self, defaults: &ProbeOptions) -> ProbeOptions {
        ProbeOptions {
            interval: self.interval.or(defaults.interval),
            extra: self.extra.clone(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target registry
    #[serde(default)]
    pub target: TargetConfig,

    /// Run window and scheduling
    #[serde(default)]
    pub run: RunConfig,

    /// Probe configurations (probe_name -> config)
    #[serde(default)]
    pub probes: HashMap<String, ProbeConfig>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Get configuration for a specific probe
    pub fn probe_config(&self, name: &str) -> Option<&ProbeConfig> {
        self.probes.get(name)
    }

    /// Check if a specific probe is enabled
    pub fn is_probe_enabled(&self, name: &str) -> bool {
        // Default to enabled if not specified
        self.probes.get(name).map(|c| c.enabled).unwrap_or(true)
    }

    /// Generate a default configuration
    pub fn default_config() -> Self {
        Config {
            target: TargetConfig::default(),
            run: RunConfig::default(),
            probes: {
                let mut probes = HashMap::new();
                probes.insert("monitor".to_string(), ProbeConfig::default());
                probes.insert("consistency".to_string(), ProbeConfig::default());
                probes.insert("stress".to_string(), ProbeConfig::default());
                probes
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r"
target:
  base_url: http://registry.test:7000
  username: admin
  password: hunter2

run:
  duration: 2m
  workers: 4
  suite: consistency

probes:
  monitor:
    enabled: true
    interval: 3s
  stress:
    enabled: false
";

    #[test]
    fn test_parse_config() {
        let config = Config::from_yaml(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.target.base_url, "http://registry.test:7000");
        assert_eq!(config.target.username.as_deref(), Some("admin"));
        assert_eq!(config.run.duration, Duration::from_secs(120));
        assert_eq!(config.run.workers, 4);
        assert_eq!(config.run.suite, Suite::Consistency);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.target.base_url, DEFAULT_BASE_URL);
        assert!(config.target.username.is_none());
        assert_eq!(config.run.duration, DEFAULT_DURATION);
        assert_eq!(config.run.workers, DEFAULT_WORKERS);
        assert_eq!(config.run.suite, Suite::All);
    }

    #[test]
    fn test_probe_enabled() {
        let config = Config::from_yaml(SAMPLE_CONFIG).unwrap();
        assert!(config.is_probe_enabled("monitor"));
        assert!(!config.is_probe_enabled("stress"));
        assert!(config.is_probe_enabled("unspecified")); // Default to enabled
    }

    #[test]
    fn test_probe_interval_override() {
        let config = Config::from_yaml(SAMPLE_CONFIG).unwrap();
        let defaults = ProbeOptions {
            interval: Some(Duration::from_secs(5)),
            extra: HashMap::new(),
        };

        let opts = config
            .probe_config("monitor")
            .unwrap()
            .to_probe_options(&defaults);
        assert_eq!(opts.interval, Some(Duration::from_secs(3)));

        // No config entry falls back to probe defaults
        let opts = ProbeConfig::default().to_probe_options(&defaults);
        assert_eq!(opts.interval, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_suite_membership() {
        assert!(Suite::All.includes("monitor"));
        assert!(Suite::All.includes("stress"));
        assert!(Suite::Monitor.includes("monitor"));
        assert!(!Suite::Monitor.includes("stress"));
        assert!(!Suite::Consistency.includes("monitor"));
        assert!(Suite::Consistency.includes("consistency"));

        // always-on samplers belong to every suite
        for suite in [Suite::Monitor, Suite::Consistency, Suite::Stress, Suite::All] {
            assert!(suite.includes("health"));
            assert!(suite.includes("sessions"));
        }
    }

    #[test]
    fn test_anonymous_target_builds_client() {
        let config = Config::from_yaml("{}").unwrap();
        let client = config.target.to_client().unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let config = Config::from_yaml("target:\n  username: admin\n").unwrap();
        let client = config.target.to_client().unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::default_config();
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.target.base_url, parsed.target.base_url);
        assert_eq!(config.run.duration, parsed.run.duration);
        assert_eq!(config.probes.len(), parsed.probes.len());
    }

    #[test]
    fn test_suite_display() {
        assert_eq!(Suite::Monitor.to_string(), "monitor");
        assert_eq!(Suite::All.to_string(), "all");
    }
}
