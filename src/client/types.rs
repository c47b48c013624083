//! Registry introspection API types
//!
//! Payload types for the read-only introspection endpoints under
//! `/api/registry/`. Fields the registry always reports are required here;
//! a payload missing one fails deserialization and the call is reported as
//! unavailable instead of leaking a hole downstream.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reported health of the registry
///
/// Endpoint payloads carry this as a lowercase string. Anything the
/// registry invents beyond the three known states maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Degraded => write!(f, "degraded"),
            HealthState::Unhealthy => write!(f, "unhealthy"),
            HealthState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Aggregate object counters
/// Endpoint: GET /api/registry/state (`summary`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub total_repositories: u64,
    pub total_manifests: u64,
    pub total_blobs: u64,
}

/// Active session counter nested in the state document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCount {
    pub count: u64,
}

/// Health fragment nested in the state document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub status: HealthState,
}

/// Per-repository summary line in the state document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    pub tag_count: u64,
}

/// One point-in-time capture of aggregate registry state
/// Endpoint: GET /api/registry/state
///
/// This is the snapshot value appended to the state history; it is never
/// mutated after a successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryState {
    /// Capture time, seconds since epoch
    pub timestamp: u64,
    pub summary: StateSummary,
    pub active_sessions: SessionCount,
    pub health: HealthSummary,
    #[serde(default)]
    pub repositories: Vec<RepositorySummary>,
}

/// Health report with free-form detail
/// Endpoint: GET /api/registry/health
///
/// Everything beyond `status` is registry-specific detail, kept verbatim
/// so a degraded status can be logged with full context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthState,
    #[serde(flatten)]
    pub detail: HashMap<String, serde_json::Value>,
}

/// One tag entry in a repository detail document
///
/// `hasManifest` is required: a manifest flag the registry fails to report
/// is a malformed payload, not an implicit false. The digest is genuinely
/// optional - untagged uploads may not carry one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub tag: String,
    #[serde(default)]
    pub digest: Option<String>,
    pub has_manifest: bool,
}

/// Detailed per-repository view
/// Endpoint: GET /api/registry/repositories/{name}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDetail {
    #[serde(default)]
    pub name: String,
    pub tag_count: u64,
    #[serde(default)]
    pub tags: Vec<TagEntry>,
}

/// One active upload session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    /// Elapsed session time in milliseconds
    pub duration: u64,
    pub blob_count: u64,
}

/// Active session listing
/// Endpoint: GET /api/registry/sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub total_active_sessions: u64,
    #[serde(default)]
    pub active_sessions: Vec<SessionInfo>,
}
