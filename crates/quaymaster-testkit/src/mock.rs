//! Mock registry for unit and probe testing
//!
//! An in-memory registry dataset served over loopback HTTP, speaking the
//! same four introspection endpoints the real registry exposes. Tests
//! build a dataset, spawn it on an ephemeral port, and point a client at
//! `handle.base_url()`. The dataset stays mutable behind the handle so a
//! test can inject inconsistencies or degrade health between polls.
//!
//! # Example
//!
//! ```no_run
//! use quaymaster_testkit::mock::{MockRegistry, MockRepository};
//!
//! # async fn example() {
//! let mock = MockRegistry::new()
//!     .with_repository(MockRepository::new("app").with_tag("v1", Some("sha256:aa"), true))
//!     .spawn()
//!     .await;
//!
//! // probe http://{addr}/api/registry/state ...
//! mock.update(|reg| reg.health = "degraded".to_string());
//! # }
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One tag in a mock repository
#[derive(Debug, Clone)]
pub struct MockTag {
    pub tag: String,
    pub digest: Option<String>,
    pub has_manifest: bool,
}

/// Mock repository with its tags
#[derive(Debug, Clone)]
pub struct MockRepository {
    pub name: String,
    pub tags: Vec<MockTag>,
    /// Tag count reported in the state summary; `None` reports the real
    /// count. Set this to skew the summary against the detail endpoint.
    pub reported_tag_count: Option<u64>,
    /// List the repository in the state summary but 404 its detail
    pub detail_missing: bool,
}

impl MockRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            reported_tag_count: None,
            detail_missing: false,
        }
    }

    /// Add a tag
    pub fn with_tag(
        mut self,
        tag: impl Into<String>,
        digest: Option<&str>,
        has_manifest: bool,
    ) -> Self {
        self.tags.push(MockTag {
            tag: tag.into(),
            digest: digest.map(str::to_string),
            has_manifest,
        });
        self
    }

    /// Report a different tag count in the state summary than the detail
    /// endpoint will serve
    pub fn with_reported_tag_count(mut self, count: u64) -> Self {
        self.reported_tag_count = Some(count);
        self
    }

    /// Keep the repository listed but make its detail endpoint 404
    pub fn with_missing_detail(mut self) -> Self {
        self.detail_missing = true;
        self
    }

    fn summary_tag_count(&self) -> u64 {
        self.reported_tag_count
            .unwrap_or(self.tags.len() as u64)
    }
}

/// One active mock upload session
#[derive(Debug, Clone)]
pub struct MockSession {
    pub id: String,
    pub duration_ms: u64,
    pub blob_count: u64,
}

impl MockSession {
    pub fn new(id: impl Into<String>, duration_ms: u64, blob_count: u64) -> Self {
        Self {
            id: id.into(),
            duration_ms,
            blob_count,
        }
    }
}

/// Mock registry dataset
#[derive(Debug, Default)]
pub struct MockRegistry {
    pub repositories: Vec<MockRepository>,
    pub sessions: Vec<MockSession>,
    /// Health status string served by both the state and health endpoints
    pub health: String,
    /// Extra fields merged into the health document
    pub health_detail: Map<String, Value>,
    /// Manifest count override; `None` counts tags carrying a manifest
    pub manifest_count: Option<u64>,
    pub blob_count: u64,
    /// Serve 503 from the state endpoint
    pub fail_state: bool,
    /// Serve 503 from the health endpoint
    pub fail_health: bool,
    /// Serve 503 from the sessions endpoint
    pub fail_sessions: bool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            health: "healthy".to_string(),
            ..Self::default()
        }
    }

    pub fn with_repository(mut self, repo: MockRepository) -> Self {
        self.repositories.push(repo);
        self
    }

    pub fn with_session(mut self, session: MockSession) -> Self {
        self.sessions.push(session);
        self
    }

    pub fn with_health(mut self, status: impl Into<String>) -> Self {
        self.health = status.into();
        self
    }

    pub fn with_health_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.health_detail.insert(key.into(), value);
        self
    }

    pub fn with_blob_count(mut self, count: u64) -> Self {
        self.blob_count = count;
        self
    }

    pub fn with_manifest_count(mut self, count: u64) -> Self {
        self.manifest_count = Some(count);
        self
    }

    fn manifest_total(&self) -> u64 {
        self.manifest_count.unwrap_or_else(|| {
            self.repositories
                .iter()
                .flat_map(|r| r.tags.iter())
                .filter(|t| t.has_manifest)
                .count() as u64
        })
    }

    fn state_document(&self) -> Value {
        json!({
            "timestamp": now_secs(),
            "summary": {
                "totalRepositories": self.repositories.len(),
                "totalManifests": self.manifest_total(),
                "totalBlobs": self.blob_count,
            },
            "activeSessions": {"count": self.sessions.len()},
            "health": {"status": self.health},
            "repositories": self.repositories.iter().map(|r| json!({
                "name": r.name,
                "tagCount": r.summary_tag_count(),
            })).collect::<Vec<_>>(),
        })
    }

    fn health_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("status".to_string(), json!(self.health));
        doc.extend(self.health_detail.clone());
        Value::Object(doc)
    }

    fn repository_document(&self, name: &str) -> Option<Value> {
        let repo = self
            .repositories
            .iter()
            .find(|r| r.name == name && !r.detail_missing)?;
        Some(json!({
            "name": repo.name,
            "tagCount": repo.tags.len(),
            "tags": repo.tags.iter().map(|t| json!({
                "tag": t.tag,
                "digest": t.digest,
                "hasManifest": t.has_manifest,
            })).collect::<Vec<_>>(),
        }))
    }

    fn sessions_document(&self) -> Value {
        json!({
            "totalActiveSessions": self.sessions.len(),
            "activeSessions": self.sessions.iter().map(|s| json!({
                "id": s.id,
                "duration": s.duration_ms,
                "blobCount": s.blob_count,
            })).collect::<Vec<_>>(),
        })
    }

    /// Serve this dataset on an ephemeral loopback port
    pub async fn spawn(self) -> MockRegistryHandle {
        let registry = Arc::new(RwLock::new(self));
        let app = router(registry.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock registry listener");
        let addr = listener.local_addr().expect("mock registry local addr");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockRegistryHandle {
            base_url: format!("http://{addr}"),
            registry,
            server,
        }
    }
}

type SharedRegistry = Arc<RwLock<MockRegistry>>;

/// Handle to a running mock registry
///
/// The server is aborted when the handle drops.
pub struct MockRegistryHandle {
    base_url: String,
    registry: SharedRegistry,
    server: JoinHandle<()>,
}

impl MockRegistryHandle {
    /// Base URL to point a client at
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Mutate the served dataset in place
    pub fn update(&self, mutate: impl FnOnce(&mut MockRegistry)) {
        mutate(&mut self.registry.write());
    }
}

impl Drop for MockRegistryHandle {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(registry: SharedRegistry) -> Router {
    Router::new()
        .route("/api/registry/state", get(state_handler))
        .route("/api/registry/health", get(health_handler))
        .route("/api/registry/repositories/{name}", get(repository_handler))
        .route("/api/registry/sessions", get(sessions_handler))
        .with_state(registry)
}

async fn state_handler(State(registry): State<SharedRegistry>) -> Response {
    let reg = registry.read();
    if reg.fail_state {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(reg.state_document()).into_response()
}

async fn health_handler(State(registry): State<SharedRegistry>) -> Response {
    let reg = registry.read();
    if reg.fail_health {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(reg.health_document()).into_response()
}

async fn repository_handler(
    State(registry): State<SharedRegistry>,
    Path(name): Path<String>,
) -> Response {
    let reg = registry.read();
    match reg.repository_document(&name) {
        Some(doc) => Json(doc).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn sessions_handler(State(registry): State<SharedRegistry>) -> Response {
    let reg = registry.read();
    if reg.fail_sessions {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(reg.sessions_document()).into_response()
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
