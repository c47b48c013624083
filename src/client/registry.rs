//! Registry HTTP API client
//!
//! Typed accessors over the registry's read-only introspection endpoints.
//! Every call performs exactly one GET and returns either a parsed payload
//! or an explicit error value; nothing escapes a probe call as a panic and
//! no call is ever retried here.

use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use super::types::{HealthReport, RegistryState, RepositoryDetail, SessionReport};

/// Errors that can occur when querying the registry API
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Registry returned HTTP {status}")]
    Status { status: StatusCode },
}

/// Result type for registry API operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Optional HTTP basic credentials, attached uniformly to every request
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Client for a registry's introspection API
///
/// # Example
/// ```no_run
/// use quaymaster::client::RegistryClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RegistryClient::new("http://localhost:7000")?;
/// let state = client.state().await?;
/// println!("repositories: {}", state.summary.total_repositories);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Base URL of the registry (e.g., http://localhost:7000)
    base_url: Url,
    /// HTTP client for making requests
    client: Client,
    /// Basic auth credentials; `None` is anonymous mode
    credentials: Option<Credentials>,
}

impl RegistryClient {
    /// Create a new client for the given registry URL
    ///
    /// Certificate verification is disabled: targets are test or staging
    /// instances behind self-signed certificates. Do not point this at
    /// anything whose identity actually matters.
    pub fn new(base_url: &str) -> RegistryResult<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            base_url,
            client,
            credentials: None,
        })
    }

    /// Attach HTTP basic credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Whether credentials are configured
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Configured username, if any
    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the aggregate registry state
    ///
    /// GET /api/registry/state
    pub async fn state(&self) -> RegistryResult<RegistryState> {
        self.get("api/registry/state").await
    }

    /// Fetch the registry health report
    ///
    /// GET /api/registry/health
    pub async fn health(&self) -> RegistryResult<HealthReport> {
        self.get("api/registry/health").await
    }

    /// Fetch the detailed view of one repository
    ///
    /// GET /api/registry/repositories/{name}
    pub async fn repository(&self, name: &str) -> RegistryResult<RepositoryDetail> {
        self.get(&format!("api/registry/repositories/{name}")).await
    }

    /// Fetch the active session listing
    ///
    /// GET /api/registry/sessions
    pub async fn sessions(&self) -> RegistryResult<SessionReport> {
        self.get("api/registry/sessions").await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> RegistryResult<T> {
        let url = self.base_url.join(path)?;
        let mut request = self.client.get(url);

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(RegistryError::Status {
                status: response.status(),
            })
        }
    }
}
