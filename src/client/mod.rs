//! Registry API client
//!
//! Hand-written client for the registry's read-only introspection API.
//! Four endpoints under `/api/registry/`: state, health, per-repository
//! detail, and active sessions.

mod registry;
mod types;

pub use registry::{Credentials, RegistryClient, RegistryError, RegistryResult};
pub use types::*;
