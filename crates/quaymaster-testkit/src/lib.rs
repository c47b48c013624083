//! Quaymaster Test Kit
//!
//! Test infrastructure and utilities for registry probe testing.
//!
//! This crate provides:
//! - A mock registry served over loopback HTTP, speaking the four
//!   introspection endpoints, with knobs for injecting inconsistencies
//! - Seeded random data generation for reproducible tests
//!
//! # Example
//!
//! ```rust
//! use quaymaster_testkit::random::PseudoGenerator;
//!
//! // Create reproducible random generator
//! let mut rng = PseudoGenerator::new(12345);
//!
//! // Generate registry-shaped data
//! let digest = rng.random_digest();
//! assert!(digest.starts_with("sha256:"));
//! ```

pub mod mock;
pub mod random;

// Re-exports for convenience
pub use mock::{MockRegistry, MockRegistryHandle, MockRepository, MockSession};
pub use random::PseudoGenerator;
