//! Seeded random data generation
//!
//! Reproducible random registry data for tests. Using the same seed
//! produces identical sequences of names, tags and digests, making
//! failures reproducible.
//!
//! # Example
//!
//! ```rust
//! use quaymaster_testkit::random::PseudoGenerator;
//!
//! let mut rng1 = PseudoGenerator::new(42);
//! let mut rng2 = PseudoGenerator::new(42);
//!
//! assert_eq!(rng1.random_digest(), rng2.random_digest());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded pseudo-random generator for reproducible registry test data
#[derive(Debug)]
pub struct PseudoGenerator {
    rng: StdRng,
    seed: u64,
}

impl PseudoGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the seed used to create this generator
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a content digest in `sha256:<64 hex>` form
    pub fn random_digest(&mut self) -> String {
        let mut digest = String::with_capacity(71);
        digest.push_str("sha256:");
        for _ in 0..32 {
            let byte: u8 = self.rng.random();
            digest.push_str(&format!("{byte:02x}"));
        }
        digest
    }

    /// Generate a repository name
    pub fn random_repository_name(&mut self) -> String {
        format!("repo-{:04x}", self.rng.random_range(0..0x10000u32))
    }

    /// Generate a semver-shaped tag name
    pub fn random_tag(&mut self) -> String {
        format!(
            "v{}.{}.{}",
            self.rng.random_range(0..10u32),
            self.rng.random_range(0..20u32),
            self.rng.random_range(0..50u32)
        )
    }

    /// Generate a session identifier
    pub fn random_session_id(&mut self) -> String {
        format!("session-{:08x}", self.rng.random::<u32>())
    }

    /// Generate a random u64
    pub fn random_u64(&mut self) -> u64 {
        self.rng.random()
    }

    /// Generate a random usize in the given range
    pub fn random_range(&mut self, range: std::ops::Range<usize>) -> usize {
        self.rng.random_range(range)
    }
}

/// Create multiple pseudo-random generators from a single seed
///
/// Useful when several independent random streams must still be
/// reproducible from one seed.
pub fn pseudo_generators(seed: u64, count: usize) -> Vec<PseudoGenerator> {
    let mut master_rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| PseudoGenerator::new(master_rng.random()))
        .collect()
}

/// Generate a random seed (for when reproducibility does not matter)
pub fn random_seed() -> u64 {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut rng1 = PseudoGenerator::new(12345);
        let mut rng2 = PseudoGenerator::new(12345);

        assert_eq!(rng1.random_digest(), rng2.random_digest());
        assert_eq!(rng1.random_repository_name(), rng2.random_repository_name());
        assert_eq!(rng1.random_tag(), rng2.random_tag());
    }

    #[test]
    fn test_different_seeds_different_output() {
        let mut rng1 = PseudoGenerator::new(1);
        let mut rng2 = PseudoGenerator::new(2);

        assert_ne!(rng1.random_digest(), rng2.random_digest());
    }

    #[test]
    fn test_digest_shape() {
        let mut rng = PseudoGenerator::new(42);
        let digest = rng.random_digest();

        assert!(digest.starts_with("sha256:"));
        assert_eq!(digest.len(), 71);
        assert!(digest["sha256:".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_pseudo_generators() {
        let rngs1 = pseudo_generators(42, 3);
        let rngs2 = pseudo_generators(42, 3);

        for (mut r1, mut r2) in rngs1.into_iter().zip(rngs2.into_iter()) {
            assert_eq!(r1.random_digest(), r2.random_digest());
        }
    }

    #[test]
    fn test_seed_getter() {
        let rng = PseudoGenerator::new(999);
        assert_eq!(rng.seed(), 999);
    }
}
