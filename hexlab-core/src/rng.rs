//! Seeded randomness for castings.
//!
//! A master seed expands into per-cast sub-seeds keyed by the question and a
//! nonce. Sub-seeds are derived via BLAKE3, so the same master seed, question,
//! and nonce always reproduce the same casting.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct CastSeeder {
    master_seed: u64,
}

impl CastSeeder {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a (question, nonce) pair.
    ///
    /// Surrounding whitespace in the question is ignored.
    pub fn sub_seed(&self, question: &str, nonce: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(question.trim().as_bytes());
        hasher.update(&nonce.to_le_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    pub fn rng_for(&self, question: &str, nonce: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(question, nonce))
    }
}

/// OS-seeded generator for unseeded castings.
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}
