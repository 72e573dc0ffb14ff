//! Seeded context for reproducible sessions and tests.

use crate::StoreContext;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Context backed by a seeded ChaCha8 RNG.
///
/// Same seed, same sequence of draws, regardless of platform.
pub struct SeededContext {
    /// Master seed for this context
    seed: u64,

    /// Deterministic RNG
    rng: ChaCha8Rng,
}

impl SeededContext {
    /// Creates a new SeededContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl StoreContext for SeededContext {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}
