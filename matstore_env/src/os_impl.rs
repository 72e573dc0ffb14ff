//! Production implementation of StoreContext using OS entropy.

use crate::StoreContext;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Production context backed by OS entropy.
///
/// The generator is seeded once from the operating system when the
/// context is built; results are not reproducible across runs.
pub struct OsContext {
    rng: StdRng,
}

impl OsContext {
    /// Creates a new OsContext.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for OsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreContext for OsContext {
    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}
