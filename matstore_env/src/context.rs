//! Core environment context trait for matstore sessions.

use rand::RngCore;

/// The source of randomness for a store session.
///
/// This trait abstracts where entropy comes from so that the same session
/// code runs both against OS entropy and against a fixed seed.
///
/// # Implementations
///
/// - **Production**: `OsContext` - `StdRng` seeded from the OS once
/// - **Reproducible**: `SeededContext` - `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// The generator is created when the context is created and is never
/// reseeded afterwards. Two `SeededContext`s with the same seed hand out
/// the same stream of values.
pub trait StoreContext {
    /// Returns the context's seed (for logging/debugging).
    ///
    /// Unseeded contexts return 0.
    fn seed(&self) -> u64;

    /// Returns the context's generator.
    ///
    /// `rand::Rng` is implemented for `dyn RngCore`, so callers can use
    /// `gen_range` and friends directly on the returned reference.
    fn rng(&mut self) -> &mut dyn RngCore;
}
