//! matstore Environment Abstraction Layer
//!
//! The matrix engine never reaches for a global random generator. Instead
//! every caller that needs entropy holds a [`StoreContext`], seeded exactly
//! once when the context is built:
//!
//! - **Production**: [`OsContext`] - seeded from OS entropy, no
//!   reproducibility across runs
//! - **Reproducible**: [`SeededContext`] - all entropy derived from a single
//!   64-bit seed, so a randomized session can be replayed by its seed number
//!
//! # Example
//!
//! ```ignore
//! use matstore_env::{SeededContext, StoreContext};
//! use rand::Rng;
//!
//! let mut ctx = SeededContext::new(42);
//! let value: u32 = ctx.rng().gen_range(1..=6);
//! ```

mod context;
mod os_impl;
mod seeded;

pub use context::StoreContext;
pub use os_impl::OsContext;
pub use seeded::SeededContext;

/// Builds the context matching a configured seed.
///
/// A seed of `0` means "not seeded" and yields an [`OsContext`].
pub fn context_for_seed(seed: u64) -> Box<dyn StoreContext> {
    if seed == 0 {
        Box::new(OsContext::new())
    } else {
        Box::new(SeededContext::new(seed))
    }
}
