//! Compact public identifiers for recipes.
//!
//! Codes are drawn from [`ALPHABET`] with a fixed [`CODE_LENGTH`]; the store's
//! unique index on `recipes.short_code` is the final arbiter of uniqueness and
//! callers retry with a fresh candidate on collision.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const CODE_LENGTH: usize = 6;
/// How many candidates are tried before giving up on a single recipe.
pub const MAX_ATTEMPTS: usize = 10;

/// Source of short code candidates.
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> String;
}

/// Random code source backed by a seedable generator.
pub struct ShortCodeGenerator {
    rng: Mutex<StdRng>,
}

impl ShortCodeGenerator {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator for tests and reproducible seeding.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl CodeSource for ShortCodeGenerator {
    fn next_code(&self) -> String {
        // A poisoned lock only means another thread panicked mid-draw; the rng
        // state is still usable.
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Whether `code` has the shape of a generated short code.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|byte| ALPHABET.contains(&byte))
}
