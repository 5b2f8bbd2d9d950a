//! Host-injected randomness seam.
//!
//! The engine never seeds or selects its own generator: activation sampling
//! draws through [`RandomSource`], which the host supplies. Determinism is
//! therefore entirely a function of the injected source. The default
//! [`ChaChaSource`] gives reproducible runs from an explicit seed.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Uniform integer source supplied by the embedding host.
///
/// `Send` so that engine instances holding a boxed source can migrate
/// across threads (the ffi handle table requires it).
pub trait RandomSource: Send {
    /// Uniform random integer in `[min, max]`, both ends inclusive.
    ///
    /// A degenerate range (`min >= max`) returns `min`.
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

/// Closures are sources, which lets tests script exact draw sequences.
impl<F> RandomSource for F
where
    F: FnMut(i32, i32) -> i32 + Send,
{
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        self(min, max)
    }
}

/// Default source backed by a seeded ChaCha8 stream cipher generator.
#[derive(Clone, Debug)]
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// Create a source from an explicit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for ChaChaSource {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl RandomSource for ChaChaSource {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}
