//! Deterministic random source threaded through every generation call.

use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Seeded pseudo-random source.
///
/// Two sources built from the same seed produce the same outputs for the same
/// sequence of calls. Cloning captures the current state: the clone replays the
/// original's future output without either one perturbing the other.
#[derive(Debug, Clone)]
pub struct Random {
    seed: u64,
    inner: StdRng,
}

impl Random {
    /// Create a source from an explicit seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source from a freshly drawn seed
    ///
    /// The seed is still recorded so a failing session can be replayed.
    pub fn fresh() -> Self {
        Self::from_seed(fresh_seed())
    }

    /// The seed this source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[min, max]`, both ends inclusive
    ///
    /// Bounds given in the wrong order are swapped rather than rejected.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        self.gen_in(min, max)
    }

    /// Uniform draw in `[min, max]` for any type `rand` can sample uniformly
    pub fn gen_in<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        if max < min {
            self.inner.gen_range(max..=min)
        } else {
            self.inner.gen_range(min..=max)
        }
    }

    /// Draw a boolean with probability one half
    pub fn next_bool(&mut self) -> bool {
        self.inner.next_u32() & 1 == 1
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Draw a new session seed from the thread-local entropy source
pub fn fresh_seed() -> u64 {
    rand::thread_rng().next_u64()
}
