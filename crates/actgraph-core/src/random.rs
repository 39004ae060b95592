//! Randomness supply for repair and successor selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random values the engines consume.
pub trait RandomSource {
    /// Lazy stream of `count` independent probabilities in `[0, 1)`.
    fn probability_stream(&mut self, count: usize) -> Box<dyn Iterator<Item = f64> + '_>;

    /// Uniform index in `[0, max_exclusive)`. Returns 0 when `max_exclusive`
    /// is 0.
    fn uniform_index(&mut self, max_exclusive: usize) -> usize;
}

/// [`RandomSource`] backed by any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Reproducible source seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RngSource<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn probability_stream(&mut self, count: usize) -> Box<dyn Iterator<Item = f64> + '_> {
        let rng = &mut self.rng;
        Box::new((0..count).map(move |_| rng.gen_range(0.0..1.0)))
    }

    fn uniform_index(&mut self, max_exclusive: usize) -> usize {
        if max_exclusive == 0 {
            return 0;
        }
        self.rng.gen_range(0..max_exclusive)
    }
}
