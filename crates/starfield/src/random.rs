//! Where all the randomness in the field comes from.
//!
//! Everything that needs a random number takes a `RandomSource` rather than reaching for a
//! global generator, so that tests can seed it, or script the exact numbers it produces.

use rand::SeedableRng as _;

/// Anything that can produce uniformly distributed numbers.
pub trait RandomSource {
    /// A number uniformly distributed in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// A number uniformly distributed between `min` and `max`. When they're equal this is always
    /// `min`.
    fn between(&mut self, min: f64, max: f64) -> f64 {
        min + self.unit() * (max - min)
    }
}

impl<R: rand::RngCore + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }
}

/// A general purpose generator. It's reproducible when given a seed, otherwise it's seeded from
/// the OS.
pub fn seeded(maybe_seed: Option<u64>) -> rand::rngs::StdRng {
    match maybe_seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    }
}

/// A source that replays a fixed list of numbers, for tests that need exact spawn points.
#[cfg(test)]
pub(crate) struct Scripted(std::collections::VecDeque<f64>);

#[cfg(test)]
impl Scripted {
    /// The numbers are returned in order. Each one should be in `[0, 1)`.
    pub fn new(numbers: &[f64]) -> Self {
        Self(numbers.iter().copied().collect())
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    #[expect(clippy::expect_used, reason = "Tests aren't so strict")]
    fn unit(&mut self) -> f64 {
        self.0.pop_front().expect("Scripted random source ran out of numbers")
    }
}
