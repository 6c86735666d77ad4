use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws in `[0, 1)` for the generator. Injectable so tests can script outcomes.
pub trait RandomSource {
    fn unit(&mut self) -> f64;
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Seeded when a seed is configured, entropy otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}
