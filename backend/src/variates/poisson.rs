//! Poisson variate via the acceptance-rejection product test

use super::{require_positive_rate, seeded_stream, VariateError, VariateGenerator};
use crate::rng::RngManager;

/// Largest accepted rate. Beyond this `e^-rate` underflows toward zero and
/// the product test would never terminate.
pub const MAX_POISSON_RATE: f64 = 700.0;

/// Poisson distribution: number of events in one unit of time at `rate`
///
/// The expected number of uniform draws per variate is `rate + 1`.
#[derive(Debug, Clone)]
pub struct PoissonVariate {
    rng: RngManager,
    rate: f64,
    threshold: f64,
}

impl PoissonVariate {
    pub fn new(rate: f64) -> Result<Self, VariateError> {
        let rate = Self::validate(rate)?;
        Ok(Self {
            rng: seeded_stream(None),
            rate,
            threshold: (-rate).exp(),
        })
    }

    pub fn with_seed(rate: f64, seed: u64) -> Result<Self, VariateError> {
        let mut variate = Self::new(rate)?;
        variate.set_seed(seed);
        Ok(variate)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<(), VariateError> {
        self.rate = Self::validate(rate)?;
        self.threshold = (-self.rate).exp();
        Ok(())
    }

    /// Draw the next count
    ///
    /// Multiplies uniforms into a running product until it drops below
    /// `e^-rate`; the number of multiplications before that is the count.
    pub fn next_count(&mut self) -> u64 {
        let mut count = 0u64;
        let mut product = 1.0;
        loop {
            product *= self.rng.next_f64();
            if product < self.threshold {
                return count;
            }
            count += 1;
        }
    }

    fn validate(rate: f64) -> Result<f64, VariateError> {
        let rate = require_positive_rate("poisson", rate)?;
        if rate > MAX_POISSON_RATE {
            return Err(VariateError::invalid(
                "poisson",
                format!("rate {} exceeds maximum {}", rate, MAX_POISSON_RATE),
            ));
        }
        Ok(rate)
    }
}

impl VariateGenerator for PoissonVariate {
    fn next_variate(&mut self) -> f64 {
        self.next_count() as f64
    }

    fn set_seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    fn distribution(&self) -> &'static str {
        "poisson"
    }
}
