//! Uniform variate on `[min, max)`

use super::{seeded_stream, VariateError, VariateGenerator};
use crate::rng::RngManager;

/// Uniform distribution over `[min, max)`
///
/// # Example
/// ```
/// use telco_simulator_core_rs::variates::{UniformVariate, VariateGenerator};
///
/// let mut u = UniformVariate::new(2.0, 5.0).unwrap();
/// let x = u.next_variate();
/// assert!(x >= 2.0 && x < 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct UniformVariate {
    rng: RngManager,
    min: f64,
    max: f64,
}

impl UniformVariate {
    /// Create a uniform generator; fails unless `min < max`
    pub fn new(min: f64, max: f64) -> Result<Self, VariateError> {
        Self::build(min, max, None)
    }

    /// Standard uniform on `[0, 1)` with an explicit seed
    pub fn standard(seed: u64) -> Self {
        Self {
            rng: RngManager::new(seed),
            min: 0.0,
            max: 1.0,
        }
    }

    pub fn with_seed(min: f64, max: f64, seed: u64) -> Result<Self, VariateError> {
        Self::build(min, max, Some(seed))
    }

    fn build(min: f64, max: f64, seed: Option<u64>) -> Result<Self, VariateError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(VariateError::invalid(
                "uniform",
                format!("bounds must be finite, got [{}, {})", min, max),
            ));
        }
        if min >= max {
            return Err(VariateError::invalid(
                "uniform",
                format!("minimum {} must be less than maximum {}", min, max),
            ));
        }
        Ok(Self {
            rng: seeded_stream(seed),
            min,
            max,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl VariateGenerator for UniformVariate {
    fn next_variate(&mut self) -> f64 {
        let u = self.rng.next_f64();
        let x = self.min + (self.max - self.min) * u;
        // rounding can land exactly on max
        if x >= self.max {
            self.min.max(next_below(self.max))
        } else {
            x
        }
    }

    fn set_seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    fn distribution(&self) -> &'static str {
        "uniform"
    }
}

/// Largest f64 strictly below a finite `x`
fn next_below(x: f64) -> f64 {
    if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f64::from_bits(1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}
