//! Random variate generators
//!
//! Each generator owns its own [`RngManager`] stream plus distribution
//! parameters, and transforms the stream's standard uniform primitive into
//! draws from its distribution:
//!
//! - **Uniform**: linear inverse transform onto `[min, max)`
//! - **Exponential**: inverse transform `-ln(1 - U) / rate`
//! - **Poisson**: acceptance-rejection product test
//! - **Gamma**: Marsaglia–Tsang rejection sampling with a Gaussian proposal
//!
//! Parameters are validated at construction; out-of-domain values produce
//! [`VariateError::InvalidParameter`].
//!
//! # Example
//!
//! ```
//! use telco_simulator_core_rs::variates::{ExponentialVariate, VariateGenerator};
//!
//! let mut service = ExponentialVariate::new(0.5).unwrap();
//! service.set_seed(543210);
//! assert!(service.next_variate() >= 0.0);
//! ```

mod exponential;
mod gamma;
mod poisson;
mod uniform;

pub use exponential::ExponentialVariate;
pub use gamma::{GammaVariate, DEFAULT_SCALE, DEFAULT_SHAPE};
pub use poisson::{PoissonVariate, MAX_POISSON_RATE};
pub use uniform::UniformVariate;

use crate::rng::RngManager;
use thiserror::Error;

/// Seed used when a generator is built without an explicit seed
pub(crate) const DEFAULT_SEED: u64 = 0x5DEECE66D;

/// Errors raised while configuring a variate generator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VariateError {
    #[error("Invalid {distribution} parameter: {reason}")]
    InvalidParameter {
        distribution: &'static str,
        reason: String,
    },
}

impl VariateError {
    pub(crate) fn invalid(distribution: &'static str, reason: impl Into<String>) -> Self {
        VariateError::InvalidParameter {
            distribution,
            reason: reason.into(),
        }
    }
}

/// A stateful sampler for one probability distribution
///
/// Every call to `next_variate` advances the generator's private stream.
/// `set_seed` resets that stream so the same sequence replays.
pub trait VariateGenerator: std::fmt::Debug {
    /// Draw the next value from the distribution
    fn next_variate(&mut self) -> f64;

    /// Reset the underlying stream deterministically
    fn set_seed(&mut self, seed: u64);

    /// Short distribution name for logs and reports
    fn distribution(&self) -> &'static str;
}

/// Degenerate distribution that always returns the same value
///
/// Used for fixed service times.
#[derive(Debug, Clone)]
pub struct ConstantVariate {
    value: f64,
}

impl ConstantVariate {
    pub fn new(value: f64) -> Result<Self, VariateError> {
        if !value.is_finite() || value < 0.0 {
            return Err(VariateError::invalid(
                "constant",
                format!("value must be finite and non-negative, got {}", value),
            ));
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl VariateGenerator for ConstantVariate {
    fn next_variate(&mut self) -> f64 {
        self.value
    }

    fn set_seed(&mut self, _seed: u64) {}

    fn distribution(&self) -> &'static str {
        "constant"
    }
}

pub(crate) fn require_positive_rate(
    distribution: &'static str,
    rate: f64,
) -> Result<f64, VariateError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(VariateError::invalid(
            distribution,
            format!("rate must be finite and positive, got {}", rate),
        ));
    }
    Ok(rate)
}

pub(crate) fn seeded_stream(seed: Option<u64>) -> RngManager {
    RngManager::new(seed.unwrap_or(DEFAULT_SEED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_returns_value() {
        let mut constant = ConstantVariate::new(2.0).unwrap();
        for _ in 0..10 {
            assert_eq!(constant.next_variate(), 2.0);
        }
    }

    #[test]
    fn test_constant_rejects_negative() {
        assert!(matches!(
            ConstantVariate::new(-1.0),
            Err(VariateError::InvalidParameter { distribution: "constant", .. })
        ));
    }

    #[test]
    fn test_error_message_names_distribution() {
        let err = require_positive_rate("poisson", 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid poisson parameter: rate must be finite and positive, got 0"
        );
    }
}
