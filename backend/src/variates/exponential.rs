//! Exponential variate via the inverse-transform method

use super::{require_positive_rate, seeded_stream, VariateError, VariateGenerator};
use crate::rng::RngManager;

/// Exponential distribution with the given rate (mean `1 / rate`)
#[derive(Debug, Clone)]
pub struct ExponentialVariate {
    rng: RngManager,
    rate: f64,
}

impl ExponentialVariate {
    pub fn new(rate: f64) -> Result<Self, VariateError> {
        Ok(Self {
            rng: seeded_stream(None),
            rate: require_positive_rate("exponential", rate)?,
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

    /// Reconfigure the rate; the stream position is kept
    pub fn set_rate(&mut self, rate: f64) -> Result<(), VariateError> {
        self.rate = require_positive_rate("exponential", rate)?;
        Ok(())
    }
}

impl VariateGenerator for ExponentialVariate {
    fn next_variate(&mut self) -> f64 {
        let u = self.rng.next_f64();
        // 1 - u lies in (0, 1], so the log is finite and non-positive
        -(1.0 - u).ln() / self.rate
    }

    fn set_seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    fn distribution(&self) -> &'static str {
        "exponential"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_rate() {
        assert!(ExponentialVariate::new(0.0).is_err());
        assert!(ExponentialVariate::new(-2.0).is_err());
        assert!(ExponentialVariate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_set_rate_validates() {
        let mut exp = ExponentialVariate::new(1.0).unwrap();
        assert!(exp.set_rate(0.0).is_err());
        assert_eq!(exp.rate(), 1.0);
        exp.set_rate(4.0).unwrap();
        assert_eq!(exp.rate(), 4.0);
    }

    #[test]
    fn test_mean_matches_rate() {
        let mut exp = ExponentialVariate::with_seed(0.5, 77).unwrap();
        let n = 20_000;
        let mean = (0..n).map(|_| exp.next_variate()).sum::<f64>() / n as f64;
        assert!((mean - 2.0).abs() < 0.1, "mean {} not near 2.0", mean);
    }

    #[test]
    fn test_rate_change_scales_draws() {
        let mut slow = ExponentialVariate::with_seed(1.0, 5).unwrap();
        let mut fast = ExponentialVariate::with_seed(1.0, 5).unwrap();
        fast.set_rate(2.0).unwrap();

        for _ in 0..20 {
            let a = slow.next_variate();
            let b = fast.next_variate();
            assert!((a - 2.0 * b).abs() < 1e-12);
        }
    }
}
