//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! Every variate generator owns one of these streams; nothing in the
//! simulator draws randomness from anywhere else.

mod xorshift;

pub use xorshift::{derive_seed, RngManager};
