// ============================================================================
// Numeric Module
// Exact rational arithmetic for dimension exponents
// ============================================================================
//
// This module provides:
// - Rational: normalized fraction used for dimension and unit exponents
// - NumericError: Error types for rational arithmetic
//
// Design principles:
// - Exponents are exact (1/2 stays 1/2, never 0.5000000001)
// - Checked arithmetic returns Result; operator impls are for ergonomics
// - Always normalized: gcd(num, den) == 1 and den > 0

mod errors;
mod rational;

pub use errors::{NumericError, NumericResult};
pub use rational::Rational;
