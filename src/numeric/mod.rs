// ============================================================================
// Numeric Module
// Fixed-precision decimal arithmetic for price statistics
// ============================================================================
//
// This module provides:
// - MathContext: significant-digit precision with round-half-up
// - sqrt: the one floating-point step in the statistics pipeline
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - Exact decimal arithmetic everywhere except the square root
// - All arithmetic returns Result (no panics)

mod context;
mod errors;

pub use context::{sqrt, MathContext};
pub use errors::{NumericError, NumericResult};
