//! # Error Types
//!
//! Parse failures for the shared primitives.

use thiserror::Error;

/// Errors raised while parsing a primitive from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Input was not valid hexadecimal.
    #[error("Invalid hex for {kind}: {input}")]
    InvalidHex {
        /// Primitive being parsed.
        kind: &'static str,
        /// Offending input.
        input: String,
    },

    /// Decoded byte length did not match the fixed width.
    #[error("Invalid length for {kind}: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Primitive being parsed.
        kind: &'static str,
        /// Required width in bytes.
        expected: usize,
        /// Decoded width in bytes.
        got: usize,
    },

    /// Input was not a valid decimal or hex quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Decimal amount had more fractional digits than the unit allows.
    #[error("Too many decimal places in {input} (max {max})")]
    TooPrecise {
        /// Offending input.
        input: String,
        /// Maximum fractional digits.
        max: u32,
    },

    /// Amount does not fit in 256 bits.
    #[error("Amount overflows U256: {0}")]
    Overflow(String),
}
