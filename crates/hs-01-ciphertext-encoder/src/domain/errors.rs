//! # Domain Errors
//!
//! Encoding failures. All of them indicate a contract violation upstream
//! (bad input data or a bad key) and are never retried.

use thiserror::Error;

/// Ciphertext encoding error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Plaintext was negative.
    #[error("Negative plaintext: {0}")]
    NegativePlaintext(i64),

    /// Plaintext does not fit the key's message space `[0, n)`.
    #[error("Plaintext {value} exceeds the key's plaintext space ({modulus_bits}-bit modulus)")]
    PlaintextOutOfRange {
        /// Offending plaintext.
        value: String,
        /// Bit length of the modulus.
        modulus_bits: u64,
    },

    /// Public key material is unusable.
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    /// Ciphertext hex could not be decoded.
    #[error("Invalid ciphertext hex: {0}")]
    InvalidCiphertext(String),
}
