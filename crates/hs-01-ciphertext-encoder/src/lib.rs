//! # HS-01 Ciphertext Encoder
//!
//! Additively homomorphic (Paillier) encryption of plaintext integers into
//! the canonical hex form stored on the health ledger.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//!
//! ## Purpose
//!
//! Turn each of the four submitted integers (three vital signs and the risk
//! level) into an independently encrypted ciphertext under a process-wide
//! public key, so the ledger never observes plaintext values:
//! - `c = g^m * r^n mod n^2` with fresh `r` per call (probabilistic)
//! - big-endian hex, padded to an even digit count, `0x` prefixed
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Encrypt-only | No private key type exists outside tests |
//! | Fresh randomness | Every call samples a new unit `r` in `Z*_n` |
//! | Canonical hex | Even length, `0x` prefix |
//! | Atomic records | `EncryptedRecord` is built whole or not at all |
//!
//! ## Module Structure
//!
//! ```text
//! hs-01-ciphertext-encoder/
//! ├── domain/          # PublicKey, CiphertextHex, EncryptedRecord, errors
//! └── algorithms/      # Paillier encryption, hex encoding
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;


// Re-exports
pub use algorithms::{
    encode, encode_ciphertext_hex, encode_with_rng, encrypt_with_rng, seal_record,
    seal_record_with_rng,
};
pub use domain::{CiphertextHex, EncodingError, EncryptedRecord, PublicKey, RecordPlaintext};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
