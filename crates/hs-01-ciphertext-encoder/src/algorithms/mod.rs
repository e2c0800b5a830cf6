//! # Algorithms Module
//!
//! Paillier encryption, canonical hex encoding and record sealing.

pub mod encoding;
pub mod paillier;
pub mod record;

pub use encoding::encode_ciphertext_hex;
pub use paillier::{encode, encode_with_rng, encrypt_with_rng};
pub use record::{seal_record, seal_record_with_rng};
