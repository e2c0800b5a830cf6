//! # Domain Module
//!
//! Core domain types for the Ciphertext Encoder.

pub mod entities;
pub mod errors;
pub mod public_key;

pub use entities::*;
pub use errors::*;
pub use public_key::PublicKey;
