//! # Paillier Public Key
//!
//! Loaded once at startup from configuration and never mutated. The matching
//! private key belongs to a separate party and has no representation here.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::fmt;

use super::errors::EncodingError;

/// Paillier public key `(n, g)` with `n^2` precomputed.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    n: BigUint,
    g: BigUint,
    n_squared: BigUint,
}

impl PublicKey {
    /// Build a key from its modulus and generator.
    ///
    /// Rejects `n <= 1`, `g` outside `(0, n^2)` and generators sharing a
    /// factor with `n` (no ciphertext could be decrypted under such a key).
    pub fn new(n: BigUint, g: BigUint) -> Result<Self, EncodingError> {
        if n <= BigUint::one() {
            return Err(EncodingError::InvalidKey("modulus must exceed 1".into()));
        }
        let n_squared = &n * &n;
        if g.is_zero() || g >= n_squared {
            return Err(EncodingError::InvalidKey(
                "generator must lie in (0, n^2)".into(),
            ));
        }
        if !g.gcd(&n).is_one() {
            return Err(EncodingError::InvalidKey(
                "generator shares a factor with the modulus".into(),
            ));
        }
        Ok(Self { n, g, n_squared })
    }

    /// Parse hex-encoded `n` and `g`, with or without a `0x` prefix.
    pub fn from_hex(n_hex: &str, g_hex: &str) -> Result<Self, EncodingError> {
        let n = parse_hex_biguint("modulus", n_hex)?;
        let g = parse_hex_biguint("generator", g_hex)?;
        Self::new(n, g)
    }

    /// Key with the conventional generator `g = n + 1`.
    pub fn with_standard_generator(n: BigUint) -> Result<Self, EncodingError> {
        let g = &n + BigUint::one();
        Self::new(n, g)
    }

    /// Modulus `n`.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// `n^2`, the ciphertext modulus.
    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("modulus_bits", &self.bits())
            .finish()
    }
}

fn parse_hex_biguint(what: &str, s: &str) -> Result<BigUint, EncodingError> {
    let t = s.trim();
    let raw = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .unwrap_or(t);
    if raw.is_empty() {
        return Err(EncodingError::InvalidKey(format!("{} is empty", what)));
    }
    BigUint::parse_bytes(raw.as_bytes(), 16)
        .ok_or_else(|| EncodingError::InvalidKey(format!("{} is not valid hex", what)))
}
