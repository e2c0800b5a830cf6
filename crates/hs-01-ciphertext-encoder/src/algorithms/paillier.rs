//! # Paillier Encryption
//!
//! `E(m) = g^m * r^n mod n^2`, `r` drawn uniformly from `Z*_n` on every
//! call. Two encryptions of the same plaintext differ with overwhelming
//! probability yet decrypt to the same value.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::encoding::encode_ciphertext_hex;
use crate::domain::{CiphertextHex, EncodingError, PublicKey};

/// Encrypt `m` under `key` using randomness from `rng`.
///
/// Fails with `PlaintextOutOfRange` when `m >= n`.
pub fn encrypt_with_rng<R: Rng + ?Sized>(
    key: &PublicKey,
    m: &BigUint,
    rng: &mut R,
) -> Result<BigUint, EncodingError> {
    if m >= key.n() {
        return Err(EncodingError::PlaintextOutOfRange {
            value: m.to_string(),
            modulus_bits: key.bits(),
        });
    }

    let r = sample_unit(key.n(), rng);
    let nn = key.n_squared();
    let gm = key.g().modpow(m, nn);
    let rn = r.modpow(key.n(), nn);
    Ok((gm * rn) % nn)
}

/// Encrypt a plaintext integer and encode it canonically, using `rng`.
pub fn encode_with_rng<R: Rng + ?Sized>(
    value: i64,
    key: &PublicKey,
    rng: &mut R,
) -> Result<CiphertextHex, EncodingError> {
    if value < 0 {
        return Err(EncodingError::NegativePlaintext(value));
    }
    let m = BigUint::from(value as u64);
    let c = encrypt_with_rng(key, &m, rng)?;
    Ok(encode_ciphertext_hex(&c))
}

/// Encrypt a plaintext integer with thread-local randomness.
pub fn encode(value: i64, key: &PublicKey) -> Result<CiphertextHex, EncodingError> {
    encode_with_rng(value, key, &mut rand::thread_rng())
}

/// Sample `r` uniformly from `[1, n)` with `gcd(r, n) = 1`.
fn sample_unit<R: Rng + ?Sized>(n: &BigUint, rng: &mut R) -> BigUint {
    let one = BigUint::one();
    loop {
        let r = rng.gen_biguint_range(&one, n);
        if r.gcd(n).is_one() {
            return r;
        }
    }
}
