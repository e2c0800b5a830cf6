//! # Canonical Hex Encoding
//!
//! Big-endian hex, left-padded with one zero nibble when the natural
//! representation has odd length, prefixed with `0x`.

use num_bigint::BigUint;

use crate::domain::CiphertextHex;

/// Encode a ciphertext integer in canonical form.
pub fn encode_ciphertext_hex(c: &BigUint) -> CiphertextHex {
    let mut digits = c.to_str_radix(16);
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    // to_bytes_be() is minimal, matching the padded digit string byte for byte
    let bytes = c.to_bytes_be();
    debug_assert_eq!(hex::encode(&bytes), digits);
    CiphertextHex::from_bytes(&bytes)
}
