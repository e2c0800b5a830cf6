//! # Record Sealing
//!
//! Exactly four encryption calls per record, each with independent
//! randomness. Any failure aborts the whole record.

use rand::Rng;
use tracing::debug;

use super::paillier::encode_with_rng;
use crate::domain::{EncodingError, EncryptedRecord, PublicKey, RecordPlaintext};

/// Seal a record with thread-local randomness.
pub fn seal_record(
    key: &PublicKey,
    plaintext: &RecordPlaintext,
) -> Result<EncryptedRecord, EncodingError> {
    seal_record_with_rng(key, plaintext, &mut rand::thread_rng())
}

/// Seal a record using `rng` for all four encryptions.
pub fn seal_record_with_rng<R: Rng + ?Sized>(
    key: &PublicKey,
    plaintext: &RecordPlaintext,
    rng: &mut R,
) -> Result<EncryptedRecord, EncodingError> {
    let heart_rate = encode_with_rng(plaintext.heart_rate, key, rng)?;
    let blood_pressure = encode_with_rng(plaintext.blood_pressure, key, rng)?;
    let oxygen_level = encode_with_rng(plaintext.oxygen_level, key, rng)?;
    let risk_level = encode_with_rng(plaintext.risk_level, key, rng)?;

    debug!(
        "[hs-01] Sealed record under {}-bit key ({} hex digits per field max)",
        key.bits(),
        [&heart_rate, &blood_pressure, &oxygen_level, &risk_level]
            .iter()
            .map(|c| c.digit_len())
            .max()
            .unwrap_or(0)
    );

    Ok(EncryptedRecord::from_parts(
        heart_rate,
        blood_pressure,
        oxygen_level,
        risk_level,
    ))
}
