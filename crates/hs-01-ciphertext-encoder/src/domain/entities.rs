//! # Domain Entities
//!
//! Ciphertext values and the four-field encrypted record written to the
//! ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::EncodingError;

/// A ciphertext in canonical form: `0x` followed by an even number of
/// lowercase hex digits, big-endian.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CiphertextHex {
    hex: String,
    bytes: Vec<u8>,
}

impl CiphertextHex {
    /// Wrap big-endian ciphertext bytes (e.g. as read back from the ledger).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            hex: format!("0x{}", hex::encode(bytes)),
            bytes: bytes.to_vec(),
        }
    }

    /// Parse a `0x`-prefixed, even-length hex string.
    pub fn parse(s: &str) -> Result<Self, EncodingError> {
        let raw = s
            .strip_prefix("0x")
            .ok_or_else(|| EncodingError::InvalidCiphertext("missing 0x prefix".into()))?;
        if raw.is_empty() || raw.len() % 2 != 0 {
            return Err(EncodingError::InvalidCiphertext(format!(
                "expected an even, non-zero number of hex digits, got {}",
                raw.len()
            )));
        }
        let bytes =
            hex::decode(raw).map_err(|e| EncodingError::InvalidCiphertext(e.to_string()))?;
        Ok(Self {
            hex: format!("0x{}", raw.to_ascii_lowercase()),
            bytes,
        })
    }

    /// Canonical hex string.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Big-endian bytes, as passed to the ledger's `bytes` parameters.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of hex digits after the prefix.
    pub fn digit_len(&self) -> usize {
        self.hex.len() - 2
    }
}

impl TryFrom<String> for CiphertextHex {
    type Error = EncodingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CiphertextHex> for String {
    fn from(c: CiphertextHex) -> Self {
        c.hex
    }
}

impl fmt::Display for CiphertextHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl fmt::Debug for CiphertextHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Ciphertexts are long; the length is what matters in logs.
        write!(f, "CiphertextHex({} digits)", self.digit_len())
    }
}

/// The four plaintext integers of one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordPlaintext {
    /// Heart rate in BPM.
    pub heart_rate: i64,
    /// Systolic blood pressure in mmHg.
    pub blood_pressure: i64,
    /// Oxygen saturation in percent.
    pub oxygen_level: i64,
    /// Risk level returned by the scorer.
    pub risk_level: i64,
}

/// Four independently encrypted ciphertexts, one per submitted value.
///
/// Built once per submission attempt, atomically: either all four fields are
/// populated or no record exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    heart_rate: CiphertextHex,
    blood_pressure: CiphertextHex,
    oxygen_level: CiphertextHex,
    risk_level: CiphertextHex,
}

impl EncryptedRecord {
    /// Assemble a record from four ciphertexts.
    pub fn from_parts(
        heart_rate: CiphertextHex,
        blood_pressure: CiphertextHex,
        oxygen_level: CiphertextHex,
        risk_level: CiphertextHex,
    ) -> Self {
        Self {
            heart_rate,
            blood_pressure,
            oxygen_level,
            risk_level,
        }
    }

    /// Encrypted heart rate.
    pub fn heart_rate(&self) -> &CiphertextHex {
        &self.heart_rate
    }

    /// Encrypted blood pressure.
    pub fn blood_pressure(&self) -> &CiphertextHex {
        &self.blood_pressure
    }

    /// Encrypted oxygen level.
    pub fn oxygen_level(&self) -> &CiphertextHex {
        &self.oxygen_level
    }

    /// Encrypted risk level.
    pub fn risk_level(&self) -> &CiphertextHex {
        &self.risk_level
    }

    /// Fields in contract argument order.
    pub fn fields(&self) -> [&CiphertextHex; 4] {
        [
            &self.heart_rate,
            &self.blood_pressure,
            &self.oxygen_level,
            &self.risk_level,
        ]
    }
}
