//! # Domain Entities
//!
//! Attempt-scoped values: the scorer exchange, the ledger confirmation and
//! the receipt.

use hs_01_ciphertext_encoder::CiphertextHex;
use hs_02_vital_validation::VitalSigns;
use serde::{Deserialize, Serialize};
use shared_types::{Address, TxHash};
use std::fmt;

/// Scorer request body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Heart rate in BPM.
    pub heart_rate: u32,
    /// Systolic blood pressure in mmHg.
    pub blood_pressure: u32,
    /// Oxygen saturation in percent.
    pub oxygen_level: u32,
}

impl From<&VitalSigns> for ScoreRequest {
    fn from(vitals: &VitalSigns) -> Self {
        Self {
            heart_rate: vitals.heart_rate(),
            blood_pressure: vitals.blood_pressure(),
            oxygen_level: vitals.oxygen_level(),
        }
    }
}

/// Risk returned by the scorer. Immutable once returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Numeric risk level.
    pub risk_level: i64,
    /// Human-readable category.
    pub risk_category: String,
}

impl RiskAssessment {
    /// `"Risk Category: Low (Level 1)"`.
    pub fn summary(&self) -> String {
        format!(
            "Risk Category: {} (Level {})",
            self.risk_category, self.risk_level
        )
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// A mined, successful ledger write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfirmation {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was mined in.
    pub block_number: Option<u64>,
    /// Index of the new record, from the `MetricsSubmitted` event.
    pub record_index: Option<u64>,
}

/// A record as read back from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHealthRecord {
    /// Encrypted heart rate.
    pub heart_rate: CiphertextHex,
    /// Encrypted blood pressure.
    pub blood_pressure: CiphertextHex,
    /// Encrypted oxygen level.
    pub oxygen_level: CiphertextHex,
    /// Encrypted risk level.
    pub risk_level: CiphertextHex,
    /// Submitting account.
    pub user: Address,
}

/// Outcome of a confirmed submission. One per successful attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Confirmed transaction.
    pub tx_hash: TxHash,
    /// New record index, when the event was decoded.
    pub record_index: Option<u64>,
    /// The score that was recorded.
    pub assessment: RiskAssessment,
}
