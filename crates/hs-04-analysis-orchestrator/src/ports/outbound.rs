//! # Outbound Ports
//!
//! Traits for the remote risk scorer and the ledger contract.

use async_trait::async_trait;
use hs_01_ciphertext_encoder::EncryptedRecord;
use parking_lot::Mutex;
use shared_types::{Address, TxHash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{
    LedgerConfirmation, LedgerError, RiskAssessment, ScoreRequest, ScoringError,
    StoredHealthRecord,
};

/// Remote risk scorer - outbound port.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    /// Score three validated vital signs.
    async fn score(&self, request: ScoreRequest) -> Result<RiskAssessment, ScoringError>;
}

/// Ledger contract - outbound port.
///
/// `submit_health_metrics` returns once the transaction is broadcast;
/// `await_confirmation` waits for it to be mined. Callers bound the wait.
#[async_trait]
pub trait HealthLedger: Send + Sync {
    /// `submitHealthMetrics(bytes,bytes,bytes,bytes)` sent from `from`.
    async fn submit_health_metrics(
        &self,
        from: Address,
        record: &EncryptedRecord,
    ) -> Result<TxHash, LedgerError>;

    /// Wait until `tx_hash` is mined. A failing status is `Reverted`.
    async fn await_confirmation(&self, tx_hash: TxHash)
        -> Result<LedgerConfirmation, LedgerError>;

    /// `userHealthRecords(address,uint256)`.
    async fn user_health_record(
        &self,
        account: Address,
        index: u64,
    ) -> Result<StoredHealthRecord, LedgerError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock scorer for testing.
pub struct MockRiskScorer {
    response: Mutex<Result<RiskAssessment, ScoringError>>,
    /// Delay before answering.
    pub latency: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ScoreRequest>>,
}

impl MockRiskScorer {
    /// Scorer answering `{risk_level, risk_category}`.
    pub fn returning(risk_level: i64, risk_category: &str) -> Self {
        Self::with_response(Ok(RiskAssessment {
            risk_level,
            risk_category: risk_category.to_string(),
        }))
    }

    /// Scorer failing with `err`.
    pub fn failing(err: ScoringError) -> Self {
        Self::with_response(Err(err))
    }

    fn with_response(response: Result<RiskAssessment, ScoringError>) -> Self {
        Self {
            response: Mutex::new(response),
            latency: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer after `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `score` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<ScoreRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl RiskScorer for MockRiskScorer {
    async fn score(&self, request: ScoreRequest) -> Result<RiskAssessment, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.response.lock().clone()
    }
}

/// Mock ledger for testing.
///
/// Stores submitted records per account and confirms immediately unless told
/// to revert, hang, reject or lose the reply.
#[derive(Default)]
pub struct MockHealthLedger {
    /// Refuse every write before broadcast.
    pub reject_submit: bool,
    /// Lose the reply to every write (outcome unknown).
    pub lose_reply: bool,
    /// Mine every write with a failing status.
    pub revert: bool,
    /// Never confirm.
    pub never_confirm: bool,
    records: Mutex<HashMap<Address, Vec<EncryptedRecord>>>,
    pending: Mutex<HashMap<TxHash, (Address, u64)>>,
    submissions: Mutex<Vec<EncryptedRecord>>,
    submit_calls: AtomicUsize,
}

impl MockHealthLedger {
    /// Ledger refusing every write before broadcast.
    pub fn rejecting() -> Self {
        Self {
            reject_submit: true,
            ..Self::default()
        }
    }

    /// Ledger whose reply to every write is lost.
    pub fn losing_reply() -> Self {
        Self {
            lose_reply: true,
            ..Self::default()
        }
    }

    /// Ledger mining every write with a failing status.
    pub fn reverting() -> Self {
        Self {
            revert: true,
            ..Self::default()
        }
    }

    /// Ledger that accepts writes and never confirms them.
    pub fn never_confirming() -> Self {
        Self {
            never_confirm: true,
            ..Self::default()
        }
    }

    /// Number of `submit_health_metrics` calls.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Every record passed to `submit_health_metrics`, in order.
    pub fn submissions(&self) -> Vec<EncryptedRecord> {
        self.submissions.lock().clone()
    }
}

#[async_trait]
impl HealthLedger for MockHealthLedger {
    async fn submit_health_metrics(
        &self,
        from: Address,
        record: &EncryptedRecord,
    ) -> Result<TxHash, LedgerError> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_submit {
            return Err(LedgerError::Rejected("User denied transaction signature".into()));
        }
        self.submissions.lock().push(record.clone());
        if self.lose_reply {
            return Err(LedgerError::Unknown("wallet reply timed out".into()));
        }

        let mut records = self.records.lock();
        let list = records.entry(from).or_default();
        let index = list.len() as u64;
        list.push(record.clone());

        let mut hash = [0u8; 32];
        hash[0] = 0xAB;
        hash[24..].copy_from_slice(&(n as u64 + 1).to_be_bytes());
        let tx_hash = TxHash(hash);
        self.pending.lock().insert(tx_hash, (from, index));
        Ok(tx_hash)
    }

    async fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> Result<LedgerConfirmation, LedgerError> {
        if self.never_confirm {
            std::future::pending::<()>().await;
        }
        if self.revert {
            return Err(LedgerError::Reverted { tx_hash });
        }
        let (_, index) = self
            .pending
            .lock()
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| LedgerError::NotFound(tx_hash.to_hex()))?;
        Ok(LedgerConfirmation {
            tx_hash,
            block_number: Some(1),
            record_index: Some(index),
        })
    }

    async fn user_health_record(
        &self,
        account: Address,
        index: u64,
    ) -> Result<StoredHealthRecord, LedgerError> {
        let records = self.records.lock();
        let record = records
            .get(&account)
            .and_then(|list| list.get(index as usize))
            .ok_or_else(|| LedgerError::NotFound(format!("{} #{}", account, index)))?;
        Ok(StoredHealthRecord {
            heart_rate: record.heart_rate().clone(),
            blood_pressure: record.blood_pressure().clone(),
            oxygen_level: record.oxygen_level().clone(),
            risk_level: record.risk_level().clone(),
            user: account,
        })
    }
}
