//! # Analysis Service
//!
//! One attempt at a time per session. Steps run strictly in order and the
//! first failure ends the attempt; nothing is retried here.

use async_trait::async_trait;
use hs_01_ciphertext_encoder::{seal_record, PublicKey, RecordPlaintext};
use hs_02_vital_validation::{validate, RawVitalSigns, Validation, VitalSigns};
use hs_03_wallet_session::{SessionReader, SessionSnapshot};
use shared_types::Address;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::domain::{
    LedgerError, RiskAssessment, ScoreRequest, StoredHealthRecord, SubmissionError,
    SubmissionReceipt,
};
use crate::ports::{AnalysisApi, HealthLedger, RiskScorer};

/// Releases the in-flight flag when the attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Analysis orchestrator.
pub struct AnalysisService {
    config: AnalysisConfig,
    public_key: Arc<PublicKey>,
    session: Arc<dyn SessionReader>,
    scorer: Arc<dyn RiskScorer>,
    ledger: Arc<dyn HealthLedger>,
    in_flight: AtomicBool,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(
        config: AnalysisConfig,
        public_key: Arc<PublicKey>,
        session: Arc<dyn SessionReader>,
        scorer: Arc<dyn RiskScorer>,
        ledger: Arc<dyn HealthLedger>,
    ) -> Self {
        Self {
            config,
            public_key,
            session,
            scorer,
            ledger,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Whether an attempt is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }

    /// Step 2: the only read of session state in an attempt.
    fn gate(&self, snapshot: &SessionSnapshot) -> Result<Address, SubmissionError> {
        let address = match (snapshot.is_ready(), snapshot.address()) {
            (true, Some(address)) => address,
            _ => {
                return Err(SubmissionError::SessionNotReady {
                    state: snapshot.state,
                })
            }
        };
        let balance = snapshot.balance();
        if balance < self.config.min_analysis_balance {
            return Err(SubmissionError::InsufficientBalance {
                balance,
                required: self.config.min_analysis_balance,
                faucet_url: self.config.faucet_url.clone(),
            });
        }
        Ok(address)
    }

    async fn run_attempt(&self, raw: &RawVitalSigns) -> Result<SubmissionReceipt, SubmissionError> {
        // 1. Validate
        let vitals: VitalSigns = match validate(raw) {
            Validation::Valid(vitals) => vitals,
            Validation::Incomplete(report) | Validation::Invalid(report) => {
                debug!("[hs-04] Input rejected: {}", report);
                return Err(SubmissionError::InvalidInput(report));
            }
        };
        debug!(?vitals, "[hs-04] Input accepted");

        // 2. Snapshot and balance gate
        let snapshot = self.session.snapshot();
        let from = self.gate(&snapshot)?;
        debug!(
            account = %from.short(),
            balance = %snapshot.balance(),
            "[hs-04] Session gate passed"
        );

        // 3. Score
        let assessment: RiskAssessment = self.scorer.score(ScoreRequest::from(&vitals)).await?;
        info!(
            risk_level = assessment.risk_level,
            "[hs-04] Scored: {}",
            assessment.risk_category
        );

        // 4. Encrypt
        let plaintext = RecordPlaintext {
            heart_rate: vitals.heart_rate().into(),
            blood_pressure: vitals.blood_pressure().into(),
            oxygen_level: vitals.oxygen_level().into(),
            risk_level: assessment.risk_level,
        };
        let record = seal_record(&self.public_key, &plaintext)?;

        // 5. Write, then wait a bounded time for the receipt
        let tx_hash = self
            .ledger
            .submit_health_metrics(from, &record)
            .await
            .map_err(|e| match e {
                LedgerError::Rejected(reason) => SubmissionError::SubmissionRejected(reason),
                LedgerError::Unknown(reason) => SubmissionError::SubmissionOutcomeUnknown(reason),
                other => SubmissionError::SubmissionRejected(other.to_string()),
            })?;
        info!(tx = %tx_hash, "[hs-04] Transaction broadcast, awaiting confirmation");

        let wait = self.config.confirmation_timeout;
        let confirmation =
            match tokio::time::timeout(wait, self.ledger.await_confirmation(tx_hash)).await {
                Ok(Ok(confirmation)) => confirmation,
                Ok(Err(e)) => {
                    return Err(SubmissionError::ConfirmationFailed {
                        tx_hash,
                        reason: e.to_string(),
                    })
                }
                Err(_) => {
                    return Err(SubmissionError::ConfirmationFailed {
                        tx_hash,
                        reason: format!("not confirmed within {:?}", wait),
                    })
                }
            };

        // 6. Receipt
        Ok(SubmissionReceipt {
            tx_hash: confirmation.tx_hash,
            record_index: confirmation.record_index,
            assessment,
        })
    }
}

#[async_trait]
impl AnalysisApi for AnalysisService {
    async fn submit(&self, raw: RawVitalSigns) -> Result<SubmissionReceipt, SubmissionError> {
        let Some(_guard) = self.try_begin() else {
            warn!("[hs-04] Submission refused, another attempt is in flight");
            return Err(SubmissionError::AlreadyInProgress);
        };

        let attempt = Uuid::new_v4();
        let result = self
            .run_attempt(&raw)
            .instrument(info_span!("attempt", id = %attempt))
            .await;

        match &result {
            Ok(receipt) => info!(
                %attempt,
                tx = %receipt.tx_hash,
                record_index = ?receipt.record_index,
                "[hs-04] Submission confirmed"
            ),
            Err(e) => warn!(%attempt, kind = e.kind(), "[hs-04] Submission failed: {}", e),
        }
        result
    }

    async fn read_record(
        &self,
        account: Address,
        index: u64,
    ) -> Result<StoredHealthRecord, LedgerError> {
        self.ledger.user_health_record(account, index).await
    }
}
