//! # Inbound Ports
//!
//! API exposed to renderers (the CLI).

use async_trait::async_trait;
use hs_02_vital_validation::RawVitalSigns;
use shared_types::Address;

use crate::domain::{LedgerError, StoredHealthRecord, SubmissionError, SubmissionReceipt};

/// Analysis API - inbound port.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Run one submission attempt.
    async fn submit(&self, raw: RawVitalSigns) -> Result<SubmissionReceipt, SubmissionError>;

    /// Read a stored record back from the ledger.
    async fn read_record(
        &self,
        account: Address,
        index: u64,
    ) -> Result<StoredHealthRecord, LedgerError>;
}
