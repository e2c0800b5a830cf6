//! # HS-04 Analysis Orchestrator
//!
//! Drives one submission attempt end to end: validate, gate on the session
//! snapshot, score, encrypt, write to the ledger and wait for confirmation.
//!
//! **Subsystem ID:** 04  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//!
//! ## Attempt Pipeline
//!
//! ```text
//! submit(raw)
//!   │ in-flight guard ──────────────→ AlreadyInProgress
//!   ├─ 1. validate ─────────────────→ InvalidInput
//!   ├─ 2. snapshot + balance gate ──→ SessionNotReady / InsufficientBalance
//!   ├─ 3. scorer ───────────────────→ ScoringUnavailable / ScoringIndeterminate
//!   ├─ 4. seal 4 ciphertexts ───────→ EncodingError
//!   ├─ 5. ledger write ─────────────→ SubmissionRejected / SubmissionOutcomeUnknown
//!   │     bounded confirmation ─────→ ConfirmationFailed { tx_hash }
//!   └─ 6. SubmissionReceipt
//! ```
//!
//! No step is retried. The session is read once, at step 2.
//!
//! ## Module Structure
//!
//! ```text
//! hs-04-analysis-orchestrator/
//! ├── domain/          # RiskAssessment, SubmissionReceipt, errors
//! ├── ports/           # AnalysisApi (inbound), RiskScorer/HealthLedger (outbound)
//! ├── adapters/        # HttpRiskScorer
//! ├── application/     # AnalysisService
//! └── config.rs        # AnalysisConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{parse_score_response, HttpRiskScorer};
pub use application::AnalysisService;
pub use config::AnalysisConfig;
pub use domain::{
    LedgerConfirmation, LedgerError, RiskAssessment, ScoreRequest, ScoringError,
    StoredHealthRecord, SubmissionError, SubmissionReceipt,
};
pub use ports::{AnalysisApi, HealthLedger, MockHealthLedger, MockRiskScorer, RiskScorer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
