//! # Domain Errors
//!
//! Collaborator errors and the `SubmissionError` every attempt failure is
//! converted into. No raw collaborator error crosses the orchestrator
//! boundary.

use hs_01_ciphertext_encoder::EncodingError;
use hs_02_vital_validation::ValidationReport;
use hs_03_wallet_session::SessionState;
use shared_types::{TxHash, Wei};
use thiserror::Error;

/// Risk scorer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// Transport failure, non-2xx status or malformed body.
    #[error("Scorer unavailable: {0}")]
    Unavailable(String),

    /// Well-formed response without a usable risk level.
    #[error("Risk level could not be determined: {0}")]
    Indeterminate(String),
}

/// Ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Refused before broadcast (user rejection, gas estimation, nonce).
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Mined with a failing status.
    #[error("Transaction {tx_hash} reverted")]
    Reverted {
        /// Reverted transaction
        tx_hash: TxHash,
    },

    /// RPC transport failure. The request never reached the provider.
    #[error("Ledger transport error: {0}")]
    Transport(String),

    /// The write was handed to the provider but no answer came back
    /// (timeout, dropped connection, unreadable reply). It may have been
    /// broadcast.
    #[error("Broadcast outcome unknown: {0}")]
    Unknown(String),

    /// Unexpected response shape.
    #[error("Ledger decode error: {0}")]
    Decode(String),

    /// No record at the requested index.
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Failure of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Incomplete or invalid input. No external call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationReport),

    /// Balance below the analysis gate. No external call was made.
    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance {
        /// Snapshot balance
        balance: Wei,
        /// Configured minimum
        required: Wei,
        /// Where to obtain tokens
        faucet_url: String,
    },

    /// The session is not `ConnectedReady`.
    #[error("Session not ready: {state}")]
    SessionNotReady {
        /// State at snapshot time
        state: SessionState,
    },

    /// Scorer unreachable or answered badly.
    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(String),

    /// Scorer answered without a risk level.
    #[error("Scoring indeterminate: {0}")]
    ScoringIndeterminate(String),

    /// Ciphertext construction failed. Indicates an upstream contract
    /// violation.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The ledger refused the write before broadcast.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The write may or may not have been broadcast. No hash is known.
    #[error("Submission outcome unknown: {0}")]
    SubmissionOutcomeUnknown(String),

    /// Broadcast, but not confirmed (revert or timeout). The transaction may
    /// still land.
    #[error("Transaction {tx_hash} not confirmed: {reason}")]
    ConfirmationFailed {
        /// Broadcast transaction
        tx_hash: TxHash,
        /// Revert or timeout detail
        reason: String,
    },

    /// Another attempt holds the session.
    #[error("A submission is already in progress")]
    AlreadyInProgress,
}

impl SubmissionError {
    /// Stable snake_case identifier.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::InvalidInput(_) => "invalid_input",
            SubmissionError::InsufficientBalance { .. } => "insufficient_balance",
            SubmissionError::SessionNotReady { .. } => "session_not_ready",
            SubmissionError::ScoringUnavailable(_) => "scoring_unavailable",
            SubmissionError::ScoringIndeterminate(_) => "scoring_indeterminate",
            SubmissionError::Encoding(_) => "encoding_error",
            SubmissionError::SubmissionRejected(_) => "submission_rejected",
            SubmissionError::SubmissionOutcomeUnknown(_) => "submission_outcome_unknown",
            SubmissionError::ConfirmationFailed { .. } => "confirmation_failed",
            SubmissionError::AlreadyInProgress => "already_in_progress",
        }
    }

    /// Text for the end user.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::InvalidInput(report) => {
                format!("Please check your vital signs: {}", report.summary())
            }
            SubmissionError::InsufficientBalance {
                required,
                faucet_url,
                ..
            } => format!(
                "You need at least {} OWN token to perform analysis. \
                 Please get more tokens from the faucet: {}",
                required.to_plain_string(),
                faucet_url
            ),
            SubmissionError::SessionNotReady { state } => match state {
                SessionState::ConnectedWrongNetwork => {
                    "Please switch to the Gateway Shield Testnet to use the Health Risk Calculator."
                        .to_string()
                }
                _ => "Please connect your wallet to access the Health Risk Calculator.".to_string(),
            },
            SubmissionError::ScoringUnavailable(_) => {
                "Failed to analyze your health data. Please try again.".to_string()
            }
            SubmissionError::ScoringIndeterminate(_) => {
                "Risk level could not be determined.".to_string()
            }
            SubmissionError::Encoding(_) => {
                "Your data could not be encrypted. Please contact support.".to_string()
            }
            SubmissionError::SubmissionRejected(_) => {
                "The transaction was not sent. Please try again.".to_string()
            }
            SubmissionError::SubmissionOutcomeUnknown(_) => {
                "The wallet did not report whether the transaction was sent. It may \
                 still be recorded; check your wallet activity before submitting again."
                    .to_string()
            }
            SubmissionError::ConfirmationFailed { tx_hash, .. } => format!(
                "Transaction {} was not confirmed. It may still be recorded; \
                 check it before submitting again.",
                tx_hash
            ),
            SubmissionError::AlreadyInProgress => {
                "An analysis is already in progress. Please wait for it to finish.".to_string()
            }
        }
    }

    /// Whether re-invoking `submit` (after any user action) can succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SubmissionError::Encoding(_))
    }

    /// True when a broadcast transaction from this attempt may still be
    /// mined.
    pub fn transaction_may_land(&self) -> bool {
        matches!(
            self,
            SubmissionError::ConfirmationFailed { .. }
                | SubmissionError::SubmissionOutcomeUnknown(_)
        )
    }

    /// Transaction hash attached to the failure, if any.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            SubmissionError::ConfirmationFailed { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

impl From<ScoringError> for SubmissionError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Unavailable(msg) => SubmissionError::ScoringUnavailable(msg),
            ScoringError::Indeterminate(msg) => SubmissionError::ScoringIndeterminate(msg),
        }
    }
}
