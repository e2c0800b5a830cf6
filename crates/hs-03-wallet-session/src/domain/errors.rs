//! # Domain Errors
//!
//! Errors raised by the wallet provider port and by session transitions.

use shared_types::ChainId;
use thiserror::Error;

/// Errors reported by a wallet provider.
///
/// EIP-1193 provider codes map onto these variants at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No provider reachable.
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    /// The user declined the request (4001).
    #[error("User rejected the request")]
    UserRejected,

    /// The wallet does not know the chain (4902).
    #[error("Unrecognized chain {0}")]
    UnrecognizedChain(ChainId),

    /// The wallet does not implement the method (4200 / -32601).
    #[error("Method not supported: {0}")]
    Unsupported(String),

    /// Any other provider error.
    #[error("Provider error {code}: {message}")]
    Provider {
        /// Provider error code
        code: i64,
        /// Provider message
        message: String,
    },

    /// The provider answered with something unparseable.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Session transition errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No wallet capability present, or it failed.
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The user declined connection.
    #[error("Connection request rejected by user")]
    UserRejected,

    /// The wallet did not land on the target network.
    #[error("Network switch failed: {0}")]
    NetworkSwitchFailed(String),

    /// Operation requires a connected session.
    #[error("Wallet not connected")]
    NotConnected,
}

impl SessionError {
    /// Stable snake_case identifier.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::WalletUnavailable(_) => "wallet_unavailable",
            SessionError::UserRejected => "user_rejected",
            SessionError::NetworkSwitchFailed(_) => "network_switch_failed",
            SessionError::NotConnected => "not_connected",
        }
    }

    /// Map a provider failure during `connect()`.
    pub fn from_connect_failure(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected => SessionError::UserRejected,
            other => SessionError::WalletUnavailable(other.to_string()),
        }
    }
}
