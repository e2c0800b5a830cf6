//! # Inbound Ports
//!
//! API exposed to the CLI and to the analysis orchestrator.

use async_trait::async_trait;
use shared_types::{Address, Wei};

use crate::domain::{SessionError, SessionSnapshot, WalletEvent};

/// Read-only access to the committed session.
///
/// The orchestrator depends on this alone; it never drives transitions.
pub trait SessionReader: Send + Sync {
    /// Copy of the last committed snapshot.
    fn snapshot(&self) -> SessionSnapshot;
}

/// Wallet session API - inbound port.
#[async_trait]
pub trait WalletSessionApi: SessionReader {
    /// Request accounts, read the chain, fetch the balance and classify.
    async fn connect(&self) -> Result<SessionSnapshot, SessionError>;

    /// Move the wallet onto the target chain, registering it if unknown.
    async fn ensure_network(&self) -> Result<SessionSnapshot, SessionError>;

    /// Clear the session. Never fails.
    async fn disconnect(&self);

    /// Refresh the balance of `address` if it is still the session account.
    async fn refresh_balance(&self, address: Address) -> Result<Wei, SessionError>;

    /// Apply a provider push.
    async fn handle_event(&self, event: WalletEvent);
}
