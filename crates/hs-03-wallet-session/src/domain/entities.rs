//! # Session Entities
//!
//! The committed session record and the state it is in.
//!
//! ## Invariants
//!
//! - `connected` implies `address` is present
//! - `ConnectedReady` implies `chain_id == target_chain`
//! - A disconnected session carries no address, no chain and a zero balance

use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, Wei};
use std::fmt;

/// Connection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No wallet connection.
    Disconnected,
    /// Awaiting the wallet's answer to a connection request.
    Connecting,
    /// Connected, but on a chain other than the target.
    ConnectedWrongNetwork,
    /// Connected on the target chain. Submission permitted.
    ConnectedReady,
}

impl SessionState {
    /// True for both connected states.
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            SessionState::ConnectedWrongNetwork | SessionState::ConnectedReady
        )
    }

    /// True only when submission is permitted.
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::ConnectedReady)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Disconnected => "Disconnected",
            SessionState::Connecting => "Connecting",
            SessionState::ConnectedWrongNetwork => "ConnectedWrongNetwork",
            SessionState::ConnectedReady => "ConnectedReady",
        };
        f.write_str(s)
    }
}

/// The wallet session record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    address: Option<Address>,
    chain_id: Option<ChainId>,
    balance: Wei,
    connected: bool,
}

impl WalletSession {
    /// The empty, disconnected session.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A connected session.
    pub fn connected(address: Address, chain_id: ChainId, balance: Wei) -> Self {
        Self {
            address: Some(address),
            chain_id: Some(chain_id),
            balance,
            connected: true,
        }
    }

    /// Same session with a new balance.
    pub fn with_balance(&self, balance: Wei) -> Self {
        Self {
            balance,
            ..self.clone()
        }
    }

    /// Account address.
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    /// Chain the wallet is on.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    /// Last known native balance.
    pub fn balance(&self) -> Wei {
        self.balance
    }

    /// Connected flag.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// A committed view of the session, copied out to readers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// State at commit time.
    pub state: SessionState,
    /// Session record at commit time.
    pub session: WalletSession,
}

impl SessionSnapshot {
    /// The initial snapshot.
    pub fn disconnected() -> Self {
        Self {
            state: SessionState::Disconnected,
            session: WalletSession::disconnected(),
        }
    }

    /// Account address.
    pub fn address(&self) -> Option<Address> {
        self.session.address()
    }

    /// Last known balance.
    pub fn balance(&self) -> Wei {
        self.session.balance()
    }

    /// Submission permitted on this snapshot.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Connected with a balance below `threshold`.
    pub fn needs_funding(&self, threshold: Wei) -> bool {
        self.state.is_connected() && self.session.balance() < threshold
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::disconnected()
    }
}
