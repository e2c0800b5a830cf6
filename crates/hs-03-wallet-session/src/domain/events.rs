//! # Wallet Events
//!
//! Provider pushes, delivered to the session through a bounded mailbox.

use shared_types::{Address, ChainId};

/// Mailbox depth for provider events.
pub const EVENT_MAILBOX_CAPACITY: usize = 64;

/// A change pushed by the wallet provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    /// The exposed account list changed. Empty means the user disconnected.
    AccountsChanged(Vec<Address>),
    /// The wallet moved to another chain.
    ChainChanged(ChainId),
}
