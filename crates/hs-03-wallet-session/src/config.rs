//! # Session Configuration
//!
//! Supplied once at startup, never mutated.

use serde::{Deserialize, Serialize};
use shared_types::{ChainId, Wei};

use crate::domain::NetworkDefinition;

/// Session configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The only chain on which submission is permitted.
    pub target_chain: ChainId,

    /// Definition registered with the wallet when it does not know the
    /// target chain.
    pub network: NetworkDefinition,

    /// Attempt a network switch automatically after `connect()` and after
    /// a chain change lands on the wrong network.
    pub auto_switch_network: bool,

    /// Balance below which a funding (faucet) hint is shown. Independent of
    /// the analysis gate.
    pub low_balance_hint: Wei,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let network = NetworkDefinition::shield_testnet();
        Self {
            target_chain: network.chain_id,
            network,
            auto_switch_network: true,
            low_balance_hint: Wei::from_wei(100_000_000_000_000_000), // 0.1 token
        }
    }
}

impl SessionConfig {
    /// Create a config for testing (no automatic switching).
    pub fn for_testing() -> Self {
        Self {
            auto_switch_network: false,
            ..Self::default()
        }
    }
}
