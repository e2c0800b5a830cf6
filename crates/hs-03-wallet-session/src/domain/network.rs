//! # Network Definition
//!
//! The payload of `wallet_addEthereumChain` (EIP-3085).

use serde::{Deserialize, Serialize};
use shared_types::ChainId;

/// Gateway Shield Testnet RPC endpoint.
pub const SHIELD_TESTNET_RPC: &str = "https://gateway-shield-testnet.rpc.caldera.xyz/http";

/// Gateway Shield Testnet explorer.
pub const SHIELD_TESTNET_EXPLORER: &str = "https://gateway-shield-testnet.explorer.caldera.xyz";

/// Native currency metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
}

/// Chain parameters a wallet needs to register an unknown network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDefinition {
    /// Chain identifier.
    pub chain_id: ChainId,
    /// Human-readable chain name.
    pub chain_name: String,
    /// Native currency.
    pub native_currency: NativeCurrency,
    /// RPC endpoints.
    pub rpc_urls: Vec<String>,
    /// Block explorers.
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDefinition {
    /// Gateway Shield Testnet.
    pub fn shield_testnet() -> Self {
        Self {
            chain_id: ChainId::SHIELD_TESTNET,
            chain_name: "Gateway Shield Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Gateway".to_string(),
                symbol: "OWN".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![SHIELD_TESTNET_RPC.to_string()],
            block_explorer_urls: vec![SHIELD_TESTNET_EXPLORER.to_string()],
        }
    }

    /// First RPC endpoint, if any.
    pub fn primary_rpc(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }

    /// Explorer link for a transaction.
    pub fn tx_url(&self, tx_hash: &str) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}
