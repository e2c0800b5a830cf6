//! # Wallet Bridge
//!
//! `WalletProvider` over an EIP-1193 wallet that exposes its request method
//! as JSON-RPC over HTTP, plus a `BalanceQuery` against the chain endpoint.
//!
//! ## Provider Codes
//!
//! | Code | Meaning | Mapped to |
//! |------|---------|-----------|
//! | 4001 | User rejected | `UserRejected` |
//! | 4100 | Unauthorized | `UserRejected` |
//! | 4200 | Unsupported method | `Unsupported` |
//! | 4902 | Unrecognized chain | `UnrecognizedChain` |
//! | -32601 | Method not found | `Unsupported` |

use std::sync::Arc;

use async_trait::async_trait;
use hs_03_wallet_session::{BalanceQuery, NetworkDefinition, WalletError, WalletProvider};
use serde_json::json;
use shared_types::{Address, ChainId, Wei};
use tracing::debug;

use super::rpc_client::{JsonRpcClient, RpcError};

/// User rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// The requested account or method is not authorized.
pub const CODE_UNAUTHORIZED: i64 = 4100;
/// The provider does not support the method.
pub const CODE_UNSUPPORTED_METHOD: i64 = 4200;
/// The chain has not been added to the wallet.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC method not found.
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;

/// Map a transport or provider error for `method`.
///
/// `chain` is the chain a switch targeted, used for `4902`.
pub fn map_wallet_error(err: RpcError, method: &str, chain: Option<ChainId>) -> WalletError {
    let code = err.provider_code();
    match (err, code) {
        (_, Some(CODE_USER_REJECTED | CODE_UNAUTHORIZED)) => WalletError::UserRejected,
        (_, Some(CODE_UNSUPPORTED_METHOD | CODE_METHOD_NOT_FOUND)) => {
            WalletError::Unsupported(method.to_string())
        }
        (err, Some(CODE_UNRECOGNIZED_CHAIN)) => match chain {
            Some(chain) => WalletError::UnrecognizedChain(chain),
            None => WalletError::Provider {
                code: CODE_UNRECOGNIZED_CHAIN,
                message: err.to_string(),
            },
        },
        (RpcError::Rpc { code, message, .. }, _) => WalletError::Provider { code, message },
        (RpcError::Connection(msg), _) => WalletError::Unavailable(msg),
        (RpcError::Http(e), _) => WalletError::Unavailable(e.to_string()),
        (RpcError::Parse(msg), _) => WalletError::InvalidResponse(msg),
    }
}

/// Wallet reached through a JSON-RPC bridge.
pub struct JsonRpcWallet {
    rpc: Arc<JsonRpcClient>,
}

impl JsonRpcWallet {
    /// Wrap a client pointed at the wallet bridge.
    pub fn new(rpc: Arc<JsonRpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.rpc
            .call("eth_requestAccounts", [(); 0])
            .await
            .map_err(|e| map_wallet_error(e, "eth_requestAccounts", None))
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.rpc
            .call("eth_accounts", [(); 0])
            .await
            .map_err(|e| map_wallet_error(e, "eth_accounts", None))
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        self.rpc
            .call("eth_chainId", [(); 0])
            .await
            .map_err(|e| map_wallet_error(e, "eth_chainId", None))
    }

    async fn switch_chain(&self, chain: ChainId) -> Result<(), WalletError> {
        debug!(chain = %chain, "[hs-node] wallet_switchEthereumChain");
        self.rpc
            .call_optional::<_, serde_json::Value>(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain.to_hex() }]),
            )
            .await
            .map(|_| ())
            .map_err(|e| map_wallet_error(e, "wallet_switchEthereumChain", Some(chain)))
    }

    async fn add_chain(&self, network: &NetworkDefinition) -> Result<(), WalletError> {
        debug!(chain = %network.chain_id, "[hs-node] wallet_addEthereumChain");
        self.rpc
            .call_optional::<_, serde_json::Value>("wallet_addEthereumChain", [network])
            .await
            .map(|_| ())
            .map_err(|e| map_wallet_error(e, "wallet_addEthereumChain", Some(network.chain_id)))
    }

    async fn revoke_permissions(&self) -> Result<(), WalletError> {
        self.rpc
            .call_optional::<_, serde_json::Value>(
                "wallet_revokePermissions",
                json!([{ "eth_accounts": {} }]),
            )
            .await
            .map(|_| ())
            .map_err(|e| map_wallet_error(e, "wallet_revokePermissions", None))
    }
}

/// Native balance read with `eth_getBalance` from a chain endpoint.
pub struct RpcBalanceQuery {
    rpc: Arc<JsonRpcClient>,
}

impl RpcBalanceQuery {
    pub fn new(rpc: Arc<JsonRpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl BalanceQuery for RpcBalanceQuery {
    async fn balance_of(&self, address: Address) -> Result<Wei, WalletError> {
        let raw: String = self
            .rpc
            .call("eth_getBalance", json!([address, "latest"]))
            .await
            .map_err(|e| map_wallet_error(e, "eth_getBalance", None))?;
        Wei::from_hex_quantity(&raw).map_err(|e| WalletError::InvalidResponse(e.to_string()))
    }
}
