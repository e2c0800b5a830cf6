//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports declared by the session
//! and orchestrator crates.
//!
//! | Adapter | Port | Transport |
//! |---------|------|-----------|
//! | `JsonRpcWallet` | `WalletProvider` | wallet bridge |
//! | `RpcBalanceQuery` | `BalanceQuery` | chain RPC |
//! | `JsonRpcHealthLedger` | `HealthLedger` | wallet bridge + chain RPC |
//! | `WalletWatcher` | event mailbox | polling |

pub mod abi;
pub mod ledger;
pub mod rpc_client;
pub mod wallet_bridge;
pub mod watcher;

pub use ledger::{confirmation_from_receipt, JsonRpcHealthLedger};
pub use rpc_client::{JsonRpcClient, RpcError};
pub use wallet_bridge::{map_wallet_error, JsonRpcWallet, RpcBalanceQuery};
pub use watcher::WalletWatcher;
