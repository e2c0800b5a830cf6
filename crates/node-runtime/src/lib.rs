//! # Health-Shield Node Runtime
//!
//! Adapters, configuration and wiring behind the `hs-node` binary.
//!
//! ## Structure
//!
//! ```text
//! node-runtime/
//! ├── adapters/    # JSON-RPC wallet, balance, ledger, ABI codec, watcher
//! ├── container/   # NodeConfig (env), NodeRuntime (wiring + tasks)
//! └── handlers/    # CLI reports
//! ```
//!
//! ## Endpoints
//!
//! | Endpoint | Used for |
//! |----------|----------|
//! | wallet bridge | accounts, chain switching, `eth_sendTransaction` |
//! | chain RPC | balances, receipts, `eth_call` |
//! | scorer | risk assessment |

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod container;
pub mod handlers;

pub use container::{ConfigError, NodeConfig, NodeRuntime, RuntimeError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
