//! # HS-03 Wallet Session
//!
//! The wallet-and-network state machine that gates all actions on having a
//! funded account on the correct network.
//!
//! **Subsystem ID:** 03  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//!
//! ## State Machine
//!
//! ```text
//!                 connect()                 chain == target
//! Disconnected ─────────────→ Connecting ─────────────────→ ConnectedReady
//!      ↑                          │   │                            ↑
//!      │   rejected / no wallet   │   │ chain != target            │ ensure_network()
//!      └──────────────────────────┘   └──────→ ConnectedWrongNetwork
//!      ↑                                               │
//!      └──────────────── disconnect() ─────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! | Rule | Description |
//! |------|-------------|
//! | Single writer | Every transition runs under one async transition lock |
//! | Committed reads | Readers only ever see a complete `SessionSnapshot` |
//! | Mailbox events | Provider pushes arrive as `WalletEvent`s, processed in order |
//! | Snapshots | Consumers copy what they need and never re-read mid-flight |
//!
//! ## Module Structure
//!
//! ```text
//! hs-03-wallet-session/
//! ├── domain/          # WalletSession, SessionState, WalletEvent, errors
//! ├── ports/           # SessionReader/WalletSessionApi (inbound), WalletProvider/BalanceQuery (outbound)
//! ├── application/     # SessionMachine, event mailbox
//! └── config.rs        # SessionConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod application;

// Re-exports
pub use config::SessionConfig;
pub use domain::{
    NativeCurrency, NetworkDefinition, SessionError, SessionSnapshot, SessionState,
    WalletError, WalletEvent, WalletSession, EVENT_MAILBOX_CAPACITY,
};
pub use ports::{
    BalanceQuery, MockBalanceQuery, MockWalletProvider, SessionReader, WalletProvider,
    WalletSessionApi,
};
pub use application::{event_channel, SessionMachine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
