//! # Shared Types Crate
//!
//! Chain primitives used across the Health-Shield subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every subsystem speaks in these types, never
//!   in raw strings, once a value has crossed an adapter boundary.
//! - **Parse, don't validate**: an `Address`, `ChainId`, `TxHash` or `Wei` that
//!   exists is well formed.
//! - **Wire format**: all types serialize to the `0x`-prefixed hex form used by
//!   Ethereum JSON-RPC providers.

pub mod entities;
pub mod errors;
pub mod units;

pub use entities::*;
pub use errors::*;
pub use units::*;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;
