//! # Domain Module
//!
//! Core domain types for the Wallet Session.

pub mod entities;
pub mod errors;
pub mod events;
pub mod network;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use network::*;
