//! # Domain Module
//!
//! Core domain types for the Analysis Orchestrator.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
