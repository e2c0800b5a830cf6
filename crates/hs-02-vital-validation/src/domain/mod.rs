//! # Domain Module
//!
//! Vital-sign value objects and validation outcomes.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
