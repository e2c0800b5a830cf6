//! # Adapters
//!
//! Concrete implementations of outbound ports that live with this subsystem.
//! Chain-facing adapters (wallet bridge, ledger) live in `node-runtime`.

pub mod http_scorer;

pub use http_scorer::{parse_score_response, HttpRiskScorer};
