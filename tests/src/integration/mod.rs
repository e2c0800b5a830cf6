//! # Integration Tests
//!
//! Session state machine and analysis orchestrator wired together, with the
//! wallet, balance source, scorer and ledger replaced by mocks, plus the
//! JSON-RPC adapters driven against a local fake endpoint.

pub mod fake_rpc;
pub mod fixtures;

mod rpc_adapters;
mod session_flows;
mod submission_flows;
