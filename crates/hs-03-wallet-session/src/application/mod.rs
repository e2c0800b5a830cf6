//! # Application Layer
//!
//! The session state machine and its event mailbox.

pub mod service;

pub use service::{event_channel, SessionMachine};
