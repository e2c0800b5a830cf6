//! # Command Handlers
//!
//! Turns session snapshots, receipts and failures into the text the CLI
//! prints.

pub mod report;

pub use report::{render_advisories, render_receipt, render_record, render_status};
