//! # Application Layer
//!
//! The submission pipeline.

pub mod service;

pub use service::AnalysisService;
