//! # HS-02 Vital-Sign Validator
//!
//! Pure validation of the three raw vital-sign inputs.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//!
//! ## Purpose
//!
//! A `VitalSigns` value exists only when every field parses as an integer in
//! `[1, 1000]`. Anything else is reported per field, and empty fields are
//! reported as *incomplete* rather than *invalid* so a form can tell
//! "keep typing" from "reject this value".
//!
//! ## Module Structure
//!
//! ```text
//! hs-02-vital-validation/
//! ├── domain/          # VitalSigns, VitalField, RawVitalSigns, ValidationReport
//! └── algorithms/      # validate()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{validate, validate_field};
pub use domain::{
    Advisory, FieldIssue, IssueKind, RawVitalSigns, Validation, ValidationReport, VitalField,
    VitalSigns, VITAL_MAX, VITAL_MIN,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
