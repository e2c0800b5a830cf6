//! # Validation Report
//!
//! Per-field issues. A report never raises; the caller decides whether an
//! issue blocks submission.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::VitalField;

/// Why a single field did not validate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// Nothing entered yet.
    Missing,
    /// Entered text is not an integer.
    NotNumeric {
        /// Text as entered.
        raw: String,
    },
    /// Integer outside `[VITAL_MIN, VITAL_MAX]` (or too large to represent).
    OutOfRange {
        /// Text as entered.
        raw: String,
    },
}

impl IssueKind {
    /// `true` for issues that reject the value, `false` for "keep typing".
    pub fn is_invalid(&self) -> bool {
        !matches!(self, IssueKind::Missing)
    }
}

/// One field's issue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Offending field.
    pub field: VitalField,
    /// What is wrong with it.
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{} is required", self.field),
            IssueKind::NotNumeric { raw } => {
                write!(f, "{} must be a whole number (got {:?})", self.field, raw)
            }
            IssueKind::OutOfRange { raw } => write!(
                f,
                "{} must be between {} and {} (got {})",
                self.field,
                super::entities::VITAL_MIN,
                super::entities::VITAL_MAX,
                raw
            ),
        }
    }
}

/// All issues found in one set of inputs, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Issues in field order.
    pub issues: Vec<FieldIssue>,
}

impl ValidationReport {
    /// `true` when at least one issue rejects its value.
    pub fn has_invalid(&self) -> bool {
        self.issues.iter().any(|i| i.kind.is_invalid())
    }

    /// Fields still waiting for input.
    pub fn missing_fields(&self) -> Vec<VitalField> {
        self.issues
            .iter()
            .filter(|i| i.kind == IssueKind::Missing)
            .map(|i| i.field)
            .collect()
    }

    /// Issue for `field`, if any.
    pub fn issue_for(&self, field: VitalField) -> Option<&FieldIssue> {
        self.issues.iter().find(|i| i.field == field)
    }

    /// One line per issue joined with `"; "`.
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationReport {}
