//! # Validator
//!
//! Rules, per field:
//! - empty (after trimming) → `Missing`
//! - not an optionally signed run of digits → `NotNumeric`
//! - integer outside `[1, 1000]`, including overflow → `OutOfRange`
//!
//! The outcome is `Invalid` when any field is rejected, else `Incomplete`
//! when any is missing, else `Valid`.

use std::num::IntErrorKind;

use crate::domain::{
    FieldIssue, IssueKind, RawVitalSigns, Validation, ValidationReport, VitalField, VitalSigns,
    VITAL_MAX, VITAL_MIN,
};

/// Validate one field's raw text.
pub fn validate_field(field: VitalField, raw: &str) -> Result<u32, FieldIssue> {
    let text = raw.trim();
    let issue = |kind| FieldIssue { field, kind };

    if text.is_empty() {
        return Err(issue(IssueKind::Missing));
    }

    let value = match text.parse::<i64>() {
        Ok(v) => v,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    issue(IssueKind::OutOfRange { raw: text.to_string() })
                }
                _ => issue(IssueKind::NotNumeric { raw: text.to_string() }),
            })
        }
    };

    if value < VITAL_MIN as i64 || value > VITAL_MAX as i64 {
        return Err(issue(IssueKind::OutOfRange { raw: text.to_string() }));
    }

    Ok(value as u32)
}

/// Validate all three inputs. No side effects.
pub fn validate(raw: &RawVitalSigns) -> Validation {
    let mut values = [0u32; 3];
    let mut issues = Vec::new();

    for (slot, field) in values.iter_mut().zip(VitalField::ALL) {
        match validate_field(field, raw.get(field)) {
            Ok(v) => *slot = v,
            Err(issue) => issues.push(issue),
        }
    }

    if issues.is_empty() {
        let [heart_rate, blood_pressure, oxygen_level] = values;
        return Validation::Valid(VitalSigns::from_validated(
            heart_rate,
            blood_pressure,
            oxygen_level,
        ));
    }

    let report = ValidationReport { issues };
    if report.has_invalid() {
        Validation::Invalid(report)
    } else {
        Validation::Incomplete(report)
    }
}
