//! # Domain Entities
//!
//! Vital-sign fields, raw inputs and the validated `VitalSigns` value.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationReport;

/// Smallest accepted value for every field.
pub const VITAL_MIN: u32 = 1;

/// Largest accepted value for every field.
pub const VITAL_MAX: u32 = 1000;

/// The three measured fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalField {
    /// Heart rate, BPM.
    HeartRate,
    /// Systolic blood pressure, mmHg.
    BloodPressure,
    /// Blood oxygen saturation, percent.
    OxygenLevel,
}

impl VitalField {
    /// All fields in submission order.
    pub const ALL: [VitalField; 3] = [
        VitalField::HeartRate,
        VitalField::BloodPressure,
        VitalField::OxygenLevel,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            VitalField::HeartRate => "Heart rate",
            VitalField::BloodPressure => "Blood pressure",
            VitalField::OxygenLevel => "Oxygen level",
        }
    }

    /// Measurement unit.
    pub fn unit(&self) -> &'static str {
        match self {
            VitalField::HeartRate => "BPM",
            VitalField::BloodPressure => "mmHg",
            VitalField::OxygenLevel => "%",
        }
    }

    /// Clinically normal range, inclusive. Informational only.
    pub fn normal_range(&self) -> (u32, u32) {
        match self {
            VitalField::HeartRate => (60, 100),
            VitalField::BloodPressure => (90, 140),
            VitalField::OxygenLevel => (95, 100),
        }
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw inputs exactly as entered. Numeric callers go through
/// [`RawVitalSigns::from_numbers`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVitalSigns {
    /// Heart rate text.
    pub heart_rate: String,
    /// Blood pressure text.
    pub blood_pressure: String,
    /// Oxygen level text.
    pub oxygen_level: String,
}

impl RawVitalSigns {
    /// Textual inputs.
    pub fn new(
        heart_rate: impl Into<String>,
        blood_pressure: impl Into<String>,
        oxygen_level: impl Into<String>,
    ) -> Self {
        Self {
            heart_rate: heart_rate.into(),
            blood_pressure: blood_pressure.into(),
            oxygen_level: oxygen_level.into(),
        }
    }

    /// Numeric inputs.
    pub fn from_numbers(heart_rate: i64, blood_pressure: i64, oxygen_level: i64) -> Self {
        Self::new(
            heart_rate.to_string(),
            blood_pressure.to_string(),
            oxygen_level.to_string(),
        )
    }

    /// Raw text for `field`.
    pub fn get(&self, field: VitalField) -> &str {
        match field {
            VitalField::HeartRate => &self.heart_rate,
            VitalField::BloodPressure => &self.blood_pressure,
            VitalField::OxygenLevel => &self.oxygen_level,
        }
    }
}

/// Three vital signs, each in `[VITAL_MIN, VITAL_MAX]`.
///
/// Only the validator constructs this type, so a partially valid value
/// cannot exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VitalSigns {
    heart_rate: u32,
    blood_pressure: u32,
    oxygen_level: u32,
}

/// A field outside its normal range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Field concerned.
    pub field: VitalField,
    /// Measured value.
    pub value: u32,
    /// Normal range, inclusive.
    pub normal: (u32, u32),
}

impl VitalSigns {
    pub(crate) fn from_validated(heart_rate: u32, blood_pressure: u32, oxygen_level: u32) -> Self {
        Self {
            heart_rate,
            blood_pressure,
            oxygen_level,
        }
    }

    /// Validate numeric inputs directly.
    pub fn try_new(
        heart_rate: i64,
        blood_pressure: i64,
        oxygen_level: i64,
    ) -> Result<Self, ValidationReport> {
        crate::algorithms::validate(&RawVitalSigns::from_numbers(
            heart_rate,
            blood_pressure,
            oxygen_level,
        ))
        .into_result()
    }

    /// Heart rate, BPM.
    pub fn heart_rate(&self) -> u32 {
        self.heart_rate
    }

    /// Systolic blood pressure, mmHg.
    pub fn blood_pressure(&self) -> u32 {
        self.blood_pressure
    }

    /// Oxygen saturation, percent.
    pub fn oxygen_level(&self) -> u32 {
        self.oxygen_level
    }

    /// Value of `field`.
    pub fn get(&self, field: VitalField) -> u32 {
        match field {
            VitalField::HeartRate => self.heart_rate,
            VitalField::BloodPressure => self.blood_pressure,
            VitalField::OxygenLevel => self.oxygen_level,
        }
    }

    /// Fields outside their normal range.
    pub fn advisories(&self) -> Vec<Advisory> {
        VitalField::ALL
            .iter()
            .filter_map(|&field| {
                let value = self.get(field);
                let (lo, hi) = field.normal_range();
                (value < lo || value > hi).then_some(Advisory {
                    field,
                    value,
                    normal: (lo, hi),
                })
            })
            .collect()
    }
}

/// Outcome of validating one set of raw inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    /// All three fields accepted.
    Valid(VitalSigns),
    /// Some fields are still empty; nothing entered is wrong yet.
    Incomplete(ValidationReport),
    /// At least one entered value is rejected.
    Invalid(ValidationReport),
}

impl Validation {
    /// `Ok` only for `Valid`.
    pub fn into_result(self) -> Result<VitalSigns, ValidationReport> {
        match self {
            Validation::Valid(v) => Ok(v),
            Validation::Incomplete(r) | Validation::Invalid(r) => Err(r),
        }
    }

    /// `true` for `Valid`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }
}
