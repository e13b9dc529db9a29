//! Static parameter catalog and the status classification rule.
//!
//! Normal ranges, optimal points, scoring weights and display precision for
//! the five monitored parameters. Weights sum to 1.0.

use crate::types::{ParameterId, ReadingStatus};

/// Static definition of one monitored parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub id: ParameterId,
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
    pub unit: &'static str,
    /// Scoring weight; all weights sum to 1.0
    pub weight: f64,
    /// Decimal places for display rounding
    pub precision: i32,
    /// Initial value used when (re)generating a baseline snapshot
    pub baseline: f64,
}

pub const PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec { id: ParameterId::Chlorine, min: 0.2, max: 2.0, optimal: 0.8, unit: "mg/L", weight: 0.25, precision: 2, baseline: 1.4 },
    ParameterSpec { id: ParameterId::Ph, min: 7.0, max: 8.5, optimal: 7.5, unit: "", weight: 0.30, precision: 2, baseline: 8.2 },
    ParameterSpec { id: ParameterId::Turbidity, min: 0.0, max: 1.0, optimal: 0.3, unit: "NTU", weight: 0.20, precision: 2, baseline: 0.75 },
    ParameterSpec { id: ParameterId::Temperature, min: 15.0, max: 25.0, optimal: 20.0, unit: "°C", weight: 0.15, precision: 1, baseline: 20.5 },
    ParameterSpec { id: ParameterId::Lead, min: 0.0, max: 0.015, optimal: 0.005, unit: "mg/L", weight: 0.10, precision: 3, baseline: 0.012 },
];

/// Look up the spec for a parameter id.
pub fn spec(id: ParameterId) -> &'static ParameterSpec {
    // The catalog covers every variant, so this always finds a match.
    PARAMETERS
        .iter()
        .find(|p| p.id == id)
        .unwrap_or(&PARAMETERS[0])
}

/// Normalized deviation of `value` from the parameter's optimal point,
/// scaled by its normal range.
pub fn deviation(value: f64, spec: &ParameterSpec) -> f64 {
    (value - spec.optimal).abs() / (spec.max - spec.min)
}

/// Classify a reading value. Pure and parameter-agnostic given the range:
/// deviation < 0.15 → normal, < 0.35 → warning, else anomaly.
pub fn classify(value: f64, spec: &ParameterSpec) -> ReadingStatus {
    let d = deviation(value, spec);
    if d < 0.15 {
        ReadingStatus::Normal
    } else if d < 0.35 {
        ReadingStatus::Warning
    } else {
        ReadingStatus::Anomaly
    }
}

/// Round to the parameter's configured number of decimal places.
pub fn round_to_precision(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}
