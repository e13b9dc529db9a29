//! Risk scorer: weighted deviation scoring with an optional secondary
//! quality-index blend.
//!
//! The index formula and level breakpoints are exact contracts consumed by
//! the public feed; keep them bit-for-bit stable.

use std::sync::Arc;

use crate::params;
use crate::types::{Reading, RiskLevel, Severity};

/// Weighting of the primary (deviation-based) score when a secondary
/// quality index is available.
const PRIMARY_WEIGHT: f64 = 0.7;
const SECONDARY_WEIGHT: f64 = 0.3;

/// Optional external water-quality-index input. Implementations return
/// `None` when no fresh value is available; the scorer then falls back to
/// primary-only weighting. Lookups must not block the tick.
pub trait QualityIndexProvider: Send + Sync {
    fn quality_index(&self) -> Option<f64>;
}

/// Converts a set of readings into a 0–100 composite risk index.
pub struct RiskScorer {
    secondary: Option<Arc<dyn QualityIndexProvider>>,
}

impl RiskScorer {
    pub fn new() -> Self {
        Self { secondary: None }
    }

    pub fn with_secondary(secondary: Arc<dyn QualityIndexProvider>) -> Self {
        Self { secondary: Some(secondary) }
    }

    /// Composite risk index for one snapshot's readings.
    pub fn score(&self, readings: &[Reading]) -> u8 {
        let mut total_risk = 0.0;
        let mut total_weight = 0.0;

        for reading in readings {
            let spec = params::spec(reading.parameter);
            let deviation = params::deviation(reading.value, spec);
            let risk = (deviation * 2.0).min(1.0);
            total_risk += risk * spec.weight;
            total_weight += spec.weight;
        }

        let mut index = if total_weight > 0.0 {
            (total_risk / total_weight) * 100.0
        } else {
            0.0
        };

        if let Some(provider) = &self.secondary {
            if let Some(wqi) = provider.quality_index() {
                let wqi_normalized = ((wqi - 7.0) / 1.5) * 100.0;
                let wqi_risk = (100.0 - wqi_normalized).clamp(0.0, 100.0);
                index = index * PRIMARY_WEIGHT + wqi_risk * SECONDARY_WEIGHT;
            }
        }

        index.min(100.0).round() as u8
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Step function from index to discrete risk level.
pub fn risk_level(index: u8) -> RiskLevel {
    match index {
        0..=19 => RiskLevel::Stable,
        20..=39 => RiskLevel::Low,
        40..=59 => RiskLevel::Moderate,
        60..=79 => RiskLevel::High,
        _ => RiskLevel::Critical,
    }
}

/// Severity tier recorded in the anomaly context for a given level.
pub fn severity_for(level: RiskLevel) -> Severity {
    match level {
        RiskLevel::Stable | RiskLevel::Low => Severity::Low,
        RiskLevel::Moderate => Severity::Medium,
        RiskLevel::High => Severity::High,
        RiskLevel::Critical => Severity::Critical,
    }
}

/// Fixed operator-facing description per level.
pub fn level_description(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Stable => {
            "Water quality is within normal operating parameters. Safe for all uses."
        }
        RiskLevel::Low => {
            "Minor fluctuations detected. Continue monitoring. Safe for consumption."
        }
        RiskLevel::Moderate => {
            "Some parameters outside optimal range. Increased monitoring active."
        }
        RiskLevel::High => {
            "Significant deviations detected. Precautionary measures recommended."
        }
        RiskLevel::Critical => {
            "SEVERE WARNING: Critical water quality issues detected. DO NOT USE."
        }
    }
}
