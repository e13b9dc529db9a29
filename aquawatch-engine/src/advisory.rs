//! Health advisory and public status text for the community-facing feed.
//!
//! Pure functions of the risk level and current readings; the boundary layer
//! decides how to render them.

use crate::engine::WaterEngine;
use crate::types::{ParameterId, Reading, ReadingStatus, RiskIndex, RiskLevel};

/// Operator guidance attached to the public status.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthAdvisory {
    pub message: String,
    pub instructions: String,
    /// Unix timestamp (millis)
    pub updated_at: i64,
}

/// The aggregate consumed by the public status endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PublicStatus {
    pub overall_risk: RiskIndex,
    pub readings: Vec<Reading>,
    pub advisory: HealthAdvisory,
    /// Unix timestamp (millis)
    pub last_updated: i64,
}

/// Assemble the full public status from the engine's current state.
pub fn public_status(engine: &WaterEngine) -> PublicStatus {
    let state = engine.current_state();
    let risk = engine.risk_index();
    let advisory = advisory_for(risk.level, &state.readings, state.timestamp);
    PublicStatus {
        overall_risk: risk,
        readings: state.readings,
        advisory,
        last_updated: state.timestamp,
    }
}

/// Advisory text for a level. Critical picks a more specific message when a
/// particular parameter breached badly.
pub fn advisory_for(level: RiskLevel, readings: &[Reading], now_ms: i64) -> HealthAdvisory {
    let anomalies: Vec<&Reading> = readings
        .iter()
        .filter(|r| r.status == ReadingStatus::Anomaly)
        .collect();

    let (message, instructions) = match level {
        RiskLevel::Stable => (
            "Water quality in your area currently indicates normal risk. Continue to monitor updates for any changes.".to_string(),
            "SAFE FOR ALL USES. Continue consumption, bathing, and washing as normal.",
        ),
        RiskLevel::Low => (
            "Water quality in your area currently indicates low risk. Continue to monitor updates for any changes.".to_string(),
            "SAFE FOR DRINKING. Elevated monitoring initiated. Minor, non-critical fluctuations detected.",
        ),
        RiskLevel::Moderate => (
            "Some water quality parameters are outside optimal range. Increased monitoring is active.".to_string(),
            "SAFE FOR BATHING/WASHING ONLY. Limit non-essential consumption. Water treatment is less effective.",
        ),
        RiskLevel::High => (
            "Significant water quality deviations have been detected. Precautionary measures are recommended.".to_string(),
            "BOIL WATER ORDER IN EFFECT. DO NOT DRINK or use for cooking. Bathing/Washing OK, but monitor.",
        ),
        RiskLevel::Critical => {
            let message = if anomalies.iter().any(|r| r.parameter == ParameterId::Ph && r.value > 8.5) {
                "Critical water quality issues have been detected. The local utility is taking immediate action. Please seek guidance from local authorities and refrain from use until further notice."
            } else if anomalies.iter().any(|r| r.parameter == ParameterId::Chlorine && r.value > 2.5) {
                "Water quality parameters are outside safe operating limits. The utility is investigating and taking corrective measures. Do not use water until further notice."
            } else if anomalies.iter().any(|r| r.parameter == ParameterId::Turbidity && r.value > 2.0) {
                "Water filtration issues detected. Water may contain suspended particles. Do not use for consumption until the utility resolves the issue."
            } else {
                "SEVERE WARNING: Critical water quality issues have been detected. The local utility is investigating and taking immediate action."
            };
            (
                message.to_string(),
                "UNSAFE FOR ALL USES. DO NOT DRINK, COOK, OR BATHE. Seek guidance from local authorities.",
            )
        }
    };

    HealthAdvisory {
        message,
        instructions: instructions.to_string(),
        updated_at: now_ms,
    }
}

/// Human-readable parameter name for display layers.
pub fn display_name(parameter: ParameterId) -> &'static str {
    match parameter {
        ParameterId::Chlorine => "Chlorine Residual",
        ParameterId::Ph => "pH Level",
        ParameterId::Turbidity => "Turbidity",
        ParameterId::Temperature => "Water Temperature",
        ParameterId::Lead => "Lead Concentration",
    }
}

/// Status badge text per level.
pub fn badge_text(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Stable => "Normal Risk",
        RiskLevel::Low => "Low Risk",
        RiskLevel::Moderate => "Moderate Risk",
        RiskLevel::High => "High Alert",
        RiskLevel::Critical => "SEVERE WARNING: DANGER",
    }
}

/// Badge hex color per level.
pub fn level_color(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Stable => "#10b981",
        RiskLevel::Low => "#f59e0b",
        RiskLevel::Moderate => "#f97316",
        RiskLevel::High => "#ef4444",
        RiskLevel::Critical => "#dc2626",
    }
}
