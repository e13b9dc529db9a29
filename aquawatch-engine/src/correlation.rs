//! Correlates externally detected anomalies with catalog scenarios.
//!
//! An upstream detector (ML pipeline, SCADA feed) reports an anomaly context;
//! this module maps it to the closest scripted scenario and triggers it so
//! the simulated feed reflects the detection.

use tracing::info;

use crate::engine::WaterEngine;
use crate::types::Severity;

/// Kind of an externally reported anomaly. Broader than the scenario catalog:
/// cyber/network detections are folded into a chemical scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalAnomalyKind {
    Chemical,
    Physical,
    Cyber,
    Network,
}

/// Anomaly context supplied by an external detector.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExternalAnomaly {
    pub is_active: bool,
    pub kind: ExternalAnomalyKind,
    pub severity: Severity,
}

/// The catalog scenario id matching an external anomaly, if any.
pub fn scenario_for(anomaly: &ExternalAnomaly) -> Option<&'static str> {
    let severe = matches!(anomaly.severity, Severity::Critical | Severity::High);
    match anomaly.kind {
        ExternalAnomalyKind::Chemical => {
            Some(if severe { "chemical-attack" } else { "chlorine-attack" })
        }
        ExternalAnomalyKind::Physical => {
            Some(if severe { "filtration-attack" } else { "temperature-attack" })
        }
        ExternalAnomalyKind::Cyber | ExternalAnomalyKind::Network => Some("chemical-attack"),
    }
}

/// Trigger the scenario matching an external anomaly. Inactive anomalies are
/// ignored.
pub fn process_anomaly(engine: &WaterEngine, anomaly: &ExternalAnomaly) {
    if !anomaly.is_active {
        return;
    }
    if let Some(id) = scenario_for(anomaly) {
        if engine.trigger_scenario(id) {
            info!(scenario = id, kind = ?anomaly.kind, "External anomaly correlated to scenario");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SystemClock, WaterEngine};
    use crate::scorer::RiskScorer;
    use std::sync::Arc;

    fn anomaly(kind: ExternalAnomalyKind, severity: Severity) -> ExternalAnomaly {
        ExternalAnomaly { is_active: true, kind, severity }
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(
            scenario_for(&anomaly(ExternalAnomalyKind::Chemical, Severity::Critical)),
            Some("chemical-attack")
        );
        assert_eq!(
            scenario_for(&anomaly(ExternalAnomalyKind::Chemical, Severity::Medium)),
            Some("chlorine-attack")
        );
        assert_eq!(
            scenario_for(&anomaly(ExternalAnomalyKind::Physical, Severity::High)),
            Some("filtration-attack")
        );
        assert_eq!(
            scenario_for(&anomaly(ExternalAnomalyKind::Physical, Severity::Low)),
            Some("temperature-attack")
        );
        assert_eq!(
            scenario_for(&anomaly(ExternalAnomalyKind::Cyber, Severity::Low)),
            Some("chemical-attack")
        );
        assert_eq!(
            scenario_for(&anomaly(ExternalAnomalyKind::Network, Severity::Critical)),
            Some("chemical-attack")
        );
    }

    #[test]
    fn test_inactive_anomaly_is_ignored() {
        let engine = WaterEngine::new(RiskScorer::new(), Arc::new(SystemClock));
        let mut inactive = anomaly(ExternalAnomalyKind::Chemical, Severity::Critical);
        inactive.is_active = false;
        process_anomaly(&engine, &inactive);
        assert!(!engine.has_active_scenario());
    }

    #[test]
    fn test_active_anomaly_triggers_scenario() {
        let engine = WaterEngine::new(RiskScorer::new(), Arc::new(SystemClock));
        process_anomaly(&engine, &anomaly(ExternalAnomalyKind::Physical, Severity::Critical));
        assert!(engine.has_active_scenario());
    }
}
