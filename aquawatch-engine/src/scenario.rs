//! Attack scenario catalog and the active-perturbation state machine.
//!
//! The catalog is static and read-only at runtime. At most one perturbation
//! is active at a time; it exists only between a trigger call and either its
//! duration elapsing or an explicit reset.

use crate::types::{ParameterId, Scenario, ScenarioEffect, ScenarioKind};

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "chemical-attack",
        name: "Chemical Attack",
        kind: ScenarioKind::Chemical,
        duration_mins: 30.0,
        effects: &[
            ScenarioEffect { parameter: ParameterId::Ph, target: 12.5, rate: 0.15 },
            ScenarioEffect { parameter: ParameterId::Chlorine, target: 3.8, rate: 0.1 },
        ],
    },
    Scenario {
        id: "chlorine-attack",
        name: "Chlorine Attack",
        kind: ScenarioKind::Chemical,
        duration_mins: 20.0,
        effects: &[
            ScenarioEffect { parameter: ParameterId::Chlorine, target: 4.5, rate: 0.2 },
            ScenarioEffect { parameter: ParameterId::Ph, target: 6.5, rate: 0.08 },
        ],
    },
    Scenario {
        id: "filtration-attack",
        name: "Filtration Attack",
        kind: ScenarioKind::Physical,
        duration_mins: 45.0,
        effects: &[
            ScenarioEffect { parameter: ParameterId::Turbidity, target: 8.5, rate: 0.18 },
            ScenarioEffect { parameter: ParameterId::Lead, target: 0.025, rate: 0.0005 },
        ],
    },
    Scenario {
        id: "temperature-attack",
        name: "Temperature Attack",
        kind: ScenarioKind::Physical,
        duration_mins: 25.0,
        effects: &[
            ScenarioEffect { parameter: ParameterId::Temperature, target: 32.0, rate: 0.4 },
            ScenarioEffect { parameter: ParameterId::Chlorine, target: 0.1, rate: 0.05 },
        ],
    },
];

/// Look up a catalog scenario by id.
pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

/// A triggered scenario plus its start time.
#[derive(Debug, Clone, Copy)]
pub struct ActivePerturbation {
    pub scenario: &'static Scenario,
    /// Unix timestamp (millis) of the trigger
    pub started_at: i64,
}

impl ActivePerturbation {
    pub fn new(scenario: &'static Scenario, started_at: i64) -> Self {
        Self { scenario, started_at }
    }

    /// Simulated minutes since the trigger.
    pub fn elapsed_mins(&self, now_ms: i64) -> f64 {
        (now_ms - self.started_at) as f64 / 60_000.0
    }

    /// Whether the scenario's duration has fully elapsed.
    pub fn expired(&self, now_ms: i64) -> bool {
        self.elapsed_mins(now_ms) >= self.scenario.duration_mins
    }

    /// Progression fraction in [0, 1].
    pub fn progress(&self, now_ms: i64) -> f64 {
        (self.elapsed_mins(now_ms) / self.scenario.duration_mins).min(1.0)
    }

    /// Parameter ids this scenario perturbs.
    pub fn affected_parameters(&self) -> Vec<ParameterId> {
        self.scenario.effects.iter().map(|e| e.parameter).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert!(find_scenario("chemical-attack").is_some());
        assert!(find_scenario("chlorine-attack").is_some());
        assert!(find_scenario("no-such-scenario").is_none());
    }

    #[test]
    fn test_perturbation_lifecycle() {
        let scenario = find_scenario("chlorine-attack").unwrap();
        let active = ActivePerturbation::new(scenario, 0);

        assert!(!active.expired(10 * 60_000));
        assert!((active.elapsed_mins(10 * 60_000) - 10.0).abs() < 1e-9);
        assert!((active.progress(10 * 60_000) - 0.5).abs() < 1e-9);

        // At exactly the duration boundary the scenario is over.
        assert!(active.expired(20 * 60_000));
        assert!((active.progress(25 * 60_000) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_affected_parameters() {
        let scenario = find_scenario("filtration-attack").unwrap();
        let active = ActivePerturbation::new(scenario, 0);
        assert_eq!(
            active.affected_parameters(),
            vec![ParameterId::Turbidity, ParameterId::Lead]
        );
    }
}
