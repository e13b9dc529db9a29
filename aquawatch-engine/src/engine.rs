//! The water-quality engine: owns the current snapshot, the active
//! perturbation and the history buffer, and advances them on each tick.
//!
//! All engine state lives behind a single write lock, so an operator command
//! (trigger, reset, force) either fully precedes or fully follows a tick —
//! commands never interleave with snapshot computation.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::generator;
use crate::history::HistoryBuffer;
use crate::params;
use crate::scenario::{self, ActivePerturbation};
use crate::scorer::{self, RiskScorer};
use crate::types::{
    AnomalyContext, ParameterId, Reading, ReadingStatus, RiskIndex, Scenario, ScenarioKind,
    Snapshot,
};

/// Millisecond clock. Injectable so tests advance simulated time instead of
/// waiting on real timers.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

struct EngineState {
    current: Snapshot,
    active: Option<ActivePerturbation>,
    history: HistoryBuffer,
}

/// The simulation and risk-scoring engine.
pub struct WaterEngine {
    state: RwLock<EngineState>,
    scorer: RiskScorer,
    clock: Arc<dyn Clock>,
}

impl WaterEngine {
    /// Build an engine with a fresh baseline snapshot and an empty history.
    pub fn new(scorer: RiskScorer, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_ms();
        let readings = generator::baseline_readings(now);
        let current = Self::ambient_snapshot(&scorer, readings, now);
        Self {
            state: RwLock::new(EngineState {
                current,
                active: None,
                history: HistoryBuffer::new(),
            }),
            scorer,
            clock,
        }
    }

    /// Synthesize `days * points_per_day` hourly-spaced historical points by
    /// running the ambient drift formula forward from `now - days`, so trend
    /// queries have data immediately on startup. Current state is reset to a
    /// fresh baseline afterwards.
    pub fn prepopulate_history(&self, days: u32, points_per_day: u32) {
        let now = self.clock.now_ms();
        let total_points = (days * points_per_day) as i64;
        let base = now - days as i64 * 24 * 60 * 60 * 1000;

        let mut state = self.state.write();
        let mut readings = generator::baseline_readings(base);
        for i in 0..total_points {
            let ts = base + i * 60 * 60 * 1000;
            readings = generator::drift_step(&readings, ts);
            let snapshot = Self::ambient_snapshot(&self.scorer, readings.clone(), ts);
            state.history.push(snapshot);
        }

        state.current = Self::ambient_snapshot(&self.scorer, generator::baseline_readings(now), now);
        info!(points = total_points, days, "History pre-populated");
    }

    /// Advance the simulation by one tick: drift, attack or recovery
    /// depending on the perturbation state, then score, store and append.
    pub fn tick(&self) {
        let now = self.clock.now_ms();
        let mut state = self.state.write();

        let active = state.active;
        let snapshot = match active {
            Some(active) if !active.expired(now) => {
                let readings = generator::attack_step(&state.current.readings, &active, now);
                let index = self.scorer.score(&readings);
                let level = scorer::risk_level(index);
                Snapshot {
                    timestamp: now,
                    readings,
                    risk_index: index,
                    anomaly: AnomalyContext {
                        is_active: true,
                        severity: scorer::severity_for(level),
                        kind: Some(active.scenario.kind),
                        affected_parameters: active.affected_parameters(),
                        started_at: Some(active.started_at),
                    },
                }
            }
            Some(active) => {
                // Duration elapsed: the perturbation ends and this tick runs
                // recovery; subsequent ticks return to ambient drift.
                debug!(scenario = active.scenario.id, "Scenario expired, beginning recovery");
                state.active = None;
                let readings = generator::recovery_step(&state.current.readings, now);
                Self::ambient_snapshot(&self.scorer, readings, now)
            }
            None => {
                let readings = generator::drift_step(&state.current.readings, now);
                Self::ambient_snapshot(&self.scorer, readings, now)
            }
        };

        if snapshot.risk_index >= 80 {
            warn!(index = snapshot.risk_index, "Risk index critical");
        }

        state.current = snapshot.clone();
        state.history.push(snapshot);
    }

    // ── Operator commands ───────────────────────────────────────────────────

    /// Activate a catalog scenario. Returns `false` (state untouched) for an
    /// unknown id; replaces any currently active scenario otherwise.
    pub fn trigger_scenario(&self, scenario_id: &str) -> bool {
        let scenario = match scenario::find_scenario(scenario_id) {
            Some(s) => s,
            None => return false,
        };
        let now = self.clock.now_ms();
        let mut state = self.state.write();
        state.active = Some(ActivePerturbation::new(scenario, now));
        info!(scenario = scenario.id, "Scenario triggered");
        true
    }

    /// Clear any active scenario and regenerate a fresh baseline snapshot,
    /// discarding in-flight perturbation momentum.
    pub fn reset_to_baseline(&self) {
        let now = self.clock.now_ms();
        let mut state = self.state.write();
        state.active = None;
        state.current = Self::ambient_snapshot(&self.scorer, generator::baseline_readings(now), now);
        info!("Engine reset to baseline");
    }

    /// Demo hook: write a synthetic critical snapshot directly to current
    /// state and history. The computed index is overridden into [85, 90]
    /// regardless of what the scorer produces for these readings. Does not
    /// touch an in-progress scenario.
    pub fn force_critical(&self) {
        let now = self.clock.now_ms();
        let values = [
            (ParameterId::Ph, 9.0),
            (ParameterId::Chlorine, 1.3),
            (ParameterId::Turbidity, 1.8),
            (ParameterId::Temperature, 23.5),
            (ParameterId::Lead, 0.020),
        ];
        let readings: Vec<Reading> = values
            .iter()
            .map(|&(id, value)| {
                let spec = params::spec(id);
                let value = params::round_to_precision(value, spec.precision);
                Reading {
                    parameter: id,
                    value,
                    unit: spec.unit.to_string(),
                    status: params::classify(value, spec),
                    timestamp: now,
                }
            })
            .collect();

        let index = self.scorer.score(&readings).clamp(85, 90);
        let affected = readings
            .iter()
            .filter(|r| r.status == ReadingStatus::Anomaly)
            .map(|r| r.parameter)
            .collect();

        let snapshot = Snapshot {
            timestamp: now,
            readings,
            risk_index: index,
            anomaly: AnomalyContext {
                is_active: true,
                severity: crate::types::Severity::Critical,
                kind: Some(ScenarioKind::Chemical),
                affected_parameters: affected,
                started_at: Some(now),
            },
        };

        let mut state = self.state.write();
        state.current = snapshot.clone();
        state.history.push(snapshot);
        warn!(index, "Forced critical state");
    }

    /// Demo hook: write an all-normal snapshot directly to current state and
    /// history. Does not touch an in-progress scenario.
    pub fn force_stable(&self) {
        let now = self.clock.now_ms();
        let values = [
            (ParameterId::Ph, 7.5),
            (ParameterId::Chlorine, 1.0),
            (ParameterId::Turbidity, 0.3),
            (ParameterId::Temperature, 20.0),
            (ParameterId::Lead, 0.005),
        ];
        let readings: Vec<Reading> = values
            .iter()
            .map(|&(id, value)| {
                let spec = params::spec(id);
                Reading {
                    parameter: id,
                    value,
                    unit: spec.unit.to_string(),
                    status: ReadingStatus::Normal,
                    timestamp: now,
                }
            })
            .collect();

        let index = self.scorer.score(&readings);
        let snapshot = Snapshot {
            timestamp: now,
            readings,
            risk_index: index,
            anomaly: AnomalyContext::ambient(false, crate::types::Severity::Low),
        };

        let mut state = self.state.write();
        state.current = snapshot.clone();
        state.history.push(snapshot);
        info!(index, "Forced stable state");
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn current_state(&self) -> Snapshot {
        self.state.read().current.clone()
    }

    /// Current index, level, and the fixed per-level description.
    pub fn risk_index(&self) -> RiskIndex {
        let state = self.state.read();
        let index = state.current.risk_index;
        let level = scorer::risk_level(index);
        RiskIndex {
            index,
            level,
            description: scorer::level_description(level).to_string(),
            timestamp: state.current.timestamp,
        }
    }

    /// The most recent `limit` snapshots, oldest-to-newest.
    pub fn history(&self, limit: usize) -> Vec<Snapshot> {
        self.state.read().history.last_n(limit)
    }

    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    /// The read-only scenario catalog.
    pub fn scenarios(&self) -> &'static [Scenario] {
        scenario::SCENARIOS
    }

    /// Whether a perturbation is currently active.
    pub fn has_active_scenario(&self) -> bool {
        self.state.read().active.is_some()
    }

    fn ambient_snapshot(scorer: &RiskScorer, readings: Vec<Reading>, now: i64) -> Snapshot {
        let index = scorer.score(&readings);
        let level = scorer::risk_level(index);
        Snapshot {
            timestamp: now,
            readings,
            risk_index: index,
            anomaly: AnomalyContext::ambient(index > 60, scorer::severity_for(level)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAPACITY;
    use parking_lot::Mutex;

    /// Test clock advanced manually in simulated milliseconds.
    pub struct ManualClock {
        now: Mutex<i64>,
    }

    impl ManualClock {
        pub fn new(start: i64) -> Self {
            Self { now: Mutex::new(start) }
        }

        pub fn advance_mins(&self, mins: i64) {
            *self.now.lock() += mins * 60_000;
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            *self.now.lock()
        }
    }

    fn engine_with_clock() -> (Arc<ManualClock>, WaterEngine) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let engine = WaterEngine::new(RiskScorer::new(), clock.clone());
        (clock, engine)
    }

    #[test]
    fn test_baseline_state_is_scored() {
        let (_, engine) = engine_with_clock();
        let state = engine.current_state();
        assert_eq!(state.readings.len(), 5);
        assert!(state.risk_index <= 100);
    }

    #[test]
    fn test_unknown_scenario_is_rejected_without_side_effects() {
        let (_, engine) = engine_with_clock();
        let before = engine.current_state();
        assert!(!engine.trigger_scenario("no-such-scenario"));
        assert!(!engine.has_active_scenario());
        let after = engine.current_state();
        assert_eq!(before.timestamp, after.timestamp);
        assert_eq!(before.risk_index, after.risk_index);
    }

    #[test]
    fn test_scenario_runs_then_recovers() {
        let (clock, engine) = engine_with_clock();
        assert!(engine.trigger_scenario("chlorine-attack"));

        // Mid-scenario ticks carry the attack context.
        for _ in 0..10 {
            clock.advance_mins(1);
            engine.tick();
        }
        let mid = engine.current_state();
        assert!(mid.anomaly.is_active);
        assert_eq!(mid.anomaly.kind, Some(ScenarioKind::Chemical));
        assert_eq!(
            mid.anomaly.affected_parameters,
            vec![ParameterId::Chlorine, ParameterId::Ph]
        );
        assert!(mid.anomaly.started_at.is_some());

        // Past the 20-minute duration: the expiry tick runs recovery and the
        // context reflects the new index, not the stale attack flag.
        clock.advance_mins(15);
        engine.tick();
        let post = engine.current_state();
        assert!(!engine.has_active_scenario());
        assert_eq!(post.anomaly.kind, None);
        assert_eq!(post.anomaly.is_active, post.risk_index > 60);
    }

    #[test]
    fn test_trigger_replaces_active_scenario() {
        let (clock, engine) = engine_with_clock();
        assert!(engine.trigger_scenario("chemical-attack"));
        clock.advance_mins(5);
        assert!(engine.trigger_scenario("temperature-attack"));
        clock.advance_mins(1);
        engine.tick();
        let state = engine.current_state();
        assert_eq!(state.anomaly.kind, Some(ScenarioKind::Physical));
        assert_eq!(
            state.anomaly.affected_parameters,
            vec![ParameterId::Temperature, ParameterId::Chlorine]
        );
    }

    #[test]
    fn test_reset_clears_scenario_and_restores_baseline() {
        let (clock, engine) = engine_with_clock();
        assert!(engine.trigger_scenario("chemical-attack"));
        clock.advance_mins(10);
        engine.tick();
        assert!(engine.has_active_scenario());

        engine.reset_to_baseline();
        assert!(!engine.has_active_scenario());
        let state = engine.current_state();
        // Baseline values, not recovered attack values.
        let ph = state
            .readings
            .iter()
            .find(|r| r.parameter == ParameterId::Ph)
            .unwrap();
        assert_eq!(ph.value, 8.2);
    }

    #[test]
    fn test_force_critical_index_window() {
        let (_, engine) = engine_with_clock();
        engine.force_critical();
        let state = engine.current_state();
        assert!((85..=90).contains(&state.risk_index));
        assert!(state.anomaly.is_active);
        assert_eq!(state.anomaly.severity, crate::types::Severity::Critical);
        assert_eq!(state.anomaly.kind, Some(ScenarioKind::Chemical));
        assert_eq!(engine.risk_index().level, crate::types::RiskLevel::Critical);
    }

    #[test]
    fn test_force_critical_leaves_scenario_alone() {
        let (_, engine) = engine_with_clock();
        assert!(engine.trigger_scenario("chemical-attack"));
        engine.force_critical();
        assert!(engine.has_active_scenario());
    }

    #[test]
    fn test_force_stable_scores_low() {
        let (_, engine) = engine_with_clock();
        engine.force_critical();
        engine.force_stable();
        let state = engine.current_state();
        assert!(state.risk_index < 20);
        assert!(!state.anomaly.is_active);
        assert!(state.readings.iter().all(|r| r.status == ReadingStatus::Normal));
    }

    #[test]
    fn test_prepopulated_history_is_hourly() {
        let (_, engine) = engine_with_clock();
        engine.prepopulate_history(2, 24);
        assert_eq!(engine.history_len(), 48);
        let history = engine.history(48);
        for pair in history.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 60 * 60 * 1000);
        }
    }

    #[test]
    fn test_history_capacity_via_ticks() {
        let (clock, engine) = engine_with_clock();
        for _ in 0..(HISTORY_CAPACITY + 1) {
            clock.advance_mins(1);
            engine.tick();
        }
        assert_eq!(engine.history_len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_risk_index_description_matches_level() {
        let (_, engine) = engine_with_clock();
        engine.force_stable();
        let ri = engine.risk_index();
        assert_eq!(ri.level, crate::types::RiskLevel::Stable);
        assert!(ri.description.contains("normal operating parameters"));
    }
}
