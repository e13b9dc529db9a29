//! Reading generator: baseline synthesis, ambient drift, attack-effect
//! application and post-attack recovery.
//!
//! Every path rounds to the parameter's configured precision and re-derives
//! status through the catalog classification rule, so a stored reading is
//! always consistent with its value.

use crate::params::{self, PARAMETERS};
use crate::scenario::ActivePerturbation;
use crate::types::Reading;

/// Mean-reversion pull applied per ambient tick.
const DRIFT_RATE: f64 = 0.015;
/// Noise amplitude as a fraction of the parameter's normal range.
const NOISE_SCALE: f64 = 0.15;
/// Mean-reversion pull applied during the recovery tick.
const RECOVERY_RATE: f64 = 0.02;

fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Fresh baseline readings at fixed per-parameter starting values.
pub fn baseline_readings(now_ms: i64) -> Vec<Reading> {
    PARAMETERS
        .iter()
        .map(|spec| {
            let value = params::round_to_precision(spec.baseline, spec.precision);
            Reading {
                parameter: spec.id,
                value,
                unit: spec.unit.to_string(),
                status: params::classify(value, spec),
                timestamp: now_ms,
            }
        })
        .collect()
}

/// One ambient tick: mean-reverting random walk, clamped to
/// `[0.85*min, 1.15*max]`. The clamp band is load-bearing: downstream status
/// classification assumes values never leave it under ambient drift.
pub fn drift_step(previous: &[Reading], now_ms: i64) -> Vec<Reading> {
    previous
        .iter()
        .map(|reading| {
            let spec = params::spec(reading.parameter);
            let drift = (spec.optimal - reading.value) * DRIFT_RATE;
            let noise = (rand::random::<f64>() - 0.5) * NOISE_SCALE * (spec.max - spec.min);
            let next = clamp(reading.value + drift + noise, spec.min * 0.85, spec.max * 1.15);
            let value = params::round_to_precision(next, spec.precision);
            Reading {
                parameter: reading.parameter,
                value,
                unit: reading.unit.clone(),
                status: params::classify(next, spec),
                timestamp: now_ms,
            }
        })
        .collect()
}

/// One perturbed tick: parameters with a matching effect move toward the
/// effect's target; the rest pass through with a refreshed timestamp. The
/// clamp widens to `[0.5*min, 2*max]` so values can leave the normal band.
pub fn attack_step(previous: &[Reading], active: &ActivePerturbation, now_ms: i64) -> Vec<Reading> {
    let progress = active.progress(now_ms);
    previous
        .iter()
        .map(|reading| {
            let effect = active
                .scenario
                .effects
                .iter()
                .find(|e| e.parameter == reading.parameter);
            let effect = match effect {
                Some(e) => e,
                None => {
                    let mut unchanged = reading.clone();
                    unchanged.timestamp = now_ms;
                    return unchanged;
                }
            };

            let spec = params::spec(reading.parameter);
            let next = reading.value + (effect.target - reading.value) * progress * effect.rate;
            let next = clamp(next, spec.min * 0.5, spec.max * 2.0);
            let value = params::round_to_precision(next, spec.precision);
            Reading {
                parameter: reading.parameter,
                value,
                unit: reading.unit.clone(),
                status: params::classify(next, spec),
                timestamp: now_ms,
            }
        })
        .collect()
}

/// One recovery tick: pull every parameter toward optimal with no noise,
/// clamped back inside the normal `[min, max]` band.
pub fn recovery_step(previous: &[Reading], now_ms: i64) -> Vec<Reading> {
    previous
        .iter()
        .map(|reading| {
            let spec = params::spec(reading.parameter);
            let next = reading.value + (spec.optimal - reading.value) * RECOVERY_RATE;
            let next = clamp(next, spec.min, spec.max);
            let value = params::round_to_precision(next, spec.precision);
            Reading {
                parameter: reading.parameter,
                value,
                unit: reading.unit.clone(),
                status: params::classify(next, spec),
                timestamp: now_ms,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::find_scenario;
    use crate::types::ParameterId;

    #[test]
    fn test_drift_stays_in_band() {
        let mut readings = baseline_readings(0);
        for tick in 1..200 {
            readings = drift_step(&readings, tick * 60_000);
            for r in &readings {
                let spec = params::spec(r.parameter);
                // Stored values are rounded after clamping, so allow half a
                // display step either side of the band.
                let tol = 0.5 * 10f64.powi(-spec.precision);
                assert!(
                    r.value >= spec.min * 0.85 - tol && r.value <= spec.max * 1.15 + tol,
                    "{} = {} left the drift band",
                    r.parameter.as_str(),
                    r.value
                );
            }
        }
    }

    #[test]
    fn test_attack_stays_in_widened_band() {
        let scenario = find_scenario("chemical-attack").unwrap();
        let active = ActivePerturbation::new(scenario, 0);
        let mut readings = baseline_readings(0);
        for tick in 1..30 {
            readings = attack_step(&readings, &active, tick * 60_000);
            for r in &readings {
                let spec = params::spec(r.parameter);
                let tol = 0.5 * 10f64.powi(-spec.precision);
                assert!(r.value >= spec.min * 0.5 - tol && r.value <= spec.max * 2.0 + tol);
            }
        }
    }

    #[test]
    fn test_attack_moves_targets_and_passes_others_through() {
        let scenario = find_scenario("chemical-attack").unwrap();
        let active = ActivePerturbation::new(scenario, 0);
        let before = baseline_readings(0);
        // Well into the scenario so progress is meaningful.
        let after = attack_step(&before, &active, 15 * 60_000);

        let ph_before = before.iter().find(|r| r.parameter == ParameterId::Ph).unwrap();
        let ph_after = after.iter().find(|r| r.parameter == ParameterId::Ph).unwrap();
        assert!(ph_after.value > ph_before.value, "pH should rise toward 12.5");

        let lead_before = before.iter().find(|r| r.parameter == ParameterId::Lead).unwrap();
        let lead_after = after.iter().find(|r| r.parameter == ParameterId::Lead).unwrap();
        assert_eq!(lead_after.value, lead_before.value);
        assert_eq!(lead_after.timestamp, 15 * 60_000);
    }

    #[test]
    fn test_recovery_stays_in_normal_band() {
        // Start from perturbed values outside the normal range.
        let mut readings = baseline_readings(0);
        for r in &mut readings {
            let spec = params::spec(r.parameter);
            r.value = spec.max * 1.5;
        }
        let recovered = recovery_step(&readings, 60_000);
        for r in &recovered {
            let spec = params::spec(r.parameter);
            assert!(r.value >= spec.min && r.value <= spec.max);
        }
    }

    #[test]
    fn test_recovery_pulls_toward_optimal() {
        let readings = baseline_readings(0);
        let recovered = recovery_step(&readings, 60_000);
        for (before, after) in readings.iter().zip(&recovered) {
            let spec = params::spec(before.parameter);
            let d_before = (before.value - spec.optimal).abs();
            let d_after = (after.value - spec.optimal).abs();
            assert!(d_after <= d_before + 1e-9);
        }
    }
}
