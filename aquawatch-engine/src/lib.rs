//! # AquaWatch Engine — Water-quality simulation and risk scoring
//!
//! Simulates a municipal water-quality monitoring feed: synthetic
//! chemical-parameter readings evolved by a mean-reverting random walk,
//! operator-triggered attack scenarios that perturb readings over time, a
//! weighted composite risk index, and a bounded history for trend queries.
//!
//! Control flow: a periodic tick ([`runner`]) advances the generator
//! ([`generator`]) under the scenario state machine ([`scenario`]), feeds the
//! scorer ([`scorer`]), and appends the snapshot to history ([`history`]).
//! [`engine::WaterEngine`] owns all of it behind one lock.

pub mod advisory;
pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod generator;
pub mod history;
pub mod params;
pub mod runner;
pub mod scenario;
pub mod scorer;
pub mod types;

pub use engine::{Clock, SystemClock, WaterEngine};
pub use error::{EngineError, EngineResult};
pub use scorer::{QualityIndexProvider, RiskScorer};
pub use types::{Reading, RiskIndex, RiskLevel, Severity, Snapshot};
