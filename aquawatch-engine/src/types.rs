//! Shared types for the water-quality simulation engine.

/// The five monitored chemical/physical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterId {
    Chlorine,
    #[serde(rename = "pH")]
    Ph,
    Turbidity,
    Temperature,
    Lead,
}

impl ParameterId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterId::Chlorine => "chlorine",
            ParameterId::Ph => "pH",
            ParameterId::Turbidity => "turbidity",
            ParameterId::Temperature => "temperature",
            ParameterId::Lead => "lead",
        }
    }
}

/// Per-reading status, derived from deviation off the optimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Normal,
    Warning,
    Anomaly,
}

/// Discrete risk tier derived from the composite index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Stable,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Stable => "stable",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Severity carried in the anomaly context (coarser than [`RiskLevel`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Scenario category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Chemical,
    Physical,
}

/// A single parameter reading at one point in time. Immutable once produced;
/// superseded by the next tick's reading for the same parameter.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Reading {
    pub parameter: ParameterId,
    pub value: f64,
    pub unit: String,
    pub status: ReadingStatus,
    /// Unix timestamp (millis)
    pub timestamp: i64,
}

/// Why the current snapshot is (or is not) considered abnormal.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnomalyContext {
    pub is_active: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ScenarioKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_parameters: Vec<ParameterId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
}

impl AnomalyContext {
    /// Context for an unperturbed snapshot: active only when the index is elevated.
    pub fn ambient(is_active: bool, severity: Severity) -> Self {
        Self {
            is_active,
            severity,
            kind: None,
            affected_parameters: Vec::new(),
            started_at: None,
        }
    }
}

/// One engine state snapshot: the current reading per parameter plus the
/// composite risk index.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Unix timestamp (millis)
    pub timestamp: i64,
    pub readings: Vec<Reading>,
    /// Composite risk index, 0–100
    pub risk_index: u8,
    pub anomaly: AnomalyContext,
}

/// The public risk summary returned by the engine each tick.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RiskIndex {
    pub index: u8,
    pub level: RiskLevel,
    pub description: String,
    pub timestamp: i64,
}

/// One scripted attack effect: drive `parameter` toward `target` at `rate`.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ScenarioEffect {
    pub parameter: ParameterId,
    pub target: f64,
    pub rate: f64,
}

/// A scripted, time-bounded attack scenario from the static catalog.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ScenarioKind,
    /// Scenario duration in simulated minutes
    pub duration_mins: f64,
    pub effects: &'static [ScenarioEffect],
}
