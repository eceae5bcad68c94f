//! Guardrail limits and runtime readings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named guardrail limit.
///
/// The limit defines the threshold; the observed value lives in a separate
/// runtime metric series under `{key}.current` (most recent record wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    /// Limit key, e.g. `"ltv"`, `"hf"`, `"slippage"`, `"realyield"`.
    pub key: String,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Limit {
    /// Create a limit without notes.
    pub fn new(key: impl Into<String>, value: Decimal) -> Self {
        Self {
            key: key.into(),
            value,
            notes: None,
        }
    }
}

/// Current runtime guardrail metrics consumed by the scoring engine.
///
/// A metric that has never been recorded reads as zero, which means the
/// health-factor and real-yield guardrails breach until the first metric
/// lands. Callers that want a different policy must substitute readings
/// before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailReadings {
    /// Current health factor (`hf.current`).
    #[serde(default)]
    pub hf: Decimal,
    /// Current observed slippage (`slippage.current`).
    #[serde(default)]
    pub slippage: Decimal,
    /// Current observed real yield (`realyield.current`).
    #[serde(default)]
    pub real_yield: Decimal,
}
