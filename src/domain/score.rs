//! Scoring result types.
//!
//! The scoring engine reduces an opportunity plus its market context to a
//! 0-100 composite score, a consensus fraction, and the set of breached
//! guardrails. These types carry that result between the engine, the
//! persistence collaborator, and the audit log.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::opportunity::Opportunity;

/// A guardrail breached by an opportunity's sizing or the current runtime
/// metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardrailBreach {
    /// Notional sizing above the loan-to-value bound.
    Ltv,
    /// Health factor below the liquidation-safety bound.
    Hf,
    /// Observed slippage above the execution bound.
    Slippage,
    /// Observed real yield below the carry bound.
    RealYield,
}

impl GuardrailBreach {
    /// Display name used in blocking lists and audit notes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ltv => "LTV",
            Self::Hf => "HF",
            Self::Slippage => "Slippage",
            Self::RealYield => "RealYield",
        }
    }
}

impl fmt::Display for GuardrailBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-step contributions to a composite score.
///
/// Exposed so callers can explain a score: the composite is
/// `clamp(base + consensus_adj - guardrail_penalty - var_penalty, 0, 100)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Prior from the linked signal's severity.
    pub base: i64,
    /// Adjustment from the consensus fraction.
    pub consensus_adj: i64,
    /// Penalty from distinct guardrail breaches.
    pub guardrail_penalty: i64,
    /// Penalty from value-at-risk as a fraction of NAV.
    pub var_penalty: i64,
}

/// Output of one scoring-engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Composite score, clamped to `[0, 100]`.
    pub score: u8,
    /// Directional agreement fraction in `[0, 1]`.
    pub consensus: f64,
    /// Distinct breached guardrails, in evaluation order.
    pub blocking: Vec<GuardrailBreach>,
    /// Per-step contributions behind `score`.
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult {
    /// Blocking guardrail names, for notes and API payloads.
    #[must_use]
    pub fn blocking_names(&self) -> Vec<&'static str> {
        self.blocking.iter().map(|b| b.name()).collect()
    }

    /// The derived values persisted onto the opportunity and audited.
    #[must_use]
    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            consensus: self.consensus,
            blocking: self.blocking.clone(),
        }
    }
}

/// The persisted derived values of a scoring run.
///
/// Stored on the opportunity record and recorded (previous vs. current) in
/// audit entries. The breakdown is deliberately not persisted; it is
/// recomputable from the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u8,
    pub consensus: f64,
    pub blocking: Vec<GuardrailBreach>,
}

/// An opportunity paired with its freshly computed score.
///
/// Produced by the list operation; ranking sorts these without touching
/// the underlying records.
#[derive(Debug, Clone)]
pub struct ScoredOpportunity {
    pub opportunity: Opportunity,
    pub result: ScoreResult,
}
