//! Opportunity scoring engine.
//!
//! Reduces an opportunity plus its market context to a composite score:
//! a severity prior from the linked signal, a consensus adjustment from
//! directionally-agreeing signals, a penalty per breached guardrail, and a
//! value-at-risk penalty, clamped to `[0, 100]`.
//!
//! [`score_opportunity`] is a pure function of already-fetched inputs; the
//! caller owns the signal window query, the runtime metric lookups, and any
//! persistence of the result. Identical inputs always produce identical
//! output.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ConfigError;

use super::limit::GuardrailReadings;
use super::opportunity::{Opportunity, Sizing};
use super::score::{GuardrailBreach, ScoreBreakdown, ScoreResult};
use super::signal::{Severity, Signal, Stance};

/// Configuration for the scoring engine.
///
/// Every band and bound the engine applies, with the deployed values as
/// defaults. Injected by reference; the engine holds no state of its own.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Base score for a linked signal of high severity.
    #[serde(default = "default_base_high")]
    pub base_high: i64,

    /// Base score for a linked signal of medium severity.
    #[serde(default = "default_base_medium")]
    pub base_medium: i64,

    /// Base score for a linked signal of low severity.
    #[serde(default = "default_base_low")]
    pub base_low: i64,

    /// Base score when no signal is linked or its severity is unknown.
    #[serde(default = "default_base_unlinked")]
    pub base_unlinked: i64,

    /// Trailing window, in days, of signals considered for consensus.
    #[serde(default = "default_consensus_window_days")]
    pub consensus_window_days: i64,

    /// Consensus at or above this fraction earns the strong bonus.
    #[serde(default = "default_strong_consensus")]
    pub strong_consensus: f64,

    /// Score bonus for strong consensus.
    #[serde(default = "default_strong_consensus_bonus")]
    pub strong_consensus_bonus: i64,

    /// Consensus at or above this fraction earns the weak bonus.
    #[serde(default = "default_weak_consensus")]
    pub weak_consensus: f64,

    /// Score bonus for weak consensus.
    #[serde(default = "default_weak_consensus_bonus")]
    pub weak_consensus_bonus: i64,

    /// Distinct positive sources required for the breadth boost.
    #[serde(default = "default_broad_source_count")]
    pub broad_source_count: usize,

    /// Consensus boost when enough distinct sources agree, capped at 1.0.
    #[serde(default = "default_broad_source_boost")]
    pub broad_source_boost: f64,

    /// Notional sizing above this percentage of NAV breaches `LTV`.
    #[serde(default = "default_max_notional_pct_nav")]
    pub max_notional_pct_nav: Decimal,

    /// Runtime health factor below this breaches `HF`.
    #[serde(default = "default_min_health_factor")]
    pub min_health_factor: Decimal,

    /// Runtime slippage above this breaches `Slippage`.
    #[serde(default = "default_max_slippage")]
    pub max_slippage: Decimal,

    /// Runtime real yield below this breaches `RealYield`.
    #[serde(default = "default_min_real_yield")]
    pub min_real_yield: Decimal,

    /// Score penalty per distinct breached guardrail.
    #[serde(default = "default_guardrail_penalty")]
    pub guardrail_penalty: i64,

    /// VaR/NAV strictly above this fraction takes the full penalty.
    #[serde(default = "default_var_fail_pct")]
    pub var_fail_pct: Decimal,

    /// Score penalty above the fail fraction.
    #[serde(default = "default_var_fail_penalty")]
    pub var_fail_penalty: i64,

    /// VaR/NAV strictly above this fraction takes the reduced penalty.
    #[serde(default = "default_var_warn_pct")]
    pub var_warn_pct: Decimal,

    /// Score penalty above the warn fraction.
    #[serde(default = "default_var_warn_penalty")]
    pub var_warn_penalty: i64,
}

fn default_base_high() -> i64 {
    70
}

fn default_base_medium() -> i64 {
    50
}

fn default_base_low() -> i64 {
    30
}

fn default_base_unlinked() -> i64 {
    50
}

fn default_consensus_window_days() -> i64 {
    7
}

fn default_strong_consensus() -> f64 {
    0.66
}

fn default_strong_consensus_bonus() -> i64 {
    20
}

fn default_weak_consensus() -> f64 {
    0.33
}

fn default_weak_consensus_bonus() -> i64 {
    10
}

fn default_broad_source_count() -> usize {
    3
}

fn default_broad_source_boost() -> f64 {
    0.1
}

fn default_max_notional_pct_nav() -> Decimal {
    dec!(35)
}

fn default_min_health_factor() -> Decimal {
    dec!(1.6)
}

fn default_max_slippage() -> Decimal {
    dec!(0.5)
}

fn default_min_real_yield() -> Decimal {
    dec!(0.6)
}

fn default_guardrail_penalty() -> i64 {
    20
}

fn default_var_fail_pct() -> Decimal {
    dec!(0.05)
}

fn default_var_fail_penalty() -> i64 {
    20
}

fn default_var_warn_pct() -> Decimal {
    dec!(0.03)
}

fn default_var_warn_penalty() -> i64 {
    10
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_high: default_base_high(),
            base_medium: default_base_medium(),
            base_low: default_base_low(),
            base_unlinked: default_base_unlinked(),
            consensus_window_days: default_consensus_window_days(),
            strong_consensus: default_strong_consensus(),
            strong_consensus_bonus: default_strong_consensus_bonus(),
            weak_consensus: default_weak_consensus(),
            weak_consensus_bonus: default_weak_consensus_bonus(),
            broad_source_count: default_broad_source_count(),
            broad_source_boost: default_broad_source_boost(),
            max_notional_pct_nav: default_max_notional_pct_nav(),
            min_health_factor: default_min_health_factor(),
            max_slippage: default_max_slippage(),
            min_real_yield: default_min_real_yield(),
            guardrail_penalty: default_guardrail_penalty(),
            var_fail_pct: default_var_fail_pct(),
            var_fail_penalty: default_var_fail_penalty(),
            var_warn_pct: default_var_warn_pct(),
            var_warn_penalty: default_var_warn_penalty(),
        }
    }
}

impl ScoringConfig {
    /// Base score for an optional linked-signal severity.
    #[must_use]
    pub fn severity_base(&self, severity: Option<Severity>) -> i64 {
        match severity {
            Some(Severity::High) => self.base_high,
            Some(Severity::Medium) => self.base_medium,
            Some(Severity::Low) => self.base_low,
            None => self.base_unlinked,
        }
    }

    /// The trailing consensus window as a duration.
    #[must_use]
    pub fn consensus_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.consensus_window_days)
    }

    /// Validate band ordering and ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.consensus_window_days < 1 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.consensus_window_days",
                reason: "must be at least 1".into(),
            });
        }
        for (field, value) in [
            ("scoring.strong_consensus", self.strong_consensus),
            ("scoring.weak_consensus", self.weak_consensus),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }
        if self.weak_consensus > self.strong_consensus {
            return Err(ConfigError::InvalidValue {
                field: "scoring.weak_consensus",
                reason: format!(
                    "weak band ({}) must not exceed strong band ({})",
                    self.weak_consensus, self.strong_consensus
                ),
            });
        }
        if self.broad_source_boost < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.broad_source_boost",
                reason: "must be non-negative".into(),
            });
        }
        if self.var_warn_pct > self.var_fail_pct {
            return Err(ConfigError::InvalidValue {
                field: "scoring.var_warn_pct",
                reason: format!(
                    "warn band ({}) must not exceed fail band ({})",
                    self.var_warn_pct, self.var_fail_pct
                ),
            });
        }
        Ok(())
    }
}

/// Consensus over a signal window: the agreement fraction plus the vote
/// counts behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consensus {
    /// Agreement fraction in `[0, 1]`, breadth boost applied.
    pub value: f64,
    pub pos: u32,
    pub neg: u32,
    /// Distinct sources that contributed a positive-direction signal.
    pub distinct_pos_sources: usize,
}

/// Compute directional consensus over a signal window.
///
/// Signals without a direction are ignored. `pos / (pos + neg)` with a zero
/// denominator yields `0`, never `NaN`. When at least
/// `config.broad_source_count` distinct sources contributed a positive
/// signal, the fraction is boosted by `config.broad_source_boost` and capped
/// at `1.0`: broad agreement outranks a single prolific source.
#[must_use]
pub fn consensus(signals: &[Signal], config: &ScoringConfig) -> Consensus {
    let mut pos = 0u32;
    let mut neg = 0u32;
    let mut pos_sources: BTreeSet<&str> = BTreeSet::new();

    for signal in signals {
        match signal.direction.map(|d| d.stance()) {
            Some(Stance::Pos) => {
                pos += 1;
                pos_sources.insert(signal.source.as_str());
            }
            Some(Stance::Neg) => neg += 1,
            None => {}
        }
    }

    let total = pos + neg;
    let mut value = if total == 0 {
        0.0
    } else {
        f64::from(pos) / f64::from(total)
    };

    if pos_sources.len() >= config.broad_source_count {
        value = (value + config.broad_source_boost).min(1.0);
    }

    Consensus {
        value,
        pos,
        neg,
        distinct_pos_sources: pos_sources.len(),
    }
}

/// Evaluate the four guardrail conditions.
///
/// Each condition is checked once, in fixed order, so the returned breaches
/// are distinct by construction.
#[must_use]
pub fn guardrail_breaches(
    sizing: Sizing,
    readings: &GuardrailReadings,
    config: &ScoringConfig,
) -> Vec<GuardrailBreach> {
    let mut blocking = Vec::new();

    if sizing.notional_pct_nav > config.max_notional_pct_nav {
        blocking.push(GuardrailBreach::Ltv);
    }
    if readings.hf < config.min_health_factor {
        blocking.push(GuardrailBreach::Hf);
    }
    if readings.slippage > config.max_slippage {
        blocking.push(GuardrailBreach::Slippage);
    }
    if readings.real_yield < config.min_real_yield {
        blocking.push(GuardrailBreach::RealYield);
    }

    blocking
}

fn consensus_adjustment(value: f64, config: &ScoringConfig) -> i64 {
    if value >= config.strong_consensus {
        config.strong_consensus_bonus
    } else if value >= config.weak_consensus {
        config.weak_consensus_bonus
    } else {
        0
    }
}

fn var_penalty(var_usd: Decimal, nav_usd: Decimal, config: &ScoringConfig) -> i64 {
    // NAV at or below zero must not divide; it reads as no VaR exposure.
    if nav_usd <= Decimal::ZERO {
        return 0;
    }
    let var_pct = var_usd / nav_usd;
    if var_pct > config.var_fail_pct {
        config.var_fail_penalty
    } else if var_pct > config.var_warn_pct {
        config.var_warn_penalty
    } else {
        0
    }
}

/// Score one opportunity against its market context.
///
/// `linked_severity` is the severity of the opportunity's originating
/// signal, resolved by the caller through the back-reference;
/// `consensus_window` is the trailing same-asset/bucket signal window;
/// `readings` are the current runtime guardrail metrics; `nav_usd` is the
/// current portfolio NAV.
#[must_use]
pub fn score_opportunity(
    opportunity: &Opportunity,
    linked_severity: Option<Severity>,
    consensus_window: &[Signal],
    readings: &GuardrailReadings,
    nav_usd: Decimal,
    config: &ScoringConfig,
) -> ScoreResult {
    let base = config.severity_base(linked_severity);

    let consensus = consensus(consensus_window, config);
    let consensus_adj = consensus_adjustment(consensus.value, config);

    let blocking = guardrail_breaches(opportunity.sizing(), readings, config);
    let guardrail_penalty = config.guardrail_penalty * blocking.len() as i64;

    let var_penalty = var_penalty(opportunity.var_usd(), nav_usd, config);

    let raw = base + consensus_adj - guardrail_penalty - var_penalty;
    let score = raw.clamp(0, 100) as u8;

    ScoreResult {
        score,
        consensus: consensus.value,
        blocking,
        breakdown: ScoreBreakdown {
            base,
            consensus_adj,
            guardrail_penalty,
            var_penalty,
        },
    }
}
