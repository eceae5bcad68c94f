//! Builders for domain values used across tests.
//!
//! Provides concise factory functions for opportunities, signals, and
//! guardrail readings so tests focus on assertions rather than
//! construction boilerplate. Everything is anchored to a fixed instant so
//! suites stay deterministic.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use crate::domain::{
    Direction, GuardrailReadings, Opportunity, OpportunityBuilder, OpportunityKind, Severity,
    Signal,
};

/// Fixed reference instant shared by the suites.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap()
}

/// An instant `minutes` before [`anchor`].
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    anchor() - chrono::Duration::minutes(minutes)
}

/// A basis-trade opportunity builder on ETH/L1, anchored, ready for
/// overrides.
pub fn opportunity(id: &str) -> OpportunityBuilder {
    Opportunity::builder()
        .id(id)
        .kind(OpportunityKind::Basis)
        .asset("ETH")
        .agent_bucket("L1")
        .created_at(anchor())
}

/// A directional ETH/L1 signal for consensus voting.
pub fn directional_signal(
    id: &str,
    source: &str,
    direction: Direction,
    at: DateTime<Utc>,
) -> Signal {
    let mut signal = Signal::new(id, source, "narrative", at);
    signal.asset = Some("ETH".into());
    signal.bucket = Some("L1".into());
    signal.direction = Some(direction);
    signal
}

/// A severity-carrying signal, for linking opportunities to their origin.
pub fn severity_signal(id: &str, severity: Severity, at: DateTime<Utc>) -> Signal {
    let mut signal = Signal::new(id, "etf-flows", "flow", at);
    signal.asset = Some("ETH".into());
    signal.severity = Some(severity);
    signal
}

/// A feed signal for DQP statistics.
pub fn feed_signal(
    id: &str,
    source: &str,
    agent_code: Option<&str>,
    signal_type: &str,
    at: DateTime<Utc>,
    fingerprint: Option<&str>,
) -> Signal {
    let mut signal = Signal::new(id, source, signal_type, at);
    signal.agent_code = agent_code.map(String::from);
    signal.fingerprint = fingerprint.map(String::from);
    signal
}

/// Guardrail readings that breach nothing.
pub fn healthy_readings() -> GuardrailReadings {
    GuardrailReadings {
        hf: dec!(2.0),
        slippage: dec!(0.1),
        real_yield: dec!(1.0),
    }
}
