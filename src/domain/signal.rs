//! Market signal type.
//!
//! A signal is a timestamped observation ingested from an upstream feed.
//! Signals serve two purposes: consensus voting during opportunity scoring
//! (via the directional fields) and pipeline-health statistics (via source,
//! agent code, and content fingerprint).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::SignalId;

/// Severity attached to a signal by the emitting agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Directional stance a signal takes on its asset.
///
/// Feeds use several vocabularies for the same two stances; all six are
/// accepted at the ingestion boundary and collapse to [`Stance`] for
/// consensus counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Pro,
    Con,
    Bull,
    Bear,
    Positive,
    Negative,
}

/// Collapsed directional stance used for consensus counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Pos,
    Neg,
}

impl Direction {
    /// Collapse the feed vocabulary to a counting stance.
    #[must_use]
    pub const fn stance(self) -> Stance {
        match self {
            Self::Pro | Self::Bull | Self::Positive => Stance::Pos,
            Self::Con | Self::Bear | Self::Negative => Stance::Neg,
        }
    }
}

/// A timestamped market observation from an upstream feed.
///
/// Immutable once ingested. The typed optional fields cover everything the
/// engines read; feed-specific payload fields ride along in `extra` and are
/// never interpreted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    /// Emitting feed, e.g. `"etf-flows"` or `"onchain-tvl"`.
    pub source: String,
    /// Normalized event kind within the feed.
    pub signal_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Agent that produced the observation, when the feed is agent-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_code: Option<String>,
    /// Content hash used for duplicate detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Ingestion bookkeeping flag. Never read by the engines.
    #[serde(default)]
    pub processed: bool,
    /// Feed-specific payload fields, opaque to the engines.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Signal {
    /// Create a signal with the required fields; optional fields start empty.
    pub fn new(
        id: impl Into<SignalId>,
        source: impl Into<String>,
        signal_type: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            signal_type: signal_type.into(),
            timestamp,
            severity: None,
            asset: None,
            bucket: None,
            direction: None,
            agent_code: None,
            fingerprint: None,
            processed: false,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_vocabularies_collapse_to_two_stances() {
        assert_eq!(Direction::Pro.stance(), Stance::Pos);
        assert_eq!(Direction::Bull.stance(), Stance::Pos);
        assert_eq!(Direction::Positive.stance(), Stance::Pos);
        assert_eq!(Direction::Con.stance(), Stance::Neg);
        assert_eq!(Direction::Bear.stance(), Stance::Neg);
        assert_eq!(Direction::Negative.stance(), Stance::Neg);
    }

    #[test]
    fn deserializes_lowercase_direction_and_severity() {
        let json = r#"{
            "id": "sig-1",
            "source": "etf-flows",
            "signal_type": "flow",
            "timestamp": "2026-01-05T12:00:00Z",
            "severity": "high",
            "direction": "bull",
            "netFlowUsd": 1250000.0
        }"#;

        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.severity, Some(Severity::High));
        assert_eq!(signal.direction, Some(Direction::Bull));
        assert!(signal.extra.contains_key("netFlowUsd"));
    }
}
