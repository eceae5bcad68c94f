//! Data-quality & pipeline health (DQP) classification.
//!
//! Every upstream feed is keyed by `(source, agent_code, signal_type)` and
//! judged on three independent axes: freshness of the last observation,
//! duplicate ingestion volume, and schema-validation errors. The worst axis
//! decides the status; every triggered axis contributes a reason string.
//!
//! [`classify`] is a pure function of already-aggregated statistics and an
//! injected [`DqpThresholds`]; it performs no I/O and reads no clock.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Health classification of a feed. Ordered so that the worst axis wins:
/// `Ok < Warn < Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DqpStatus {
    Ok,
    Warn,
    Fail,
}

impl fmt::Display for DqpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warn => write!(f, "warn"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Identity of one upstream feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedKey {
    pub source: String,
    pub agent_code: Option<String>,
    pub signal_type: String,
}

impl FeedKey {
    pub fn new(
        source: impl Into<String>,
        agent_code: Option<String>,
        signal_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            agent_code,
            signal_type: signal_type.into(),
        }
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.source,
            self.agent_code.as_deref().unwrap_or("-"),
            self.signal_type
        )
    }
}

/// Rolling-window statistics for one feed, supplied by the signal store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Timestamp of the most recent signal ever seen, `None` if the feed has
    /// never produced one.
    pub last_ts: Option<DateTime<Utc>>,
    pub count_24h: u64,
    /// Signals in the window whose content fingerprint was already seen.
    pub dupes_24h: u64,
    pub schema_errors_24h: u64,
}

/// Freshness thresholds in whole minutes.
///
/// `ok` is the target freshness reported to operators; classification only
/// reads `warn` and `fail`. The defaults set `warn == fail`, so the stale
/// branch is unreachable until an operator overrides `warn` below `fail`,
/// a long-standing quirk of the deployed thresholds, kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessBands {
    #[serde(default = "default_freshness_ok")]
    pub ok: i64,
    #[serde(default = "default_freshness_warn")]
    pub warn: i64,
    #[serde(default = "default_freshness_fail")]
    pub fail: i64,
}

impl Default for FreshnessBands {
    fn default() -> Self {
        Self {
            ok: DqpThresholds::DEFAULT_FRESHNESS_OK,
            warn: DqpThresholds::DEFAULT_FRESHNESS_WARN,
            fail: DqpThresholds::DEFAULT_FRESHNESS_FAIL,
        }
    }
}

fn default_freshness_ok() -> i64 {
    DqpThresholds::DEFAULT_FRESHNESS_OK
}

fn default_freshness_warn() -> i64 {
    DqpThresholds::DEFAULT_FRESHNESS_WARN
}

fn default_freshness_fail() -> i64 {
    DqpThresholds::DEFAULT_FRESHNESS_FAIL
}

/// Two-tier count thresholds. Counts strictly above `warn` warn, strictly
/// above `fail` fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBands {
    pub warn: u64,
    pub fail: u64,
}

/// Threshold configuration for DQP classification.
///
/// Sourced from the limit collaborator under the `dqp.*` keys, falling back
/// per key to the defaults below when a key is absent or the collaborator is
/// unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqpThresholds {
    #[serde(default)]
    pub freshness: FreshnessBands,
    #[serde(default = "default_duplicate_bands")]
    pub duplicates: CountBands,
    #[serde(default = "default_schema_bands")]
    pub schema: CountBands,
}

fn default_duplicate_bands() -> CountBands {
    CountBands {
        warn: DqpThresholds::DEFAULT_DUPLICATES_WARN,
        fail: DqpThresholds::DEFAULT_DUPLICATES_FAIL,
    }
}

fn default_schema_bands() -> CountBands {
    CountBands {
        warn: DqpThresholds::DEFAULT_SCHEMA_WARN,
        fail: DqpThresholds::DEFAULT_SCHEMA_FAIL,
    }
}

impl DqpThresholds {
    /// `dqp.freshness.ok` fallback, minutes.
    pub const DEFAULT_FRESHNESS_OK: i64 = 15;
    /// `dqp.freshness.warn` fallback, minutes. Equal to the fail bound.
    pub const DEFAULT_FRESHNESS_WARN: i64 = 60;
    /// `dqp.freshness.fail` fallback, minutes.
    pub const DEFAULT_FRESHNESS_FAIL: i64 = 60;
    /// `dqp.duplicates.warn` fallback.
    pub const DEFAULT_DUPLICATES_WARN: u64 = 0;
    /// `dqp.duplicates.fail` fallback.
    pub const DEFAULT_DUPLICATES_FAIL: u64 = 10;
    /// `dqp.schema.warn` fallback.
    pub const DEFAULT_SCHEMA_WARN: u64 = 0;
    /// `dqp.schema.fail` fallback.
    pub const DEFAULT_SCHEMA_FAIL: u64 = 3;

    /// Validate band ordering.
    ///
    /// `warn == fail` is allowed (the shipped freshness defaults rely on it);
    /// `warn > fail` is rejected, as is a negative freshness bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freshness.ok < 0 || self.freshness.warn < 0 || self.freshness.fail < 0 {
            return Err(ConfigError::InvalidValue {
                field: "dqp.freshness",
                reason: "bounds must be non-negative minutes".into(),
            });
        }
        if self.freshness.warn > self.freshness.fail {
            return Err(ConfigError::InvalidValue {
                field: "dqp.freshness",
                reason: format!(
                    "warn ({}) must not exceed fail ({})",
                    self.freshness.warn, self.freshness.fail
                ),
            });
        }
        if self.duplicates.warn > self.duplicates.fail {
            return Err(ConfigError::InvalidValue {
                field: "dqp.duplicates",
                reason: format!(
                    "warn ({}) must not exceed fail ({})",
                    self.duplicates.warn, self.duplicates.fail
                ),
            });
        }
        if self.schema.warn > self.schema.fail {
            return Err(ConfigError::InvalidValue {
                field: "dqp.schema",
                reason: format!(
                    "warn ({}) must not exceed fail ({})",
                    self.schema.warn, self.schema.fail
                ),
            });
        }
        Ok(())
    }
}

impl Default for DqpThresholds {
    fn default() -> Self {
        Self {
            freshness: FreshnessBands::default(),
            duplicates: default_duplicate_bands(),
            schema: default_schema_bands(),
        }
    }
}

/// Result of classifying one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DqpStatusCalculation {
    pub status: DqpStatus,
    /// One entry per triggered axis, accumulated regardless of the final
    /// status.
    pub reasons: Vec<String>,
}

impl DqpStatusCalculation {
    /// Reasons joined for the row notes field.
    #[must_use]
    pub fn notes(&self) -> String {
        self.reasons.join(", ")
    }
}

/// One report row per feed. Derived on every query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DqpRow {
    pub key: FeedKey,
    pub last_ts: Option<DateTime<Utc>>,
    /// Whole minutes since `last_ts`; `None` if the feed has never produced
    /// a signal.
    pub freshness_min: Option<i64>,
    pub count_24h: u64,
    pub dupes_24h: u64,
    pub schema_errors_24h: u64,
    pub status: DqpStatus,
    pub notes: String,
}

/// Whole minutes elapsed between `last_ts` and `now`, floored, never
/// negative. `None` when the feed has never produced a signal.
#[must_use]
pub fn freshness_minutes(now: DateTime<Utc>, last_ts: Option<DateTime<Utc>>) -> Option<i64> {
    last_ts.map(|ts| (now - ts).num_minutes().max(0))
}

/// Classify one feed's rolling statistics against the thresholds.
///
/// Three independent axes, worst wins: a feed whose last observation is at
/// or beyond the fail bound, or whose duplicate/schema-error counts are
/// strictly above theirs, fails; warn applies only when no axis failed. A
/// feed that has never produced a signal (`freshness_min == None`)
/// contributes no freshness reason and classifies `ok` on that axis.
#[must_use]
pub fn classify(
    freshness_min: Option<i64>,
    dupes_24h: u64,
    schema_errors_24h: u64,
    thresholds: &DqpThresholds,
) -> DqpStatusCalculation {
    let mut status = DqpStatus::Ok;
    let mut reasons = Vec::new();

    if let Some(minutes) = freshness_min {
        if minutes >= thresholds.freshness.fail {
            status = DqpStatus::Fail;
            reasons.push(format!("No data {minutes}m"));
        } else if minutes >= thresholds.freshness.warn {
            status = status.max(DqpStatus::Warn);
            reasons.push(format!("Stale {minutes}m"));
        }
    }

    if dupes_24h > thresholds.duplicates.fail {
        status = DqpStatus::Fail;
        reasons.push(format!("Dupes {dupes_24h}"));
    } else if dupes_24h > thresholds.duplicates.warn {
        status = status.max(DqpStatus::Warn);
        reasons.push(format!("Dupes {dupes_24h}"));
    }

    if schema_errors_24h > thresholds.schema.fail {
        status = DqpStatus::Fail;
        reasons.push(format!("Schema {schema_errors_24h}"));
    } else if schema_errors_24h > thresholds.schema.warn {
        status = status.max(DqpStatus::Warn);
        reasons.push(format!("Schema {schema_errors_24h}"));
    }

    DqpStatusCalculation { status, reasons }
}
