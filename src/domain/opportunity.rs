//! Opportunity type with builder pattern.
//!
//! This module provides the `Opportunity` struct representing a proposed
//! trade or strategy idea, along with `OpportunityBuilder` for safe
//! construction from partially-populated ingestion records.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OpportunityId, SignalId};
use super::score::ScoreSnapshot;

/// Triage status of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityStatus {
    Proposed,
    Approved,
    Rejected,
}

/// Strategy family an opportunity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpportunityKind {
    Beta,
    Basis,
    RealYield,
    Arb,
}

impl fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beta => write!(f, "beta"),
            Self::Basis => write!(f, "basis"),
            Self::RealYield => write!(f, "realYield"),
            Self::Arb => write!(f, "arb"),
        }
    }
}

/// Proposed position sizing.
///
/// Absent sizing fields read as zero so partially-populated records score
/// without error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizing {
    /// Notional size as a percentage of NAV (e.g. `12.5` = 12.5%).
    #[serde(default)]
    pub notional_pct_nav: Decimal,
    /// Maximum tolerated drawdown in basis points.
    #[serde(default)]
    pub max_dd_bps: i64,
}

/// Error returned when building an Opportunity fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityBuildError {
    /// ID is required but was not provided.
    MissingId,
    /// Kind is required but was not provided.
    MissingKind,
    /// Asset is required but was not provided.
    MissingAsset,
    /// Creation timestamp is required but was not provided.
    MissingCreatedAt,
}

impl fmt::Display for OpportunityBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "id is required"),
            Self::MissingKind => write!(f, "kind is required"),
            Self::MissingAsset => write!(f, "asset is required"),
            Self::MissingCreatedAt => write!(f, "created_at is required"),
        }
    }
}

impl std::error::Error for OpportunityBuildError {}

/// A proposed trade/strategy idea moving through OP-X triage.
///
/// Use `Opportunity::builder()` to construct instances. Created externally
/// by ingestion; the scoring engine mutates only the derived score via
/// [`Opportunity::apply_score`]; status changes via
/// [`Opportunity::set_status`] are owned by approval/rejection actions.
#[derive(Debug, Clone)]
pub struct Opportunity {
    id: OpportunityId,
    status: OpportunityStatus,
    kind: OpportunityKind,
    asset: String,
    agent_bucket: Option<String>,
    agent_code: Option<String>,
    sizing: Sizing,
    var_usd: Decimal,
    risks: Vec<String>,
    signal_id: Option<SignalId>,
    created_at: DateTime<Utc>,
    last_score: Option<ScoreSnapshot>,
}

impl Opportunity {
    /// Create a new builder for constructing an Opportunity.
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::new()
    }

    /// Get the opportunity ID.
    pub fn id(&self) -> &OpportunityId {
        &self.id
    }

    /// Get the triage status.
    pub fn status(&self) -> OpportunityStatus {
        self.status
    }

    /// Get the strategy family.
    pub fn kind(&self) -> OpportunityKind {
        self.kind
    }

    /// Get the underlying asset symbol.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Get the agent bucket, if the originating agent is bucketed.
    pub fn agent_bucket(&self) -> Option<&str> {
        self.agent_bucket.as_deref()
    }

    /// Get the originating agent code.
    pub fn agent_code(&self) -> Option<&str> {
        self.agent_code.as_deref()
    }

    /// Get the proposed sizing.
    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    /// Get the value-at-risk estimate in USD.
    pub fn var_usd(&self) -> Decimal {
        self.var_usd
    }

    /// Get the free-text risk notes.
    pub fn risks(&self) -> &[String] {
        &self.risks
    }

    /// Get the back-reference to the originating signal, if any.
    ///
    /// This is a weak reference: lookup-only, no ownership.
    pub fn signal_id(&self) -> Option<&SignalId> {
        self.signal_id.as_ref()
    }

    /// Get the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the most recently persisted scoring result, if any.
    pub fn last_score(&self) -> Option<&ScoreSnapshot> {
        self.last_score.as_ref()
    }

    /// Persist a scoring result onto the record.
    ///
    /// Recomputation is idempotent given the same inputs, so last-write-wins
    /// between concurrent recalculations is acceptable.
    pub fn apply_score(&mut self, snapshot: ScoreSnapshot) {
        self.last_score = Some(snapshot);
    }

    /// Move the opportunity to a new triage status.
    pub fn set_status(&mut self, status: OpportunityStatus) {
        self.status = status;
    }
}

/// Builder for constructing `Opportunity` instances.
///
/// Required fields are `id`, `kind`, `asset`, and `created_at`; every
/// numeric field defaults to zero and every optional field to `None`, so
/// sparse ingestion payloads still produce a scorable record.
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    id: Option<OpportunityId>,
    status: Option<OpportunityStatus>,
    kind: Option<OpportunityKind>,
    asset: Option<String>,
    agent_bucket: Option<String>,
    agent_code: Option<String>,
    sizing: Sizing,
    var_usd: Decimal,
    risks: Vec<String>,
    signal_id: Option<SignalId>,
    created_at: Option<DateTime<Utc>>,
}

impl OpportunityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opportunity ID.
    pub fn id(mut self, id: impl Into<OpportunityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the triage status. Defaults to `Proposed`.
    pub fn status(mut self, status: OpportunityStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the strategy family.
    pub fn kind(mut self, kind: OpportunityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the underlying asset symbol.
    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Set the agent bucket.
    pub fn agent_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.agent_bucket = Some(bucket.into());
        self
    }

    /// Set the originating agent code.
    pub fn agent_code(mut self, code: impl Into<String>) -> Self {
        self.agent_code = Some(code.into());
        self
    }

    /// Set the proposed sizing.
    pub fn sizing(mut self, sizing: Sizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Set the value-at-risk estimate in USD.
    pub fn var_usd(mut self, var_usd: Decimal) -> Self {
        self.var_usd = var_usd;
        self
    }

    /// Set the free-text risk notes.
    pub fn risks(mut self, risks: Vec<String>) -> Self {
        self.risks = risks;
        self
    }

    /// Set the back-reference to the originating signal.
    pub fn signal_id(mut self, id: impl Into<SignalId>) -> Self {
        self.signal_id = Some(id.into());
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Build the Opportunity.
    ///
    /// # Errors
    ///
    /// Returns `OpportunityBuildError` if any required field is missing.
    pub fn build(self) -> Result<Opportunity, OpportunityBuildError> {
        let id = self.id.ok_or(OpportunityBuildError::MissingId)?;
        let kind = self.kind.ok_or(OpportunityBuildError::MissingKind)?;
        let asset = self.asset.ok_or(OpportunityBuildError::MissingAsset)?;
        let created_at = self
            .created_at
            .ok_or(OpportunityBuildError::MissingCreatedAt)?;

        Ok(Opportunity {
            id,
            status: self.status.unwrap_or(OpportunityStatus::Proposed),
            kind,
            asset,
            agent_bucket: self.agent_bucket,
            agent_code: self.agent_code,
            sizing: self.sizing,
            var_usd: self.var_usd,
            risks: self.risks,
            signal_id: self.signal_id,
            created_at,
            last_score: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn builder_creates_opportunity_with_defaults() {
        let opp = Opportunity::builder()
            .id("opx-1")
            .kind(OpportunityKind::Basis)
            .asset("ETH")
            .created_at(ts())
            .build()
            .unwrap();

        assert_eq!(opp.id().as_str(), "opx-1");
        assert_eq!(opp.status(), OpportunityStatus::Proposed);
        assert_eq!(opp.sizing().notional_pct_nav, Decimal::ZERO);
        assert_eq!(opp.var_usd(), Decimal::ZERO);
        assert!(opp.last_score().is_none());
        assert!(opp.signal_id().is_none());
    }

    #[test]
    fn builder_fails_without_id() {
        let result = Opportunity::builder()
            .kind(OpportunityKind::Arb)
            .asset("BTC")
            .created_at(ts())
            .build();

        assert_eq!(result.unwrap_err(), OpportunityBuildError::MissingId);
    }

    #[test]
    fn builder_fails_without_kind() {
        let result = Opportunity::builder()
            .id("opx-1")
            .asset("BTC")
            .created_at(ts())
            .build();

        assert_eq!(result.unwrap_err(), OpportunityBuildError::MissingKind);
    }

    #[test]
    fn builder_fails_without_asset() {
        let result = Opportunity::builder()
            .id("opx-1")
            .kind(OpportunityKind::Arb)
            .created_at(ts())
            .build();

        assert_eq!(result.unwrap_err(), OpportunityBuildError::MissingAsset);
    }

    #[test]
    fn builder_carries_sizing_and_var() {
        let opp = Opportunity::builder()
            .id("opx-2")
            .kind(OpportunityKind::RealYield)
            .asset("stETH")
            .agent_bucket("L1")
            .sizing(Sizing {
                notional_pct_nav: dec!(12.5),
                max_dd_bps: 250,
            })
            .var_usd(dec!(40000))
            .created_at(ts())
            .build()
            .unwrap();

        assert_eq!(opp.sizing().notional_pct_nav, dec!(12.5));
        assert_eq!(opp.sizing().max_dd_bps, 250);
        assert_eq!(opp.var_usd(), dec!(40000));
        assert_eq!(opp.agent_bucket(), Some("L1"));
    }

    #[test]
    fn status_transitions_are_explicit() {
        let mut opp = Opportunity::builder()
            .id("opx-3")
            .kind(OpportunityKind::Beta)
            .asset("SOL")
            .created_at(ts())
            .build()
            .unwrap();

        opp.set_status(OpportunityStatus::Approved);
        assert_eq!(opp.status(), OpportunityStatus::Approved);
    }
}
