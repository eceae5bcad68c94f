//! OP-X triage service.
//!
//! Wires the opportunity, signal, and limit stores to the scoring engine:
//! gathers the linked-signal severity, the consensus window, the runtime
//! guardrail readings, and NAV, invokes the engine, and persists/audits the
//! result. The engine itself never sees a port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::{
    score_opportunity, AuditEntry, GuardrailReadings, Opportunity, OpportunityId, ScoreResult,
    ScoredOpportunity, ScoringConfig, Severity,
};
use crate::error::{Error, Result};
use crate::port::{AuditLog, LimitStore, OpportunityFilter, OpportunityStore, Page, SignalStore};
use crate::service::ranking::{rank, SortDirection, SortKey};

/// Runtime metric key for the current health factor.
const HF_METRIC: &str = "hf.current";
/// Runtime metric key for the current observed slippage.
const SLIPPAGE_METRIC: &str = "slippage.current";
/// Runtime metric key for the current observed real yield.
const REAL_YIELD_METRIC: &str = "realyield.current";
/// Runtime metric key for the current portfolio NAV in USD.
const NAV_METRIC: &str = "nav.usd";

/// Scoring orchestration over the collaborator ports.
pub struct OpxService {
    signals: Arc<dyn SignalStore>,
    limits: Arc<dyn LimitStore>,
    opportunities: Arc<dyn OpportunityStore>,
    audit: Arc<dyn AuditLog>,
    config: ScoringConfig,
}

impl OpxService {
    /// Create a service over the given collaborators.
    pub fn new(
        signals: Arc<dyn SignalStore>,
        limits: Arc<dyn LimitStore>,
        opportunities: Arc<dyn OpportunityStore>,
        audit: Arc<dyn AuditLog>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            signals,
            limits,
            opportunities,
            audit,
            config,
        }
    }

    /// Recalculate one opportunity's score, persist it, and audit the
    /// change.
    ///
    /// `now` anchors the consensus window; `actor` identifies the caller in
    /// the audit entry. Collaborator errors propagate unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OpportunityNotFound`] if the ID is unknown, or any
    /// error the collaborators surface.
    pub async fn recalculate(
        &self,
        id: &OpportunityId,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<ScoreResult> {
        let opportunity = self
            .opportunities
            .get(id)
            .await?
            .ok_or_else(|| Error::OpportunityNotFound(id.clone()))?;

        let readings = self.readings().await?;
        let nav_usd = self.nav_usd().await?;
        let result = self.score(&opportunity, &readings, nav_usd, now).await?;

        let previous = opportunity.last_score().cloned();
        let snapshot = result.snapshot();
        self.opportunities.store_score(id, snapshot.clone()).await?;
        self.audit
            .record(AuditEntry::new(
                id.clone(),
                actor,
                previous,
                snapshot,
                now,
            ))
            .await?;

        info!(
            opportunity_id = %id,
            actor,
            score = result.score,
            consensus = result.consensus,
            blocking = ?result.blocking_names(),
            "Opportunity rescored"
        );

        Ok(result)
    }

    /// Score a filtered page of opportunities and rank it.
    ///
    /// Scores are computed on the fly and not persisted; the shared inputs
    /// (readings, NAV) are fetched once per batch.
    pub async fn list(
        &self,
        filter: &OpportunityFilter,
        page: Page,
        key: SortKey,
        direction: SortDirection,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredOpportunity>> {
        let batch = self.opportunities.list(filter, page).await?;
        let readings = self.readings().await?;
        let nav_usd = self.nav_usd().await?;

        let mut scored = Vec::with_capacity(batch.len());
        for opportunity in batch {
            let result = self.score(&opportunity, &readings, nav_usd, now).await?;
            scored.push(ScoredOpportunity {
                opportunity,
                result,
            });
        }
        debug!(count = scored.len(), "Scored opportunity batch");

        Ok(rank(scored, key, direction))
    }

    async fn score(
        &self,
        opportunity: &Opportunity,
        readings: &GuardrailReadings,
        nav_usd: Decimal,
        now: DateTime<Utc>,
    ) -> Result<ScoreResult> {
        let severity = self.linked_severity(opportunity).await?;
        let window = self
            .signals
            .consensus_window(
                opportunity.asset(),
                opportunity.agent_bucket(),
                now,
                self.config.consensus_window(),
            )
            .await?;

        Ok(score_opportunity(
            opportunity,
            severity,
            &window,
            readings,
            nav_usd,
            &self.config,
        ))
    }

    /// Severity of the originating signal, resolved through the weak
    /// back-reference. A dangling reference scores like an unlinked
    /// opportunity.
    async fn linked_severity(&self, opportunity: &Opportunity) -> Result<Option<Severity>> {
        match opportunity.signal_id() {
            Some(id) => Ok(self.signals.get(id).await?.and_then(|s| s.severity)),
            None => Ok(None),
        }
    }

    async fn readings(&self) -> Result<GuardrailReadings> {
        Ok(GuardrailReadings {
            hf: self.metric_or_zero(HF_METRIC).await?,
            slippage: self.metric_or_zero(SLIPPAGE_METRIC).await?,
            real_yield: self.metric_or_zero(REAL_YIELD_METRIC).await?,
        })
    }

    async fn nav_usd(&self) -> Result<Decimal> {
        self.metric_or_zero(NAV_METRIC).await
    }

    /// A metric that has never been recorded reads as zero; lookup errors
    /// still propagate.
    async fn metric_or_zero(&self, key: &str) -> Result<Decimal> {
        Ok(self
            .limits
            .runtime_metric(key)
            .await?
            .unwrap_or(Decimal::ZERO))
    }
}
