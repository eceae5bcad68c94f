//! In-memory port implementations.
//!
//! Reference adapters backed by `parking_lot` locks: the aggregation the
//! production stores push into SQL (window filters, fingerprint duplicate
//! counts, most-recent-metric scans) is spelled out here as plain scans.
//! Used by the test suites and as the seam contract for real adapters.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::{
    AuditEntry, FeedKey, FeedStats, Limit, Opportunity, OpportunityId, ScoreSnapshot, Signal,
    SignalId,
};
use crate::error::{Error, Result};
use crate::port::{
    AuditLog, LimitStore, OpportunityFilter, OpportunityStore, Page, SignalStore,
};
use crate::service::ranking::paginate;

/// In-memory signal store.
#[derive(Default)]
pub struct InMemorySignalStore {
    signals: RwLock<Vec<Signal>>,
    schema_errors: RwLock<Vec<(FeedKey, DateTime<Utc>)>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a signal.
    pub fn insert(&self, signal: Signal) {
        self.signals.write().push(signal);
    }

    /// Record a schema-validation failure for a feed.
    ///
    /// Rejected payloads never become signals, so the failure is tracked
    /// beside them.
    pub fn record_schema_error(&self, key: FeedKey, at: DateTime<Utc>) {
        self.schema_errors.write().push((key, at));
    }
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn get(&self, id: &SignalId) -> Result<Option<Signal>> {
        Ok(self.signals.read().iter().find(|s| &s.id == id).cloned())
    }

    async fn consensus_window(
        &self,
        asset: &str,
        bucket: Option<&str>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Vec<Signal>> {
        let cutoff = now - window;
        Ok(self
            .signals
            .read()
            .iter()
            .filter(|s| {
                s.timestamp >= cutoff
                    && s.asset.as_deref() == Some(asset)
                    && s.bucket.as_deref() == bucket
            })
            .cloned()
            .collect())
    }

    async fn feed_stats(&self, now: DateTime<Utc>) -> Result<Vec<(FeedKey, FeedStats)>> {
        let cutoff = now - Duration::hours(24);
        let mut stats: BTreeMap<FeedKey, FeedStats> = BTreeMap::new();
        let mut seen_fingerprints: HashMap<FeedKey, HashSet<String>> = HashMap::new();

        for signal in self.signals.read().iter() {
            let key = FeedKey::new(
                signal.source.clone(),
                signal.agent_code.clone(),
                signal.signal_type.clone(),
            );
            let entry = stats.entry(key.clone()).or_default();

            // last_ts spans the feed's whole history, not just the window.
            entry.last_ts = Some(match entry.last_ts {
                Some(prev) => prev.max(signal.timestamp),
                None => signal.timestamp,
            });

            if signal.timestamp >= cutoff {
                entry.count_24h += 1;
                if let Some(fingerprint) = &signal.fingerprint {
                    let seen = seen_fingerprints.entry(key).or_default();
                    if !seen.insert(fingerprint.clone()) {
                        entry.dupes_24h += 1;
                    }
                }
            }
        }

        for (key, at) in self.schema_errors.read().iter() {
            if *at >= cutoff {
                stats.entry(key.clone()).or_default().schema_errors_24h += 1;
            }
        }

        Ok(stats.into_iter().collect())
    }
}

/// One recorded runtime metric observation.
#[derive(Debug, Clone, Copy)]
struct MetricPoint {
    at: DateTime<Utc>,
    value: Decimal,
}

/// In-memory limit and runtime metric store.
#[derive(Default)]
pub struct InMemoryLimitStore {
    limits: RwLock<HashMap<String, Limit>>,
    metrics: RwLock<HashMap<String, Vec<MetricPoint>>>,
}

impl InMemoryLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a named limit.
    pub fn set_limit(&self, limit: Limit) {
        self.limits.write().insert(limit.key.clone(), limit);
    }

    /// Append a runtime metric observation.
    pub fn record_metric(&self, key: impl Into<String>, at: DateTime<Utc>, value: Decimal) {
        self.metrics
            .write()
            .entry(key.into())
            .or_default()
            .push(MetricPoint { at, value });
    }
}

#[async_trait]
impl LimitStore for InMemoryLimitStore {
    async fn limit(&self, key: &str) -> Result<Option<Limit>> {
        Ok(self.limits.read().get(key).cloned())
    }

    async fn runtime_metric(&self, key: &str) -> Result<Option<Decimal>> {
        let metrics = self.metrics.read();
        let Some(series) = metrics.get(key) else {
            return Ok(None);
        };

        // Ordered scan: the most recent record wins, later entries win ties.
        let mut latest: Option<MetricPoint> = None;
        for point in series {
            if latest.map_or(true, |l| point.at >= l.at) {
                latest = Some(*point);
            }
        }
        Ok(latest.map(|p| p.value))
    }
}

/// In-memory opportunity store.
#[derive(Default)]
pub struct InMemoryOpportunityStore {
    items: RwLock<Vec<Opportunity>>,
}

impl InMemoryOpportunityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an opportunity, replacing any record with the same ID.
    pub fn insert(&self, opportunity: Opportunity) {
        let mut items = self.items.write();
        match items.iter_mut().find(|o| o.id() == opportunity.id()) {
            Some(existing) => *existing = opportunity,
            None => items.push(opportunity),
        }
    }
}

#[async_trait]
impl OpportunityStore for InMemoryOpportunityStore {
    async fn get(&self, id: &OpportunityId) -> Result<Option<Opportunity>> {
        Ok(self.items.read().iter().find(|o| o.id() == id).cloned())
    }

    async fn list(&self, filter: &OpportunityFilter, page: Page) -> Result<Vec<Opportunity>> {
        let matching: Vec<Opportunity> = self
            .items
            .read()
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        Ok(paginate(&matching, page))
    }

    async fn store_score(&self, id: &OpportunityId, snapshot: ScoreSnapshot) -> Result<()> {
        let mut items = self.items.write();
        let opportunity = items
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or_else(|| Error::OpportunityNotFound(id.clone()))?;
        opportunity.apply_score(snapshot);
        Ok(())
    }
}

/// In-memory audit log.
#[derive(Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries, in recording order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        self.entries.write().push(entry);
        Ok(())
    }
}
