//! DQP reporting service.
//!
//! Sources classification thresholds from the limit collaborator, pulls
//! rolling feed statistics from the signal store, and classifies every feed
//! into one report row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use crate::domain::dqp::{
    classify, freshness_minutes, CountBands, DqpRow, DqpThresholds, FreshnessBands,
};
use crate::error::Result;
use crate::port::{LimitStore, SignalStore};

/// Limit keys the thresholds are sourced from.
const FRESHNESS_OK_LIMIT: &str = "dqp.freshness.ok";
const FRESHNESS_WARN_LIMIT: &str = "dqp.freshness.warn";
const FRESHNESS_FAIL_LIMIT: &str = "dqp.freshness.fail";
const DUPLICATES_WARN_LIMIT: &str = "dqp.duplicates.warn";
const DUPLICATES_FAIL_LIMIT: &str = "dqp.duplicates.fail";
const SCHEMA_WARN_LIMIT: &str = "dqp.schema.warn";
const SCHEMA_FAIL_LIMIT: &str = "dqp.schema.fail";

/// Pipeline-health reporting over the collaborator ports.
pub struct DqpService {
    signals: Arc<dyn SignalStore>,
    limits: Arc<dyn LimitStore>,
}

impl DqpService {
    /// Create a service over the given collaborators.
    pub fn new(signals: Arc<dyn SignalStore>, limits: Arc<dyn LimitStore>) -> Self {
        Self { signals, limits }
    }

    /// Classify every known feed as of `now`.
    ///
    /// Rows come back sorted by feed key. A failing threshold lookup falls
    /// back to defaults; a failing statistics fetch propagates, since
    /// reporting a broken pipeline as healthy is worse than failing the
    /// query.
    pub async fn report(&self, now: DateTime<Utc>) -> Result<Vec<DqpRow>> {
        let thresholds = self.thresholds().await;
        let stats = self.signals.feed_stats(now).await?;

        let mut rows: Vec<DqpRow> = stats
            .into_iter()
            .map(|(key, stats)| {
                let freshness_min = freshness_minutes(now, stats.last_ts);
                let calc = classify(
                    freshness_min,
                    stats.dupes_24h,
                    stats.schema_errors_24h,
                    &thresholds,
                );
                DqpRow {
                    key,
                    last_ts: stats.last_ts,
                    freshness_min,
                    count_24h: stats.count_24h,
                    dupes_24h: stats.dupes_24h,
                    schema_errors_24h: stats.schema_errors_24h,
                    status: calc.status,
                    notes: calc.notes(),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        debug!(feeds = rows.len(), "DQP report computed");
        Ok(rows)
    }

    /// Resolve thresholds from the limit store.
    ///
    /// Each of the six keys falls back independently to its default when
    /// the key is absent, non-integral, or the lookup fails. This is the
    /// only place a collaborator error is swallowed.
    pub async fn thresholds(&self) -> DqpThresholds {
        DqpThresholds {
            freshness: FreshnessBands {
                ok: self
                    .limit_i64(FRESHNESS_OK_LIMIT, DqpThresholds::DEFAULT_FRESHNESS_OK)
                    .await,
                warn: self
                    .limit_i64(FRESHNESS_WARN_LIMIT, DqpThresholds::DEFAULT_FRESHNESS_WARN)
                    .await,
                fail: self
                    .limit_i64(FRESHNESS_FAIL_LIMIT, DqpThresholds::DEFAULT_FRESHNESS_FAIL)
                    .await,
            },
            duplicates: CountBands {
                warn: self
                    .limit_u64(DUPLICATES_WARN_LIMIT, DqpThresholds::DEFAULT_DUPLICATES_WARN)
                    .await,
                fail: self
                    .limit_u64(DUPLICATES_FAIL_LIMIT, DqpThresholds::DEFAULT_DUPLICATES_FAIL)
                    .await,
            },
            schema: CountBands {
                warn: self
                    .limit_u64(SCHEMA_WARN_LIMIT, DqpThresholds::DEFAULT_SCHEMA_WARN)
                    .await,
                fail: self
                    .limit_u64(SCHEMA_FAIL_LIMIT, DqpThresholds::DEFAULT_SCHEMA_FAIL)
                    .await,
            },
        }
    }

    async fn limit_i64(&self, key: &str, default: i64) -> i64 {
        match self.limits.limit(key).await {
            Ok(Some(limit)) => limit.value.to_i64().unwrap_or(default),
            Ok(None) => default,
            Err(error) => {
                warn!(key, %error, "Threshold lookup failed, using default");
                default
            }
        }
    }

    async fn limit_u64(&self, key: &str, default: u64) -> u64 {
        match self.limits.limit(key).await {
            Ok(Some(limit)) => limit.value.to_u64().unwrap_or(default),
            Ok(None) => default,
            Err(error) => {
                warn!(key, %error, "Threshold lookup failed, using default");
                default
            }
        }
    }
}
