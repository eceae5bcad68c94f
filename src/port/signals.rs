//! Signal store port.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::{FeedKey, FeedStats, Signal, SignalId};
use crate::error::Result;

/// Read access to ingested signals.
///
/// Implementations own the window queries; the engines only see the rows
/// that come back.
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Get a signal by ID.
    async fn get(&self, id: &SignalId) -> Result<Option<Signal>>;

    /// All signals within the trailing window that match the given asset
    /// and bucket (`None` matches signals without a bucket).
    async fn consensus_window(
        &self,
        asset: &str,
        bucket: Option<&str>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Vec<Signal>>;

    /// Rolling statistics per feed: last-seen timestamp, 24h volume, 24h
    /// duplicate count by content fingerprint, and 24h schema-error count.
    ///
    /// Errors must propagate; fabricating zeroed statistics would report a
    /// broken pipeline as healthy.
    async fn feed_stats(&self, now: DateTime<Utc>) -> Result<Vec<(FeedKey, FeedStats)>>;
}
