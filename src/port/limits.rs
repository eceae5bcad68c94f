//! Guardrail limit and runtime metric port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Limit;
use crate::error::Result;

/// Read access to configured limits and observed runtime metrics.
///
/// A limit defines a threshold under a bare key (`"hf"`); the observed
/// value for that key is a separate metric series (`"hf.current"`) where
/// the most recent record wins.
#[async_trait]
pub trait LimitStore: Send + Sync {
    /// Current value of a named limit.
    async fn limit(&self, key: &str) -> Result<Option<Limit>>;

    /// Most recent runtime metric recorded under a named key.
    async fn runtime_metric(&self, key: &str) -> Result<Option<Decimal>>;
}
