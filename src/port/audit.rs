//! Audit-log port.

use async_trait::async_trait;

use crate::domain::AuditEntry;
use crate::error::Result;

/// Append-only record of score recalculations.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Record one score change.
    async fn record(&self, entry: AuditEntry) -> Result<()>;
}
