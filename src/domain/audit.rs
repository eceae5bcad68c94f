//! Audit-log entry for score recalculations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AuditId, OpportunityId};
use super::score::ScoreSnapshot;

/// One recorded score change: who recalculated which opportunity when, and
/// what the derived values were before and after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub opportunity_id: OpportunityId,
    /// Caller identity, e.g. an operator handle or `"scheduler"`.
    pub actor: String,
    /// Derived values before the run; `None` on first scoring.
    pub previous: Option<ScoreSnapshot>,
    /// Derived values after the run.
    pub current: ScoreSnapshot,
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create an entry with a fresh [`AuditId`].
    pub fn new(
        opportunity_id: OpportunityId,
        actor: impl Into<String>,
        previous: Option<ScoreSnapshot>,
        current: ScoreSnapshot,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditId::new(),
            opportunity_id,
            actor: actor.into(),
            previous,
            current,
            at,
        }
    }
}
