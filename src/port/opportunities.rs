//! Opportunity store port.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Opportunity, OpportunityId, OpportunityKind, OpportunityStatus, ScoreSnapshot};
use crate::error::Result;

/// Filter applied before pagination when listing opportunities.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpportunityFilter {
    #[serde(default)]
    pub status: Option<OpportunityStatus>,
    #[serde(default)]
    pub kind: Option<OpportunityKind>,
    #[serde(default)]
    pub asset: Option<String>,
}

impl OpportunityFilter {
    /// Whether an opportunity passes this filter.
    #[must_use]
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        self.status.map_or(true, |s| opportunity.status() == s)
            && self.kind.map_or(true, |k| opportunity.kind() == k)
            && self
                .asset
                .as_deref()
                .map_or(true, |a| opportunity.asset() == a)
    }
}

/// One page of a listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 20,
        }
    }
}

/// Persistence operations for opportunities.
#[async_trait]
pub trait OpportunityStore: Send + Sync {
    /// Get an opportunity by ID.
    async fn get(&self, id: &OpportunityId) -> Result<Option<Opportunity>>;

    /// List opportunities matching the filter, in stable storage order,
    /// one page at a time.
    async fn list(&self, filter: &OpportunityFilter, page: Page) -> Result<Vec<Opportunity>>;

    /// Persist a scoring result onto an opportunity.
    async fn store_score(&self, id: &OpportunityId, snapshot: ScoreSnapshot) -> Result<()>;
}
