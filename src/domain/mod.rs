//! Storage-agnostic domain logic.

mod audit;
mod id;
mod limit;
mod opportunity;
mod score;
mod signal;

pub mod dqp;
pub mod scorer;

// Core domain types
pub use audit::AuditEntry;
pub use id::{AuditId, OpportunityId, SignalId};
pub use limit::{GuardrailReadings, Limit};
pub use opportunity::{
    Opportunity, OpportunityBuildError, OpportunityBuilder, OpportunityKind, OpportunityStatus,
    Sizing,
};
pub use score::{GuardrailBreach, ScoreBreakdown, ScoreResult, ScoreSnapshot, ScoredOpportunity};
pub use signal::{Direction, Severity, Signal, Stance};

// DQP types
pub use dqp::{DqpRow, DqpStatus, DqpStatusCalculation, DqpThresholds, FeedKey, FeedStats};

// Scoring engine
pub use scorer::{consensus, score_opportunity, Consensus, ScoringConfig};
