//! Reference adapters for the collaborator ports.

pub mod memory;

pub use memory::{
    InMemoryAuditLog, InMemoryLimitStore, InMemoryOpportunityStore, InMemorySignalStore,
};
