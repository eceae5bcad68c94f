//! Orchestration services.
//!
//! Services wire the collaborator ports to the pure engines: gather rows,
//! invoke the calculation, persist and log the result. All concurrency
//! control over fetch and persist belongs here and in the adapters, never
//! in the engines.

pub mod dqp;
pub mod opx;
pub mod ranking;

pub use dqp::DqpService;
pub use opx::OpxService;
pub use ranking::{rank, SortDirection, SortKey};
