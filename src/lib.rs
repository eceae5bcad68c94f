//! Opx - Opportunity scoring and data-pipeline health engines.
//!
//! This crate provides the two calculation cores of a financial-intelligence
//! desk: OP-X opportunity scoring (severity prior, directional consensus,
//! guardrail blocking, value-at-risk penalty) and DQP pipeline-health
//! classification (freshness, duplicates, schema errors).
//!
//! # Architecture
//!
//! Both engines are pure functions of already-fetched inputs; everything
//! around them follows a ports-and-adapters split:
//!
//! - **`domain`** - Typed records and the two engines
//!   - [`domain::scorer`] - `score_opportunity`: 0-100 composite score,
//!     consensus fraction, blocking guardrails
//!   - [`domain::dqp`] - `classify`: ok/warn/fail per feed with reason
//!     strings
//! - **`port`** - Collaborator traits the embedding application implements:
//!   signal store, limit store, opportunity store, audit log
//! - **`service`** - Orchestration over the ports: recalculation with audit
//!   trail, ranked listings, DQP reports with threshold sourcing
//! - **`adapter`** - In-memory reference implementations of the ports
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Storage-agnostic types: opportunities, signals, limits,
//!   scores, DQP rows
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions for collaborators
//! - [`service`] - Orchestration services
//! - [`adapter`] - In-memory port implementations
//!
//! # Example
//!
//! ```
//! use opx::domain::{score_opportunity, Opportunity, OpportunityKind, ScoringConfig};
//! use opx::domain::GuardrailReadings;
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let opportunity = Opportunity::builder()
//!     .id("opx-1")
//!     .kind(OpportunityKind::Basis)
//!     .asset("ETH")
//!     .var_usd(dec!(20000))
//!     .created_at(Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let readings = GuardrailReadings {
//!     hf: dec!(2.0),
//!     slippage: dec!(0.1),
//!     real_yield: dec!(1.0),
//! };
//!
//! let result = score_opportunity(
//!     &opportunity,
//!     None,
//!     &[],
//!     &readings,
//!     dec!(1000000),
//!     &ScoringConfig::default(),
//! );
//! assert_eq!(result.score, 50);
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
