//! `topology-core` — identity and ordering primitives for the topology event log.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{LogicalClock, Timestamp};
pub use error::{DomainError, DomainResult};
pub use id::{Category, EventId, IdGenerator};
