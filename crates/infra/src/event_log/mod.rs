//! Append-only event log boundary.
//!
//! The log is the source of truth; projections are rebuilt from it and can be
//! thrown away at any time.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEventLog;
pub use r#trait::{EventLog, EventLogError};
