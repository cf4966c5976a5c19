//! Infrastructure layer: the in-memory event log and the store that keeps
//! the projection in step with it.

pub mod config;
pub mod error;
pub mod event_log;
pub mod shared;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use event_log::{EventLog, EventLogError, InMemoryEventLog};
pub use shared::SharedStore;
pub use store::Store;
