use thiserror::Error;

use topology_core::{EventId, Timestamp};
use topology_events::Event;

/// Append rejected because it would break the log's ordering invariants.
///
/// Both variants are internal-consistency faults: events minted by a single
/// factory never trigger them, and nothing should retry an append that did.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventLogError {
    #[error("duplicate event id {id}")]
    DuplicateId { id: EventId },

    #[error("non-monotonic timestamp (last={last}, found={found})")]
    NonMonotonicTimestamp { last: Timestamp, found: Timestamp },
}

/// Ordered, append-only sequence of immutable events.
///
/// Implementations must:
/// - keep append order, which is also strictly increasing timestamp order
/// - never reorder, edit or remove an appended event
/// - leave `parent_id` unchecked (dangling parents are legal)
pub trait EventLog {
    /// Append `event` at the end of the log.
    fn append(&mut self, event: Event) -> Result<(), EventLogError>;

    /// Every event, in append order.
    fn all(&self) -> &[Event];

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    fn last(&self) -> Option<&Event> {
        self.all().last()
    }
}
