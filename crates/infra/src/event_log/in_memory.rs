use std::collections::HashSet;

use topology_core::EventId;
use topology_events::Event;

use super::r#trait::{EventLog, EventLogError};

/// In-memory append-only log. Lives for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventLog {
    events: Vec<Event>,
    ids: HashSet<EventId>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&mut self, event: Event) -> Result<(), EventLogError> {
        if let Some(last) = self.events.last() {
            if event.timestamp() <= last.timestamp() {
                return Err(EventLogError::NonMonotonicTimestamp {
                    last: last.timestamp(),
                    found: event.timestamp(),
                });
            }
        }

        if self.ids.contains(event.id()) {
            return Err(EventLogError::DuplicateId {
                id: event.id().clone(),
            });
        }

        self.ids.insert(event.id().clone());
        self.events.push(event);
        Ok(())
    }

    fn all(&self) -> &[Event] {
        &self.events
    }
}
