use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use topology_core::{Category, EventId, Timestamp};

/// Event payload: string keys to string values, kept in key order.
pub type Payload = BTreeMap<String, String>;

/// An immutable mutation record.
///
/// Events are:
/// - **minted once** by an [`EventFactory`](crate::EventFactory) (id + timestamp)
/// - **never edited**: there are no setters
/// - **linked by id**: `parent_id` is looked up by string equality at replay
///   time and may name an event that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    category: Category,
    /// `None` marks a root event.
    parent_id: Option<EventId>,
    /// Reserved for optimistic concurrency; always `0` for minted events.
    revision: u32,
    payload: Payload,
    timestamp: Timestamp,
}

impl Event {
    /// Reassemble an already-recorded event verbatim.
    ///
    /// Mints nothing; ordering and uniqueness are checked when the event is
    /// appended to a log.
    pub fn from_parts(
        id: EventId,
        category: Category,
        parent_id: Option<EventId>,
        revision: u32,
        payload: Payload,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            category,
            parent_id,
            revision,
            payload,
            timestamp,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn parent_id(&self) -> Option<&EventId> {
        self.parent_id.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// One line per event: `<timestamp> <category> <id> <parent> {k: v, ...}`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent_id.as_ref().map(EventId::as_str).unwrap_or("-");
        write!(
            f,
            "{} {} {} {} {{",
            self.timestamp, self.category, self.id, parent
        )?;
        for (i, (key, value)) in self.payload.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
