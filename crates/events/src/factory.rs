//! Event construction helpers used by callers that turn user input into events.

use topology_core::{Category, DomainError, DomainResult, EventId, IdGenerator, LogicalClock};

use crate::event::{Event, Payload};

/// Payload key holding an equipment item's name.
pub const NAME_KEY: &str = "Name";

/// Mints ids and timestamps for new events.
///
/// One factory belongs to one log: minting order is append order is
/// timestamp order. Validation happens before anything is minted, so a
/// rejected request leaves both counters untouched.
#[derive(Debug, Default, Clone)]
pub struct EventFactory {
    ids: IdGenerator,
    clock: LogicalClock,
}

impl EventFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue minting after `events`, e.g. when wrapping a log that already
    /// holds recorded events. Ids and timestamps resume past the highest seen.
    pub fn resuming_after(events: &[Event]) -> Self {
        let next_id = events
            .iter()
            .filter_map(|e| e.id().sequence())
            .max()
            .map_or(0, |n| n + 1);
        let next_tick = events
            .iter()
            .map(|e| e.timestamp().value())
            .max()
            .map_or(0, |t| t + 1);

        Self {
            ids: IdGenerator::starting_at(next_id),
            clock: LogicalClock::starting_at(next_tick),
        }
    }

    /// Build an `Equipment` event named `name`, optionally nested under `parent_id`.
    ///
    /// An absent or blank `parent_id` marks the event as a root.
    pub fn equipment(&mut self, name: &str, parent_id: Option<&str>) -> DomainResult<Event> {
        let name = required("equipment name", name)?;
        let parent = parse_parent(parent_id);
        Ok(self.event(Category::Equipment, parent, single(NAME_KEY, name)))
    }

    /// Build a `Property` event carrying the single pair `key = value`.
    ///
    /// The key must not be blank. An empty value is a value, not a missing
    /// argument, and is recorded as given.
    pub fn property(
        &mut self,
        key: &str,
        value: &str,
        parent_id: Option<&str>,
    ) -> DomainResult<Event> {
        let key = required("property key", key)?;
        let parent = parse_parent(parent_id);
        Ok(self.event(Category::Property, parent, single(key, value)))
    }

    /// Build an event of any category without payload validation.
    ///
    /// This is how reserved `Link` events get minted.
    pub fn event(&mut self, category: Category, parent_id: Option<EventId>, payload: Payload) -> Event {
        let id = self.ids.next_id(category);
        let timestamp = self.clock.tick();
        Event::from_parts(id, category, parent_id, 0, payload, timestamp)
    }
}

/// Reject blank input; accepted input is passed through untouched.
fn required<'a>(what: &str, value: &'a str) -> DomainResult<&'a str> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{what} is required")));
    }
    Ok(value)
}

fn parse_parent(parent_id: Option<&str>) -> Option<EventId> {
    parent_id.and_then(|p| p.parse().ok())
}

fn single(key: &str, value: &str) -> Payload {
    Payload::from([(key.to_string(), value.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use topology_core::Timestamp;

    #[test]
    fn equipment_event_carries_name_and_root_marker() {
        let mut factory = EventFactory::new();
        let event = factory.equipment("Laptop", None).unwrap();

        assert_eq!(event.id(), &"E0");
        assert_eq!(event.category(), Category::Equipment);
        assert!(event.is_root());
        assert_eq!(event.revision(), 0);
        assert_eq!(event.payload().get(NAME_KEY).map(String::as_str), Some("Laptop"));
        assert_eq!(event.timestamp(), Timestamp::new(0));
    }

    #[test]
    fn property_event_targets_parent() {
        let mut factory = EventFactory::new();
        factory.equipment("Laptop", None).unwrap();
        let event = factory.property("Manufacturer", "Apple", Some("E0")).unwrap();

        assert_eq!(event.id(), &"P1");
        assert_eq!(event.parent_id().map(EventId::as_str), Some("E0"));
        assert_eq!(event.payload().len(), 1);
        assert_eq!(event.timestamp(), Timestamp::new(1));
    }

    #[test]
    fn payload_is_stored_exactly_as_given() {
        let mut factory = EventFactory::new();
        let laptop = factory.equipment("  Laptop  ", None).unwrap();
        let note = factory.property(" Note", "  padded  ", Some("E0")).unwrap();

        assert_eq!(laptop.payload().get(NAME_KEY).unwrap(), "  Laptop  ");
        assert_eq!(note.payload().get(" Note").unwrap(), "  padded  ");
    }

    #[test]
    fn empty_property_value_is_accepted() {
        let mut factory = EventFactory::new();
        let event = factory.property("Note", "", Some("E0")).unwrap();

        assert_eq!(event.payload().get("Note").unwrap(), "");
        assert_eq!(event.id(), &"P0");
    }

    #[test]
    fn blank_parent_means_root() {
        let mut factory = EventFactory::new();
        let event = factory.equipment("Mouse", Some("  ")).unwrap();
        assert!(event.is_root());
    }

    #[test]
    fn rejects_missing_arguments_without_minting() {
        let mut factory = EventFactory::new();

        let err = factory.equipment("  ", None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = factory.property("  ", "Apple", Some("E0")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let event = factory.equipment("Laptop", None).unwrap();
        assert_eq!(event.id(), &"E0");
        assert_eq!(event.timestamp(), Timestamp::new(0));
    }

    #[test]
    fn resumes_past_recorded_events() {
        let mut first = EventFactory::new();
        let recorded = vec![
            first.equipment("Laptop", None).unwrap(),
            first.property("Manufacturer", "Apple", Some("E0")).unwrap(),
        ];

        let mut factory = EventFactory::resuming_after(&recorded);
        let event = factory.equipment("Mouse", None).unwrap();
        assert_eq!(event.id(), &"E2");
        assert_eq!(event.timestamp(), Timestamp::new(2));
    }

    #[test]
    fn link_events_use_fallback_prefix() {
        let mut factory = EventFactory::new();
        let event = factory.event(Category::Link, None, Payload::new());
        assert_eq!(event.id(), &"X0");
    }
}
