//! The store: owns the event log and the projection derived from it.

use std::sync::Arc;

use topology_core::{Category, DomainResult, EventId};
use topology_events::{ChildLinking, Event, EventFactory, Payload, Projection, build_with};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::event_log::{EventLog, InMemoryEventLog};

/// Event log + materialized projection, kept in step.
///
/// Every successful [`append`](Store::append) replays the whole log and swaps
/// in a fresh projection generation. Readers only ever see complete
/// generations: the accessors hand out the log as a slice and the projection
/// as a shared, immutable snapshot.
///
/// The store also owns the [`EventFactory`], so ids and timestamps are minted
/// in the same order events reach the log.
#[derive(Debug)]
pub struct Store<L = InMemoryEventLog> {
    log: L,
    factory: EventFactory,
    child_linking: ChildLinking,
    projection: Arc<Projection>,
}

impl Store<InMemoryEventLog> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Configure from the process environment (see [`StoreConfig::from_env`]).
    pub fn from_env() -> Result<Self, StoreError> {
        Ok(Self::with_config(StoreConfig::from_env()?))
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_log(InMemoryEventLog::new(), config)
    }
}

impl Default for Store<InMemoryEventLog> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: EventLog> Store<L> {
    /// Wrap an existing log. Minting resumes after whatever it already holds.
    pub fn with_log(log: L, config: StoreConfig) -> Self {
        let factory = EventFactory::resuming_after(log.all());
        let projection = Arc::new(build_with(log.all(), config.child_linking));
        Self {
            log,
            factory,
            child_linking: config.child_linking,
            projection,
        }
    }

    /// Build an equipment event (not yet appended).
    pub fn create_equipment_event(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
    ) -> DomainResult<Event> {
        self.factory.equipment(name, parent_id)
    }

    /// Build a property event (not yet appended).
    pub fn create_property_event(
        &mut self,
        key: &str,
        value: &str,
        parent_id: Option<&str>,
    ) -> DomainResult<Event> {
        self.factory.property(key, value, parent_id)
    }

    /// Build an event of any category (not yet appended).
    pub fn create_event(
        &mut self,
        category: Category,
        parent_id: Option<EventId>,
        payload: Payload,
    ) -> Event {
        self.factory.event(category, parent_id, payload)
    }

    /// Append `event` and rebuild the projection from the full log.
    ///
    /// Events must reach the log in the order they were minted. An event that
    /// would break id uniqueness or timestamp order is rejected and the store
    /// is left exactly as it was.
    pub fn append(&mut self, event: Event) -> Result<(), StoreError> {
        let id = event.id().clone();
        let category = event.category();
        let timestamp = event.timestamp();

        if let Err(err) = self.log.append(event) {
            tracing::warn!(event_id = %id, error = %err, "rejected append");
            return Err(err.into());
        }
        tracing::debug!(event_id = %id, %category, %timestamp, "appended event");

        self.rebuild();
        Ok(())
    }

    /// Mint an event with `make` and append it as one step.
    pub fn record<F>(&mut self, make: F) -> Result<Event, StoreError>
    where
        F: FnOnce(&mut EventFactory) -> DomainResult<Event>,
    {
        let event = make(&mut self.factory)?;
        self.append(event.clone())?;
        Ok(event)
    }

    pub fn record_equipment(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<EventId, StoreError> {
        self.record(|f| f.equipment(name, parent_id))
            .map(|event| event.id().clone())
    }

    pub fn record_property(
        &mut self,
        key: &str,
        value: &str,
        parent_id: Option<&str>,
    ) -> Result<EventId, StoreError> {
        self.record(|f| f.property(key, value, parent_id))
            .map(|event| event.id().clone())
    }

    /// The full log, in append order.
    pub fn current_log(&self) -> &[Event] {
        self.log.all()
    }

    /// The latest projection generation.
    pub fn current_projection(&self) -> Arc<Projection> {
        Arc::clone(&self.projection)
    }

    pub fn child_linking(&self) -> ChildLinking {
        self.child_linking
    }

    fn rebuild(&mut self) {
        let projection = build_with(self.log.all(), self.child_linking);
        tracing::debug!(
            roots = projection.len(),
            events = self.log.len(),
            "rebuilt projection"
        );
        self.projection = Arc::new(projection);
    }
}
