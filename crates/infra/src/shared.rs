//! Store shared between concurrent producers.

use std::sync::{Arc, Mutex, MutexGuard};

use topology_core::{DomainResult, EventId};
use topology_events::{Event, EventFactory, Projection};

use crate::error::StoreError;
use crate::event_log::{EventLog, InMemoryEventLog};
use crate::store::Store;

/// A [`Store`] behind a single lock.
///
/// Minting, appending and rebuilding happen inside one critical section, so
/// mint order, append order and timestamp order can never diverge. Readers
/// get owned snapshots, never a handle into the store.
#[derive(Debug)]
pub struct SharedStore<L = InMemoryEventLog> {
    inner: Mutex<Store<L>>,
}

impl<L: EventLog> SharedStore<L> {
    pub fn new(store: Store<L>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Mint with `make` and append, holding the lock throughout.
    pub fn record<F>(&self, make: F) -> Result<Event, StoreError>
    where
        F: FnOnce(&mut EventFactory) -> DomainResult<Event>,
    {
        self.lock()?.record(make)
    }

    pub fn record_equipment(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<EventId, StoreError> {
        self.lock()?.record_equipment(name, parent_id)
    }

    pub fn record_property(
        &self,
        key: &str,
        value: &str,
        parent_id: Option<&str>,
    ) -> Result<EventId, StoreError> {
        self.lock()?.record_property(key, value, parent_id)
    }

    /// Append an event minted elsewhere. It must still arrive in mint order.
    pub fn append(&self, event: Event) -> Result<(), StoreError> {
        self.lock()?.append(event)
    }

    pub fn current_log(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.lock()?.current_log().to_vec())
    }

    pub fn current_projection(&self) -> Result<Arc<Projection>, StoreError> {
        Ok(self.lock()?.current_projection())
    }

    pub fn into_inner(self) -> Result<Store<L>, StoreError> {
        self.inner.into_inner().map_err(|_| StoreError::Poisoned)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store<L>>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for SharedStore<InMemoryEventLog> {
    fn default() -> Self {
        Self::new(Store::new())
    }
}

impl<L: EventLog> From<Store<L>> for SharedStore<L> {
    fn from(store: Store<L>) -> Self {
        Self::new(store)
    }
}
