use thiserror::Error;

use topology_core::DomainError;

use crate::event_log::EventLogError;

/// Store operation error.
///
/// - **Domain**: the caller's input was rejected before anything was minted
/// - **Log**: an append would have broken ordering (fatal, never retried)
/// - **Poisoned**: a writer panicked while holding the shared store
/// - **Config**: the store could not be configured
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("append rejected: {0}")]
    Log(#[from] EventLogError),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Internal-consistency faults; surface them, do not retry.
    pub fn is_fatal(&self) -> bool {
        match self {
            StoreError::Log(_) | StoreError::Poisoned => true,
            StoreError::Domain(_) | StoreError::Config(_) => false,
        }
    }
}
