//! Logical time: a monotonically increasing counter, not wall-clock time.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Position of an event in insertion order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Hands out strictly increasing timestamps.
#[derive(Debug, Default, Clone)]
pub struct LogicalClock {
    next: u64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn tick(&mut self) -> Timestamp {
        let now = Timestamp(self.next);
        self.next += 1;
        now
    }
}
