//! Bounded history of notable simulation events, for whatever front end
//! drives the simulation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Events kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 20;

/// One entry in the [`EventLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Generation running when it happened.
    pub generation: u32,
    /// Tick within that generation.
    pub tick: u64,
    /// What happened.
    pub description: String,
    /// Category hint for display.
    pub kind: EventKind,
}

/// Event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new generation started.
    Generation,
    /// The best distance improved.
    Record,
    /// A controller was loaded, saved or forgotten.
    Controller,
    /// Something was rejected or skipped.
    Warning,
}

/// Most recent events, newest first, capped at a fixed capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    /// An empty log holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an event, dropping the oldest once full.
    pub fn log(&mut self, generation: u32, tick: u64, description: impl Into<String>, kind: EventKind) {
        self.entries.push_front(LoggedEvent {
            generation,
            tick,
            description: description.into(),
            kind,
        });
        self.entries.truncate(self.capacity);
    }

    /// Every kept event, newest first.
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.entries
    }

    /// The newest event.
    pub fn latest(&self) -> Option<&LoggedEvent> {
        self.entries.front()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
