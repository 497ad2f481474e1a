//! A single identity's life-event stack.

use kinship_types::LifeEvent;

/// Ordered life-event history with stack discipline.
///
/// Internally the events are held oldest-first; the top of the stack is the
/// last element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifeEventLog {
    /// Events, oldest first.
    events: Vec<LifeEvent>,
}

impl LifeEventLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push `event` as the new most recent entry.
    pub fn push(&mut self, event: LifeEvent) {
        self.events.push(event);
    }

    /// Remove and return the most recent entry, or `None` if the log is
    /// empty.
    pub fn pop(&mut self) -> Option<LifeEvent> {
        self.events.pop()
    }

    /// The most recent entry, if any.
    pub fn peek(&self) -> Option<&LifeEvent> {
        self.events.last()
    }

    /// All entries, oldest first. Never mutates the log.
    pub fn as_slice(&self) -> &[LifeEvent] {
        &self.events
    }

    /// All entries, most recent first.
    pub fn iter_recent(&self) -> impl Iterator<Item = &LifeEvent> {
        self.events.iter().rev()
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no entries.
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<LifeEvent> for LifeEventLog {
    /// Replay `events` as sequential pushes, so the last item ends up on top.
    fn from_iter<I: IntoIterator<Item = LifeEvent>>(iter: I) -> Self {
        let mut log = Self::new();
        for event in iter {
            log.push(event);
        }
        log
    }
}
