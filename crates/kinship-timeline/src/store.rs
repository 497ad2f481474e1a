//! The per-identity map of life-event logs.
//!
//! A [`TimelineStore`] is owned by the session object and keyed by
//! [`IdentityKey`]. An identity the store has never seen behaves like one
//! with an empty log: reads return nothing, and only [`TimelineStore::pop`]
//! reports [`TimelineError::EmptyLog`].

use std::collections::BTreeMap;

use kinship_types::{IdentityKey, LifeEvent};

use crate::TimelineError;
use crate::log::LifeEventLog;

/// Life-event logs for every identity touched in this session.
#[derive(Debug, Clone, Default)]
pub struct TimelineStore {
    logs: BTreeMap<IdentityKey, LifeEventLog>,
}

impl TimelineStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            logs: BTreeMap::new(),
        }
    }

    /// Push `event` onto `key`'s log.
    pub fn push(&mut self, key: &IdentityKey, event: LifeEvent) {
        tracing::debug!(%key, "life event pushed");
        self.logs.entry(key.clone()).or_default().push(event);
    }

    /// Remove and return `key`'s most recent event.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::EmptyLog`] if `key` has no events.
    pub fn pop(&mut self, key: &IdentityKey) -> Result<LifeEvent, TimelineError> {
        let event = self
            .logs
            .get_mut(key)
            .and_then(LifeEventLog::pop)
            .ok_or_else(|| TimelineError::EmptyLog(key.clone()))?;
        tracing::debug!(%key, "life event popped");
        Ok(event)
    }

    /// `key`'s most recent event, or `None` if there is none.
    pub fn peek(&self, key: &IdentityKey) -> Option<&LifeEvent> {
        self.logs.get(key).and_then(LifeEventLog::peek)
    }

    /// All of `key`'s events, oldest first. Empty for an unseen identity.
    pub fn list_all(&self, key: &IdentityKey) -> &[LifeEvent] {
        self.logs.get(key).map_or(&[][..], LifeEventLog::as_slice)
    }

    /// Borrow `key`'s log, if the store holds one.
    pub fn log(&self, key: &IdentityKey) -> Option<&LifeEventLog> {
        self.logs.get(key)
    }

    /// Whether a log for `key` has been loaded or created.
    pub fn is_loaded(&self, key: &IdentityKey) -> bool {
        self.logs.contains_key(key)
    }

    /// Install a log loaded from storage, replacing any log already held.
    pub fn insert_log(&mut self, key: IdentityKey, log: LifeEventLog) -> Option<LifeEventLog> {
        self.logs.insert(key, log)
    }

    /// Iterate over every held log, ordered by key.
    pub fn logs(&self) -> impl Iterator<Item = (&IdentityKey, &LifeEventLog)> {
        self.logs.iter()
    }
}
