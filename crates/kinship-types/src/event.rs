//! Life events: single-line free-text history entries.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// One entry in a participant's life-event history.
///
/// The text is unstructured, but must be non-blank and must fit on a single
/// line: the on-disk log stores one event per line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LifeEvent(String);

impl LifeEvent {
    /// Validate and wrap event text.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::EmptyEvent`] for blank text and
    /// [`TypesError::MultilineEvent`] if the text contains a line break.
    pub fn new(text: impl Into<String>) -> Result<Self, TypesError> {
        let text = text.into();
        if text.contains(['\n', '\r']) {
            return Err(TypesError::MultilineEvent);
        }
        if text.trim().is_empty() {
            return Err(TypesError::EmptyEvent);
        }
        Ok(Self(text))
    }

    /// Return the event text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LifeEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LifeEvent {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LifeEvent> for String {
    fn from(event: LifeEvent) -> Self {
        event.0
    }
}
