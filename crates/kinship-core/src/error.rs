//! Error types for session operations.
//!
//! Every variant except [`CoreError::Store`] is an expected, recoverable
//! condition that the console renders as a message.

use kinship_graph::GraphError;
use kinship_store::StoreError;
use kinship_timeline::TimelineError;
use kinship_types::{IdentityKey, TypesError};

/// Errors returned by [`crate::Network`] operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The operation needs a logged-in identity.
    #[error("you need to log in first")]
    NotLoggedIn,

    /// The identity is not registered, or unknown to the graph.
    #[error("user not found: {0}")]
    NotFound(IdentityKey),

    /// Registration with an email that is already taken.
    #[error("email already registered: {0}")]
    AlreadyRegistered(IdentityKey),

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Nothing to remove from the identity's life-event log.
    #[error("no life events recorded for {0}")]
    EmptyLog(IdentityKey),

    /// A profile field would break the line-oriented record format.
    #[error("{field} must fit on a single line")]
    MultilineField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// User input failed validation.
    #[error(transparent)]
    Invalid(#[from] TypesError),

    /// Reading or writing a snapshot failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GraphError> for CoreError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::IdentityNotFound(key) => Self::NotFound(key),
        }
    }
}

impl From<TimelineError> for CoreError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::EmptyLog(key) => Self::EmptyLog(key),
        }
    }
}
