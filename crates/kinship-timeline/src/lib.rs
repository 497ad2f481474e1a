//! Per-identity life-event histories for the Kinship social network.
//!
//! Every identity owns a stack of [`LifeEvent`]s: adding an event pushes it,
//! deleting removes the most recent one, and the most recent event is always
//! on top. Listings are oldest-first, which is also the order in which a log
//! is persisted, so replaying a saved file as sequential pushes rebuilds the
//! original stack.
//!
//! # Modules
//!
//! - [`log`] -- [`LifeEventLog`]: one identity's stack.
//! - [`store`] -- [`TimelineStore`]: the per-identity map of logs.
//!
//! [`LifeEvent`]: kinship_types::LifeEvent

pub mod log;
pub mod store;

pub use log::LifeEventLog;
pub use store::TimelineStore;

use kinship_types::IdentityKey;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when editing a timeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// The identity has no events to remove.
    #[error("no life events recorded for {0}")]
    EmptyLog(IdentityKey),
}
