//! The directory collaborator.
//!
//! The graph engine and the timelines only ever hold [`IdentityKey`]s. A
//! [`Directory`] turns those keys back into presentable [`Identity`] values
//! and knows which identity, if any, is currently signed in.

use crate::identity::{Identity, IdentityKey};

/// Resolves identity keys and tracks the active identity.
pub trait Directory {
    /// Look up the identity registered under `key`.
    ///
    /// Returns `None` when no such identity exists.
    fn resolve(&self, key: &IdentityKey) -> Option<Identity>;

    /// Return the identity of the current session, or `None` if nobody is
    /// signed in.
    fn current_identity(&self) -> Option<Identity>;

    /// Whether `key` is registered.
    fn contains(&self, key: &IdentityKey) -> bool {
        self.resolve(key).is_some()
    }
}
