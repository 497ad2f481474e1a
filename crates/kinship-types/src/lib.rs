//! Shared type definitions for the Kinship social graph.
//!
//! This crate is the single source of truth for the values that flow between
//! the graph engine, the life-event timelines, the persistence layer and the
//! console front end.
//!
//! # Modules
//!
//! - [`identity`] -- [`IdentityKey`] and [`Identity`], keyed by an email-like
//!   string
//! - [`event`] -- [`LifeEvent`], a single-line free-text history entry
//! - [`profile`] -- [`Profile`], the registration record behind an identity
//! - [`directory`] -- the [`Directory`] collaborator that resolves keys
//! - [`error`] -- validation errors for the types above

pub mod directory;
pub mod error;
pub mod event;
pub mod identity;
pub mod profile;

// Re-export all public types at crate root for convenience.
pub use directory::Directory;
pub use error::TypesError;
pub use event::LifeEvent;
pub use identity::{Identity, IdentityKey, MAX_KEY_LEN};
pub use profile::{DATE_FORMAT, Profile};
