//! Session orchestration for the Kinship social network.
//!
//! This crate owns the [`Network`] session object: the registered profiles,
//! the friendship graph and the life-event timelines of one data directory,
//! together with the policy deciding when changes reach disk.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `kinship.yaml` into
//!   strongly-typed structs.
//! - [`directory`] -- [`ProfileDirectory`]: registration, login and the
//!   current identity.
//! - [`network`] -- [`Network`]: every user-facing operation, plus
//!   [`NetworkStats`].
//! - [`error`] -- [`CoreError`].

pub mod config;
pub mod directory;
pub mod error;
pub mod network;

pub use config::{ConfigError, LogFormat, NetworkConfig, PersistenceMode};
pub use directory::ProfileDirectory;
pub use error::CoreError;
pub use network::{Network, NetworkStats};
