//! File persistence for the Kinship social network.
//!
//! All state lives in plain text files under one data directory. Every save
//! rewrites its file completely; loads are lenient and never fail on content,
//! only on I/O.
//!
//! ```text
//! data/
//!   users.txt                    profile records, five lines each
//!   friends.txt                  key:friend1,friend2,...,
//!   life_events_<key>.txt        one event per line, oldest first
//! ```
//!
//! # Modules
//!
//! - [`layout`] -- [`DataLayout`]: where each artifact lives
//! - [`adjacency`] -- [`AdjacencyFile`]: the friendship graph snapshot
//! - [`events`] -- [`EventLogFile`]: one identity's life-event log
//! - [`profiles`] -- [`ProfileFile`]: registration records
//! - [`fs`] -- whole-file reads and crash-safe rewrites
//! - [`error`] -- [`StoreError`]

pub mod adjacency;
pub mod error;
pub mod events;
pub mod fs;
pub mod layout;
pub mod profiles;

// Re-export primary types for convenience.
pub use adjacency::{AdjacencyFile, AdjacencyLoadReport};
pub use error::StoreError;
pub use events::{EventLogFile, EventLogLoadReport};
pub use layout::DataLayout;
pub use profiles::{ProfileFile, ProfileLoadReport};
