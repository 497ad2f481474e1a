//! Undirected friendship graph for the Kinship social network.
//!
//! The graph maps every known [`IdentityKey`] to the ordered sequence of its
//! friends. Inserting a friendship records it on both sides, so the relation
//! is always symmetric; traversal order follows insertion order.
//!
//! # Modules
//!
//! - [`graph`] -- [`FriendGraph`]: edge insertion, neighbor lookup, the
//!   friends-of-friends set and shortest friendship paths.
//! - [`traversal`] -- lazy breadth-first ([`Bfs`]) and depth-first ([`Dfs`])
//!   iterators over one connected component.
//! - [`error`] -- [`GraphError`].
//!
//! [`IdentityKey`]: kinship_types::IdentityKey

pub mod error;
pub mod graph;
pub mod traversal;

// Re-export primary types at crate root.
pub use error::GraphError;
pub use graph::{DuplicatePolicy, FriendGraph};
pub use traversal::{Bfs, Dfs};
