//! Error types for the `kinship-graph` crate.

use kinship_types::IdentityKey;

/// Errors that can occur during graph queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The identity was never inserted into the graph.
    #[error("identity not found in the friendship graph: {0}")]
    IdentityNotFound(IdentityKey),
}
