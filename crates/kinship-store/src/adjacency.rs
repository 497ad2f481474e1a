//! The friendship adjacency snapshot.
//!
//! One line per identity with at least one recorded friend:
//!
//! ```text
//! alice@example.com:bob@example.com,carol@example.com,
//! bob@example.com:alice@example.com,
//! ```
//!
//! Each friendship therefore appears on both endpoints' lines. Loading is a
//! lenient merge against a [`Directory`]: lines without a `:` are malformed
//! and skipped, and keys the directory does not know are dropped. Neither
//! aborts the load.

use std::path::{Path, PathBuf};

use kinship_graph::{DuplicatePolicy, FriendGraph};
use kinship_types::{Directory, IdentityKey};

use crate::error::StoreError;
use crate::fs;

/// What happened while loading an adjacency snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjacencyLoadReport {
    /// No snapshot existed; the graph starts empty.
    pub missing: bool,
    /// Lines merged into the graph.
    pub records: usize,
    /// Lines skipped because they had no `:` separator or no valid owner key.
    pub skipped_malformed: usize,
    /// Lines skipped because their owner is not in the directory.
    pub skipped_unknown_owner: usize,
    /// Neighbor keys dropped because they are not in the directory.
    pub skipped_unknown_neighbor: usize,
    /// Reverse entries added to restore symmetry after the merge.
    pub repaired: usize,
}

/// Render `graph` in snapshot format.
///
/// Identities without friends are omitted.
pub fn encode(graph: &FriendGraph) -> String {
    let mut out = String::new();
    for (owner, neighbors) in graph.adjacency() {
        if neighbors.is_empty() {
            continue;
        }
        out.push_str(owner.as_str());
        out.push(':');
        for neighbor in neighbors {
            out.push_str(neighbor.as_str());
            out.push(',');
        }
        out.push('\n');
    }
    out
}

/// Rebuild a graph from snapshot text, keeping only keys `directory` knows.
pub fn decode<D>(
    text: &str,
    directory: &D,
    policy: DuplicatePolicy,
) -> (FriendGraph, AdjacencyLoadReport)
where
    D: Directory + ?Sized,
{
    let mut graph = FriendGraph::with_policy(policy);
    let mut report = AdjacencyLoadReport::default();

    for (line_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((owner_raw, friends_raw)) = line.split_once(':') else {
            report.skipped_malformed = report.skipped_malformed.saturating_add(1);
            tracing::warn!(line = line_idx.saturating_add(1), "adjacency record without ':' separator, skipping");
            continue;
        };

        let Ok(owner) = IdentityKey::parse(owner_raw) else {
            report.skipped_malformed = report.skipped_malformed.saturating_add(1);
            tracing::warn!(
                line = line_idx.saturating_add(1),
                owner = owner_raw,
                "adjacency record with blank or invalid owner, skipping"
            );
            continue;
        };
        if !directory.contains(&owner) {
            report.skipped_unknown_owner = report.skipped_unknown_owner.saturating_add(1);
            tracing::warn!(
                line = line_idx.saturating_add(1),
                owner = owner_raw,
                "adjacency record for unknown identity, skipping"
            );
            continue;
        }

        let mut neighbors = Vec::new();
        for neighbor_raw in friends_raw.split(',').filter(|s| !s.trim().is_empty()) {
            if let Some(neighbor) = known_key(neighbor_raw, directory) {
                neighbors.push(neighbor);
            } else {
                report.skipped_unknown_neighbor = report.skipped_unknown_neighbor.saturating_add(1);
                tracing::warn!(%owner, neighbor = neighbor_raw, "dropping unknown friend");
            }
        }

        graph.ensure_vertex(&owner);
        graph.restore_neighbors(&owner, neighbors);
        report.records = report.records.saturating_add(1);
    }

    report.repaired = graph.repair_symmetry();
    (graph, report)
}

fn known_key<D>(raw: &str, directory: &D) -> Option<IdentityKey>
where
    D: Directory + ?Sized,
{
    IdentityKey::parse(raw)
        .ok()
        .filter(|key| directory.contains(key))
}

/// The adjacency snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyFile {
    path: PathBuf,
}

impl AdjacencyFile {
    /// Bind to the snapshot at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot's location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the snapshot from `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be replaced.
    pub fn save(&self, graph: &FriendGraph) -> Result<(), StoreError> {
        fs::write_atomic(&self.path, &encode(graph))?;
        tracing::debug!(
            path = %self.path.display(),
            identities = graph.vertex_count(),
            "adjacency snapshot saved"
        );
        Ok(())
    }

    /// Load the snapshot, resolving keys against `directory`.
    ///
    /// A missing file yields an empty graph with
    /// [`AdjacencyLoadReport::missing`] set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load<D>(
        &self,
        directory: &D,
        policy: DuplicatePolicy,
    ) -> Result<(FriendGraph, AdjacencyLoadReport), StoreError>
    where
        D: Directory + ?Sized,
    {
        let Some(text) = fs::read_optional(&self.path)? else {
            tracing::info!(path = %self.path.display(), "no existing friend data found, starting fresh");
            let report = AdjacencyLoadReport {
                missing: true,
                ..AdjacencyLoadReport::default()
            };
            return Ok((FriendGraph::with_policy(policy), report));
        };

        let (graph, report) = decode(&text, directory, policy);
        tracing::info!(
            path = %self.path.display(),
            records = report.records,
            skipped_malformed = report.skipped_malformed,
            skipped_unknown_owner = report.skipped_unknown_owner,
            skipped_unknown_neighbor = report.skipped_unknown_neighbor,
            repaired = report.repaired,
            "adjacency snapshot loaded"
        );
        Ok((graph, report))
    }
}
