//! Friendship graph: identities as vertices, friendships as undirected edges.
//!
//! The [`FriendGraph`] stores one insertion-ordered neighbor list per
//! identity: `BTreeMap<IdentityKey, Vec<IdentityKey>>`. A friendship between
//! `a` and `b` appears as `b` in `a`'s list and `a` in `b`'s list. Direction
//! is never stored.
//!
//! A key present in the map with an empty list is "known, no friends"; a key
//! absent from the map is unknown and every query on it reports
//! [`GraphError::IdentityNotFound`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use kinship_types::IdentityKey;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::traversal::{Bfs, Dfs};

/// What [`FriendGraph::add_edge`] does with a friendship that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Record the repeated friendship again (multiset semantics).
    #[default]
    Keep,
    /// Leave the neighbor lists untouched (set semantics).
    Ignore,
}

/// The undirected friendship graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendGraph {
    /// Identity -> friends, in insertion order.
    adjacency: BTreeMap<IdentityKey, Vec<IdentityKey>>,
    /// Handling of repeated insertions.
    policy: DuplicatePolicy,
}

impl FriendGraph {
    /// Create an empty graph that keeps duplicate friendships.
    pub const fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Keep)
    }

    /// Create an empty graph with an explicit duplicate policy.
    pub const fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            adjacency: BTreeMap::new(),
            policy,
        }
    }

    /// The duplicate policy in force.
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Make `key` known to the graph with no friends.
    ///
    /// Returns `true` if the key was not known before.
    pub fn ensure_vertex(&mut self, key: &IdentityKey) -> bool {
        if self.adjacency.contains_key(key) {
            return false;
        }
        self.adjacency.insert(key.clone(), Vec::new());
        true
    }

    /// Record a friendship between `a` and `b`.
    ///
    /// Both identities become known if they were not already. Self-edges are
    /// accepted. Returns `true` if any neighbor entry was written, which is
    /// always the case under [`DuplicatePolicy::Keep`].
    pub fn add_edge(&mut self, a: &IdentityKey, b: &IdentityKey) -> bool {
        if self.policy == DuplicatePolicy::Ignore && self.is_neighbor(a, b) {
            tracing::debug!(%a, %b, "friendship already recorded, ignoring");
            return false;
        }

        self.adjacency.entry(a.clone()).or_default().push(b.clone());
        if a != b || self.policy == DuplicatePolicy::Keep {
            self.adjacency.entry(b.clone()).or_default().push(a.clone());
        }

        tracing::debug!(%a, %b, "friendship recorded");
        true
    }

    /// Append `neighbors` to `owner`'s list without touching the reverse
    /// direction.
    ///
    /// This is the snapshot loader's entry point: the adjacency file already
    /// lists each friendship from both sides. Under
    /// [`DuplicatePolicy::Ignore`] neighbors already present are skipped.
    /// Call [`FriendGraph::repair_symmetry`] once loading is complete.
    pub fn restore_neighbors<I>(&mut self, owner: &IdentityKey, neighbors: I)
    where
        I: IntoIterator<Item = IdentityKey>,
    {
        let policy = self.policy;
        let list = self.adjacency.entry(owner.clone()).or_default();
        for neighbor in neighbors {
            if policy == DuplicatePolicy::Ignore && list.contains(&neighbor) {
                continue;
            }
            list.push(neighbor);
        }
    }

    /// Add any reverse entry missing from the neighbor lists.
    ///
    /// After a lenient load (stale lines dropped on one side only) the
    /// symmetry invariant may be broken; this restores it. Returns the number
    /// of entries added.
    pub fn repair_symmetry(&mut self) -> usize {
        let mut missing: Vec<(IdentityKey, IdentityKey)> = Vec::new();
        for (owner, neighbors) in &self.adjacency {
            for neighbor in neighbors {
                let reciprocated = self
                    .adjacency
                    .get(neighbor)
                    .is_some_and(|back| back.contains(owner));
                if !reciprocated && !missing.iter().any(|(n, o)| n == neighbor && o == owner) {
                    missing.push((neighbor.clone(), owner.clone()));
                }
            }
        }

        for (neighbor, owner) in &missing {
            tracing::warn!(%neighbor, %owner, "restoring missing reverse friendship");
            self.adjacency
                .entry(neighbor.clone())
                .or_default()
                .push(owner.clone());
        }
        missing.len()
    }

    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// Whether `key` is known to the graph.
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.adjacency.contains_key(key)
    }

    /// Whether `b` appears in `a`'s neighbor list.
    pub fn is_neighbor(&self, a: &IdentityKey, b: &IdentityKey) -> bool {
        self.adjacency.get(a).is_some_and(|list| list.contains(b))
    }

    /// Return `key`'s friends in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdentityNotFound`] if `key` is unknown.
    pub fn neighbors(&self, key: &IdentityKey) -> Result<&[IdentityKey], GraphError> {
        self.adjacency
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| GraphError::IdentityNotFound(key.clone()))
    }

    /// Number of neighbor entries recorded for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdentityNotFound`] if `key` is unknown.
    pub fn degree(&self, key: &IdentityKey) -> Result<usize, GraphError> {
        self.neighbors(key).map(<[IdentityKey]>::len)
    }

    /// Number of known identities.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct friendships (unordered pairs, self-edges included).
    pub fn friendship_count(&self) -> usize {
        let mut pairs: BTreeSet<(&IdentityKey, &IdentityKey)> = BTreeSet::new();
        for (owner, neighbors) in &self.adjacency {
            for neighbor in neighbors {
                let pair = if owner <= neighbor {
                    (owner, neighbor)
                } else {
                    (neighbor, owner)
                };
                pairs.insert(pair);
            }
        }
        pairs.len()
    }

    /// Iterate over every known identity and its neighbor list, ordered by
    /// key.
    pub fn adjacency(&self) -> impl Iterator<Item = (&IdentityKey, &[IdentityKey])> {
        self.adjacency
            .iter()
            .map(|(key, neighbors)| (key, neighbors.as_slice()))
    }

    /// Borrow the graph's own copy of `key` together with its neighbors.
    pub(crate) fn entry(&self, key: &IdentityKey) -> Option<(&IdentityKey, &[IdentityKey])> {
        self.adjacency
            .get_key_value(key)
            .map(|(k, neighbors)| (k, neighbors.as_slice()))
    }

    // -------------------------------------------------------------------
    // Graph queries
    // -------------------------------------------------------------------

    /// Identities exactly two hops from `key`: friends of friends that are
    /// neither `key` itself nor already a direct friend.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdentityNotFound`] if `key` is unknown.
    pub fn two_hop(&self, key: &IdentityKey) -> Result<BTreeSet<IdentityKey>, GraphError> {
        let direct = self.neighbors(key)?;
        let direct_set: BTreeSet<&IdentityKey> = direct.iter().collect();

        let mut result = BTreeSet::new();
        for friend in direct_set.iter().copied() {
            let Some(friends_of_friend) = self.adjacency.get(friend) else {
                continue;
            };
            for candidate in friends_of_friend {
                if candidate != key && !direct_set.contains(candidate) {
                    result.insert(candidate.clone());
                }
            }
        }
        Ok(result)
    }

    /// Breadth-first traversal of `start`'s connected component.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdentityNotFound`] if `start` is unknown.
    pub fn bfs(&self, start: &IdentityKey) -> Result<Bfs<'_>, GraphError> {
        let (key, _) = self
            .entry(start)
            .ok_or_else(|| GraphError::IdentityNotFound(start.clone()))?;
        Ok(Bfs::new(self, key))
    }

    /// Depth-first, pre-order traversal of `start`'s connected component.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdentityNotFound`] if `start` is unknown.
    pub fn dfs(&self, start: &IdentityKey) -> Result<Dfs<'_>, GraphError> {
        let (key, neighbors) = self
            .entry(start)
            .ok_or_else(|| GraphError::IdentityNotFound(start.clone()))?;
        Ok(Dfs::new(self, key, neighbors))
    }

    /// Find a shortest chain of friendships from `from` to `to`.
    ///
    /// Returns the ordered list of keys from `from` to `to` (inclusive), or
    /// `None` if they are in different components.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdentityNotFound`] if either endpoint is
    /// unknown.
    pub fn path_between(
        &self,
        from: &IdentityKey,
        to: &IdentityKey,
    ) -> Result<Option<Vec<IdentityKey>>, GraphError> {
        let (start, _) = self
            .entry(from)
            .ok_or_else(|| GraphError::IdentityNotFound(from.clone()))?;
        let (goal, _) = self
            .entry(to)
            .ok_or_else(|| GraphError::IdentityNotFound(to.clone()))?;

        if start == goal {
            return Ok(Some(vec![start.clone()]));
        }

        // Predecessor map doubles as the visited set.
        let mut prev: BTreeMap<&IdentityKey, &IdentityKey> = BTreeMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        'search: while let Some(current) = queue.pop_front() {
            let Some(neighbors) = self.adjacency.get(current) else {
                continue;
            };
            for neighbor in neighbors {
                if neighbor == start || prev.contains_key(neighbor) {
                    continue;
                }
                prev.insert(neighbor, current);
                if neighbor == goal {
                    break 'search;
                }
                queue.push_back(neighbor);
            }
        }

        if !prev.contains_key(goal) {
            return Ok(None);
        }

        let mut path = VecDeque::new();
        let mut current = goal;
        path.push_front(current.clone());
        while let Some(&predecessor) = prev.get(current) {
            path.push_front(predecessor.clone());
            current = predecessor;
        }

        Ok(Some(path.into_iter().collect()))
    }
}
