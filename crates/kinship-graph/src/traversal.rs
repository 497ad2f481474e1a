//! Lazy traversals over one connected component.
//!
//! Both iterators borrow the graph, visit each reachable identity exactly
//! once, and break ties by neighbor insertion order. Calling
//! [`FriendGraph::bfs`] or [`FriendGraph::dfs`] again starts a fresh
//! traversal; cloning an iterator forks it at its current position.

use std::collections::{BTreeSet, VecDeque};
use std::iter::FusedIterator;

use kinship_types::IdentityKey;

use crate::graph::FriendGraph;

/// Breadth-first iterator. Yields the start identity first, then identities
/// in non-decreasing hop distance.
#[derive(Debug, Clone)]
pub struct Bfs<'g> {
    graph: &'g FriendGraph,
    queue: VecDeque<&'g IdentityKey>,
    visited: BTreeSet<&'g IdentityKey>,
}

impl<'g> Bfs<'g> {
    pub(crate) fn new(graph: &'g FriendGraph, start: &'g IdentityKey) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut visited = BTreeSet::new();
        visited.insert(start);
        Self {
            graph,
            queue,
            visited,
        }
    }
}

impl<'g> Iterator for Bfs<'g> {
    type Item = &'g IdentityKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        if let Some((_, neighbors)) = self.graph.entry(current) {
            for neighbor in neighbors {
                if self.visited.insert(neighbor) {
                    self.queue.push_back(neighbor);
                }
            }
        }
        Some(current)
    }
}

impl FusedIterator for Bfs<'_> {}

/// One level of the depth-first work stack: a vertex's neighbor list and the
/// index of the next neighbor to examine.
#[derive(Debug, Clone)]
struct Frame<'g> {
    neighbors: &'g [IdentityKey],
    next: usize,
}

/// Depth-first, pre-order iterator.
///
/// Descends into the first unvisited neighbor before backtracking. Uses an
/// explicit stack of [`Frame`]s, so traversal depth is bounded by memory, not
/// by the call stack.
#[derive(Debug, Clone)]
pub struct Dfs<'g> {
    graph: &'g FriendGraph,
    pending_start: Option<&'g IdentityKey>,
    stack: Vec<Frame<'g>>,
    visited: BTreeSet<&'g IdentityKey>,
}

impl<'g> Dfs<'g> {
    pub(crate) fn new(
        graph: &'g FriendGraph,
        start: &'g IdentityKey,
        neighbors: &'g [IdentityKey],
    ) -> Self {
        let mut visited = BTreeSet::new();
        visited.insert(start);
        Self {
            graph,
            pending_start: Some(start),
            stack: vec![Frame { neighbors, next: 0 }],
            visited,
        }
    }
}

impl<'g> Iterator for Dfs<'g> {
    type Item = &'g IdentityKey;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending_start.take() {
            return Some(start);
        }

        loop {
            let frame = self.stack.last_mut()?;
            let siblings = frame.neighbors;
            let Some(candidate) = siblings.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            frame.next = frame.next.saturating_add(1);

            if !self.visited.insert(candidate) {
                continue;
            }
            let neighbors = self
                .graph
                .entry(candidate)
                .map_or(&[][..], |(_, neighbors)| neighbors);
            self.stack.push(Frame { neighbors, next: 0 });
            return Some(candidate);
        }
    }
}

impl FusedIterator for Dfs<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kinship_types::IdentityKey;

    use crate::graph::FriendGraph;

    fn key(raw: &str) -> IdentityKey {
        IdentityKey::parse(raw).unwrap()
    }

    fn names<'a>(iter: impl Iterator<Item = &'a IdentityKey>) -> Vec<&'a str> {
        iter.map(IdentityKey::as_str).collect()
    }

    /// ```text
    ///   a - b - d
    ///   |   |
    ///   c - e     f - g   (separate component)
    /// ```
    fn sample() -> FriendGraph {
        let mut graph = FriendGraph::new();
        for (x, y) in [("a", "b"), ("a", "c"), ("b", "d"), ("b", "e"), ("c", "e"), ("f", "g")] {
            graph.add_edge(&key(x), &key(y));
        }
        graph
    }

    #[test]
    fn bfs_chain_scenario() {
        let mut graph = FriendGraph::new();
        graph.add_edge(&key("alice"), &key("bob"));
        graph.add_edge(&key("bob"), &key("carol"));
        assert_eq!(
            names(graph.bfs(&key("alice")).unwrap()),
            vec!["alice", "bob", "carol"]
        );
    }

    #[test]
    fn bfs_visits_by_layer_in_insertion_order() {
        let graph = sample();
        assert_eq!(
            names(graph.bfs(&key("a")).unwrap()),
            vec!["a", "b", "c", "d", "e"]
        );
    }

    #[test]
    fn dfs_descends_before_backtracking() {
        let graph = sample();
        // a -> b -> d (dead end) -> back to b -> e -> c
        assert_eq!(
            names(graph.dfs(&key("a")).unwrap()),
            vec!["a", "b", "d", "e", "c"]
        );
    }

    #[test]
    fn traversals_stay_in_component() {
        let graph = sample();
        assert_eq!(names(graph.bfs(&key("f")).unwrap()), vec!["f", "g"]);
        assert_eq!(names(graph.dfs(&key("g")).unwrap()), vec!["g", "f"]);
    }

    #[test]
    fn traversals_are_restartable() {
        let graph = sample();
        let first: Vec<_> = graph.bfs(&key("a")).unwrap().collect();
        let second: Vec<_> = graph.bfs(&key("a")).unwrap().collect();
        assert_eq!(first, second);

        let mut dfs = graph.dfs(&key("a")).unwrap();
        let _ = dfs.next();
        let fork = dfs.clone();
        assert_eq!(dfs.collect::<Vec<_>>(), fork.collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_entries_visited_once() {
        let mut graph = FriendGraph::new();
        graph.add_edge(&key("a"), &key("b"));
        graph.add_edge(&key("a"), &key("b"));
        graph.add_edge(&key("a"), &key("a"));
        assert_eq!(names(graph.bfs(&key("a")).unwrap()), vec!["a", "b"]);
        assert_eq!(names(graph.dfs(&key("a")).unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn isolated_vertex_yields_itself() {
        let mut graph = FriendGraph::new();
        graph.ensure_vertex(&key("solo"));
        assert_eq!(names(graph.bfs(&key("solo")).unwrap()), vec!["solo"]);
        assert_eq!(names(graph.dfs(&key("solo")).unwrap()), vec!["solo"]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut graph = FriendGraph::new();
        let chain: Vec<IdentityKey> = (0..50_000).map(|i| key(&format!("user{i}"))).collect();
        for pair in chain.windows(2) {
            if let [x, y] = pair {
                graph.add_edge(x, y);
            }
        }
        let start = chain.first().unwrap();
        assert_eq!(graph.dfs(start).unwrap().count(), chain.len());
    }
}
