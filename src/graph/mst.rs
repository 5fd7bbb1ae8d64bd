//! Kruskal minimum spanning tree over triangulation edges.

use std::collections::HashMap;

use super::Edge;
use crate::grid::Point;

/// Disjoint-set forest with path halving and union by rank.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`. Returns `false` if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Dense indices for every endpoint, in order of first appearance.
pub(crate) fn index_points(edges: &[Edge]) -> HashMap<Point, usize> {
    let mut index = HashMap::new();
    for edge in edges {
        for p in [edge.a, edge.b] {
            let next = index.len();
            index.entry(p).or_insert(next);
        }
    }
    index
}

/// Reduce an edge set to a minimum spanning tree (forest, if disconnected).
///
/// Edges are considered shortest first; ties keep their input order, so the
/// result is deterministic for a given edge list.
pub fn minimum_spanning_tree(edges: &[Edge]) -> Vec<Edge> {
    let index = index_points(edges);
    let n = index.len();
    if n < 2 {
        return Vec::new();
    }

    let mut sorted = edges.to_vec();
    sorted.sort_by(|a, b| a.length().total_cmp(&b.length()));

    let mut sets = UnionFind::new(n);
    let mut tree = Vec::with_capacity(n - 1);

    for edge in sorted {
        if sets.union(index[&edge.a], index[&edge.b]) {
            tree.push(edge);
            if tree.len() == n - 1 {
                break;
            }
        }
    }

    tree
}
