//! Region connectivity graph
//!
//! Region representatives are triangulated, the triangulation is reduced to a
//! minimum spanning tree, and the tree's leaves are classified as dead ends.
//! The tree edges are the corridors the tunnel carver opens.

pub mod mst;
pub mod triangulation;

use std::collections::HashMap;

use crate::grid::Point;

pub use mst::{minimum_spanning_tree, UnionFind};
pub use triangulation::triangulate;

/// Unordered pair of points. Endpoints are stored in sorted order so that
/// `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: Point,
    pub b: Point,
}

impl Edge {
    pub fn new(a: Point, b: Point) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Euclidean length, the edge weight.
    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }
}

/// Number of edges incident to every point that appears in `edges`.
pub fn degrees(edges: &[Edge]) -> HashMap<Point, usize> {
    let mut degree = HashMap::new();
    for edge in edges {
        *degree.entry(edge.a).or_insert(0) += 1;
        *degree.entry(edge.b).or_insert(0) += 1;
    }
    degree
}

/// Points with exactly one incident edge, sorted.
pub fn find_dead_ends(edges: &[Edge]) -> Vec<Point> {
    let mut dead_ends: Vec<Point> = degrees(edges)
        .into_iter()
        .filter(|&(_, d)| d == 1)
        .map(|(p, _)| p)
        .collect();
    dead_ends.sort();
    dead_ends
}

/// Spanning tree over region representatives.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityGraph {
    pub points: Vec<Point>,
    pub edges: Vec<Edge>,
}

impl ConnectivityGraph {
    /// Connect `points` with a minimum spanning tree of their triangulation.
    ///
    /// Fewer than two points give no edges, two points give the single edge
    /// between them. If the triangulation misses a point (near-collinear
    /// input), the tree is rebuilt from the complete graph instead.
    pub fn build(points: &[Point]) -> Self {
        let mut unique = points.to_vec();
        unique.sort();
        unique.dedup();

        let edges = match unique.len() {
            0 | 1 => Vec::new(),
            2 => vec![Edge::new(unique[0], unique[1])],
            n => {
                let candidates = triangulate(&unique);
                let tree = minimum_spanning_tree(&candidates);
                if tree.len() == n - 1 {
                    tree
                } else {
                    log::warn!(
                        "Triangulation connected {} of {} regions, using complete graph",
                        tree.len() + 1,
                        n
                    );
                    minimum_spanning_tree(&complete_graph(&unique))
                }
            }
        };

        log::debug!("Connectivity graph: {} points, {} edges", points.len(), edges.len());

        Self {
            points: points.to_vec(),
            edges,
        }
    }

    pub fn degrees(&self) -> HashMap<Point, usize> {
        degrees(&self.edges)
    }

    pub fn dead_ends(&self) -> Vec<Point> {
        find_dead_ends(&self.edges)
    }

    pub fn total_length(&self) -> f64 {
        self.edges.iter().map(Edge::length).sum()
    }
}

/// Every pair of points, ordered by index.
fn complete_graph(points: &[Point]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            edges.push(Edge::new(a, b));
        }
    }
    edges
}
