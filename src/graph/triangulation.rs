//! Delaunay triangulation (Bowyer-Watson)
//!
//! Points are inserted one at a time into a super-triangle enclosing the whole
//! set. Every triangle whose circumcircle contains the new point is removed and
//! the resulting star-shaped cavity is re-triangulated around the point.

use super::Edge;
use crate::grid::Point;

const SUPER_SCALE: f64 = 100.0;

/// Triangle as counter-clockwise vertex indices.
#[derive(Clone, Copy, Debug)]
struct Triangle([usize; 3]);

/// Twice the signed area of (a, b, c); positive when counter-clockwise.
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle (a, b, c).
fn in_circle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - p[0], a[1] - p[1]);
    let (bdx, bdy) = (b[0] - p[0], b[1] - p[1]);
    let (cdx, cdy) = (c[0] - p[0], c[1] - p[1]);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Triangulate a point set and return the edges of every triangle.
///
/// Shared edges appear once per adjacent triangle. Duplicate input points are
/// ignored. When no triangle exists (fewer than three distinct points, or all
/// of them collinear) the points are chained in lexicographic order, which is
/// the degenerate triangulation of a line.
pub fn triangulate(points: &[Point]) -> Vec<Edge> {
    let mut unique = points.to_vec();
    unique.sort();
    unique.dedup();

    let triangles = bowyer_watson(&unique);
    if triangles.is_empty() {
        return chain(&unique);
    }

    let mut edges = Vec::with_capacity(triangles.len() * 3);
    for Triangle([a, b, c]) in triangles {
        edges.push(Edge::new(unique[a], unique[b]));
        edges.push(Edge::new(unique[b], unique[c]));
        edges.push(Edge::new(unique[c], unique[a]));
    }
    edges
}

fn chain(points: &[Point]) -> Vec<Edge> {
    points.windows(2).map(|w| Edge::new(w[0], w[1])).collect()
}

fn bowyer_watson(points: &[Point]) -> Vec<Triangle> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut verts: Vec<[f64; 2]> = points.iter().map(|p| [p.x as f64, p.y as f64]).collect();

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for v in &verts {
        min_x = min_x.min(v[0]);
        min_y = min_y.min(v[1]);
        max_x = max_x.max(v[0]);
        max_y = max_y.max(v[1]);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    // Counter-clockwise super-triangle. Very flat triangles of real points can
    // still have a super vertex inside their circumcircle; callers that need a
    // spanning graph must check coverage.
    verts.push([mid_x - SUPER_SCALE * span, mid_y - span]);
    verts.push([mid_x + SUPER_SCALE * span, mid_y - span]);
    verts.push([mid_x, mid_y + SUPER_SCALE * span]);

    let mut triangles = vec![Triangle([n, n + 1, n + 2])];

    for i in 0..n {
        let p = verts[i];

        let mut cavity: Vec<(usize, usize)> = Vec::new();
        triangles.retain(|&Triangle([a, b, c])| {
            if in_circle(verts[a], verts[b], verts[c], p) > 0.0 {
                cavity.extend([(a, b), (b, c), (c, a)]);
                false
            } else {
                true
            }
        });

        // An edge shared by two removed triangles shows up in both directions
        let boundary: Vec<(usize, usize)> = cavity
            .iter()
            .copied()
            .filter(|&(a, b)| !cavity.contains(&(b, a)))
            .collect();

        for (a, b) in boundary {
            if orient(verts[a], verts[b], p) > 0.0 {
                triangles.push(Triangle([a, b, i]));
            }
        }
    }

    triangles.retain(|Triangle(t)| t.iter().all(|&v| v < n));
    triangles
}
