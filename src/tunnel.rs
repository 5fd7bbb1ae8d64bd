//! Corridor carving
//!
//! Opens thick straight tunnels between connected regions using Zingl's
//! thick-line variant of Bresenham: the usual error-driven pixel walk, plus a
//! perpendicular sweep at every step that keeps going while the accumulated
//! error is under `line_length * (width + 1) / 2`.

use crate::cell::CellState;
use crate::error::Result;
use crate::graph::ConnectivityGraph;
use crate::grid::{OccupancyGrid, Point};

/// Default corridor width in cells.
pub const DEFAULT_TUNNEL_WIDTH: f32 = 2.0;

/// Rasterize a thick line from `from` to `to`, setting every covered cell to
/// `Alive`. Covered cells that fall off the grid are skipped.
pub fn carve(grid: &mut OccupancyGrid, from: Point, to: Point, width: f32) {
    let (mut x0, mut y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = (y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let line_length = if dx + dy == 0 {
        1.0
    } else {
        ((dx * dx + dy * dy) as f64).sqrt()
    };
    let reach = line_length * (width as f64 + 1.0) / 2.0;

    let mut open = |x: i64, y: i64| grid.set_clipped(x as i32, y as i32, CellState::Alive);

    loop {
        open(x0, y0);
        let mut e2 = err;
        let x2 = x0;

        // x step, sweeping along y
        if 2 * e2 >= -dx {
            e2 += dy;
            let mut y2 = y0;
            while (e2 as f64) < reach && (y1 != y2 || dx > dy) {
                y2 += sy;
                open(x0, y2);
                e2 += dx;
            }
            if x0 == x1 {
                break;
            }
            e2 = err;
            err -= dy;
            x0 += sx;
        }

        // y step, sweeping along x
        if 2 * e2 <= dy {
            e2 = dx - e2;
            let mut x3 = x2;
            while (e2 as f64) < reach && (x1 != x3 || dx < dy) {
                x3 += sx;
                open(x3, y0);
                e2 += dy;
            }
            if y0 == y1 {
                break;
            }
            err += dx;
            y0 += sy;
        }
    }
}

/// Open a tunnel along every graph edge.
///
/// Each edge's endpoints are then tagged `Corridor`, and the tree's leaves
/// `DeadEnd`, so the preview shows region junctions.
pub fn carve_corridors(grid: &mut OccupancyGrid, graph: &ConnectivityGraph, width: f32) -> Result<()> {
    for edge in &graph.edges {
        carve(grid, edge.a, edge.b, width);
        grid.set_point(edge.a, CellState::Corridor)?;
        grid.set_point(edge.b, CellState::Corridor)?;
    }

    for p in graph.dead_ends() {
        grid.set_point(p, CellState::DeadEnd)?;
    }

    Ok(())
}
