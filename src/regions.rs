//! Connected region extraction
//!
//! Finds blobs of alive cells with a breadth-first flood fill, prunes the ones
//! that are too small, and picks one representative cell per survivor. The
//! representatives are the vertices of the connectivity graph.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::cell::CellState;
use crate::grid::{OccupancyGrid, Point};

/// Reach of the flood fill along each axis.
///
/// A radius above 1 lets the fill jump gaps, so cells separated by up to
/// `radius - 1` dead cells coalesce into one region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FloodKernel {
    pub x: u32,
    pub y: u32,
}

impl FloodKernel {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Neighbor offsets covered by the kernel, excluding the origin. Radii
    /// are capped at the grid extent, past which no further cell is reachable.
    fn offsets(&self, width: usize, height: usize) -> Vec<(i32, i32)> {
        let cap = |radius: u32, extent: usize| {
            (radius as usize)
                .min(extent.saturating_sub(1))
                .min(i32::MAX as usize / 2)
        };
        let (kx, ky) = (cap(self.x, width), cap(self.y, height));
        let capacity = (2 * kx + 1).saturating_mul(2 * ky + 1);
        let (kx, ky) = (kx as i32, ky as i32);
        let mut offsets = Vec::with_capacity(capacity.saturating_sub(1));
        for dx in -kx..=kx {
            for dy in -ky..=ky {
                if dx == 0 && dy == 0 {
                    continue;
                }
                offsets.push((dx, dy));
            }
        }
        offsets
    }
}

impl Default for FloodKernel {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Flood a single region starting at `start`.
///
/// Absorbed cells become [`CellState::Visited`]. If the region has fewer than
/// `area_threshold` cells it is erased (set to `Dead`) and `None` is returned;
/// otherwise a cell drawn uniformly from the region is returned.
pub fn flood_fill(
    grid: &mut OccupancyGrid,
    start: Point,
    area_threshold: usize,
    kernel: FloodKernel,
    rng: &mut ChaCha8Rng,
) -> Option<Point> {
    if grid.try_get(start.x, start.y) != Some(CellState::Alive) {
        return None;
    }

    let offsets = kernel.offsets(grid.width(), grid.height());
    let mut absorbed = Vec::new();
    let mut queue = VecDeque::new();

    // Cells are marked when queued so nothing is enqueued twice
    grid.set_clipped(start.x, start.y, CellState::Visited);
    absorbed.push(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for &(dx, dy) in &offsets {
            let (nx, ny) = (cell.x + dx, cell.y + dy);
            if grid.try_get(nx, ny) != Some(CellState::Alive) {
                continue;
            }
            grid.set_clipped(nx, ny, CellState::Visited);
            let next = Point::new(nx, ny);
            absorbed.push(next);
            queue.push_back(next);
        }
    }

    if absorbed.len() < area_threshold {
        for p in &absorbed {
            grid.set_clipped(p.x, p.y, CellState::Dead);
        }
        return None;
    }

    Some(absorbed[rng.gen_range(0..absorbed.len())])
}

/// Flood every region of the grid in row-major order.
///
/// Returns the representatives of the surviving regions in discovery order.
/// Afterwards every surviving region is `Visited` and every pruned one `Dead`.
pub fn extract_all(
    grid: &mut OccupancyGrid,
    area_threshold: usize,
    kernel: FloodKernel,
    rng: &mut ChaCha8Rng,
) -> Vec<Point> {
    let mut representatives = Vec::new();
    let mut pruned = 0usize;

    // Row-major: y outer. Discovery order fixes which RNG draw each region gets
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if grid.try_get(x, y) != Some(CellState::Alive) {
                continue;
            }
            match flood_fill(grid, Point::new(x, y), area_threshold, kernel, rng) {
                Some(rep) => representatives.push(rep),
                None => pruned += 1,
            }
        }
    }

    log::debug!(
        "Region scan: {} regions kept, {} pruned below {} cells",
        representatives.len(),
        pruned,
        area_threshold
    );

    representatives
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_flood_fill_marks_region_visited() {
        let mut grid = OccupancyGrid::from_ascii(&[
            "##....",
            "##..#.",
            "......",
        ]);
        let rep = flood_fill(&mut grid, Point::new(0, 0), 4, FloodKernel::default(), &mut rng());

        let rep = rep.expect("region of 4 meets threshold 4");
        assert!(rep.x <= 1 && rep.y <= 1);
        assert_eq!(grid.count(CellState::Visited), 4);
        // The far cell is a separate region and stays untouched
        assert_eq!(grid.get(4, 1).unwrap(), CellState::Alive);
    }

    #[test]
    fn test_small_region_is_pruned() {
        let mut grid = OccupancyGrid::from_ascii(&["##..", "....", "...#"]);
        let rep = flood_fill(&mut grid, Point::new(0, 0), 3, FloodKernel::default(), &mut rng());
        assert!(rep.is_none());
        assert_eq!(grid.get(0, 0).unwrap(), CellState::Dead);
        assert_eq!(grid.get(1, 0).unwrap(), CellState::Dead);
        assert_eq!(grid.get(3, 2).unwrap(), CellState::Alive);
    }

    #[test]
    fn test_seed_not_alive_is_noop() {
        let mut grid = OccupancyGrid::from_ascii(&["#.", ".."]);
        let before = grid.clone();
        assert!(flood_fill(&mut grid, Point::new(1, 1), 1, FloodKernel::default(), &mut rng()).is_none());
        assert!(flood_fill(&mut grid, Point::new(5, 5), 1, FloodKernel::default(), &mut rng()).is_none());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_diagonal_cells_connect() {
        let mut grid = OccupancyGrid::from_ascii(&["#..", ".#.", "..#"]);
        let rep = flood_fill(&mut grid, Point::new(0, 0), 3, FloodKernel::default(), &mut rng());
        assert!(rep.is_some());
        assert_eq!(grid.count(CellState::Visited), 3);
    }

    #[test]
    fn test_oversized_kernel_is_capped_to_grid() {
        let rows = ["#...#", ".....", "#...."];
        for kernel in [FloodKernel::new(u32::MAX, u32::MAX), FloodKernel::new(60_000, 60_000)] {
            let mut grid = OccupancyGrid::from_ascii(&rows);
            let rep = flood_fill(&mut grid, Point::new(0, 0), 3, kernel, &mut rng());
            assert!(rep.is_some(), "{:?}", kernel);
        }

        // u32::MAX along x spans the whole row, but y still reaches one row
        let mut grid = OccupancyGrid::from_ascii(&rows);
        flood_fill(&mut grid, Point::new(0, 0), 1, FloodKernel::new(u32::MAX, 1), &mut rng());
        assert_eq!(grid.count(CellState::Visited), 2);
        assert_eq!(grid.get(0, 2).unwrap(), CellState::Alive);
    }

    #[test]
    fn test_wide_kernel_bridges_gaps() {
        let rows = ["##.##"];

        let mut narrow = OccupancyGrid::from_ascii(&rows);
        let reps = extract_all(&mut narrow, 1, FloodKernel::new(1, 1), &mut rng());
        assert_eq!(reps.len(), 2);

        let mut wide = OccupancyGrid::from_ascii(&rows);
        let reps = extract_all(&mut wide, 1, FloodKernel::new(2, 1), &mut rng());
        assert_eq!(reps.len(), 1);
        assert_eq!(wide.count(CellState::Visited), 4);
    }

    #[test]
    fn test_extract_all_prunes_and_keeps() {
        let rows = [
            "###.....#",
            "###......",
            "###....##",
            ".......##",
        ];
        let original = OccupancyGrid::from_ascii(&rows);
        let mut grid = original.clone();
        let reps = extract_all(&mut grid, 4, FloodKernel::default(), &mut rng());

        // 3x3 block and the 2x2 block survive; the lone cell is pruned
        assert_eq!(reps.len(), 2);
        assert_eq!(grid.get(8, 0).unwrap(), CellState::Dead);
        for rep in &reps {
            assert_eq!(original.get_point(*rep).unwrap(), CellState::Alive);
            assert_eq!(grid.get_point(*rep).unwrap(), CellState::Visited);
        }
        assert_eq!(grid.count(CellState::Alive), 0);
        assert_eq!(grid.count(CellState::Visited), 13);
    }

    #[test]
    fn test_discovery_order_is_row_major() {
        let mut grid = OccupancyGrid::from_ascii(&["....#", "#....", "....."]);
        let reps = extract_all(&mut grid, 1, FloodKernel::default(), &mut rng());
        assert_eq!(reps, vec![Point::new(4, 0), Point::new(0, 1)]);
    }

    #[test]
    fn test_representative_covers_whole_region() {
        // Every cell of a two-cell region must be reachable as representative
        let mut seen = std::collections::HashSet::new();
        let mut rng = rng();
        for _ in 0..64 {
            let mut grid = OccupancyGrid::from_ascii(&["##"]);
            let rep = flood_fill(&mut grid, Point::new(0, 0), 1, FloodKernel::default(), &mut rng);
            seen.insert(rep.unwrap());
        }
        assert_eq!(seen.len(), 2);
    }
}
