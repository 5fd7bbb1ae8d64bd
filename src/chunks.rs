//! Chunk partitioning
//!
//! The finished grid is cut into square chunks that are meshed independently.
//! Each chunk gets a bordered view carrying a one-cell ring copied from its
//! four direct neighbors, so wall culling agrees on both sides of a chunk
//! boundary.

use crate::cell::CellState;
use crate::grid::OccupancyGrid;
use crate::tilemap::Tilemap;

/// Position of a chunk in chunk space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: usize,
    pub y: usize,
}

/// Owned copy of a `size × size` window of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub size: usize,
    cells: Tilemap<CellState>,
}

impl Chunk {
    /// Chunk-local cell state, `None` outside `[0, size)`.
    pub fn get(&self, x: i32, y: i32) -> Option<CellState> {
        self.cells.get(x, y).copied()
    }

    /// World-space placement of the chunk's origin.
    pub fn world_offset(&self, cell_size: f32) -> [f32; 3] {
        let span = self.size as f32 * cell_size;
        [self.coord.x as f32 * span, 0.0, self.coord.y as f32 * span]
    }
}

/// All chunks of a grid, stored row-major by chunk coordinate.
#[derive(Clone, Debug, Default)]
pub struct ChunkGrid {
    pub chunks_x: usize,
    pub chunks_y: usize,
    pub chunk_size: usize,
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    pub fn get(&self, i: i64, j: i64) -> Option<&Chunk> {
        if i < 0 || j < 0 || i as usize >= self.chunks_x || j as usize >= self.chunks_y {
            return None;
        }
        self.chunks.get(j as usize * self.chunks_x + i as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Cut `grid` into `ceil(w / size) × ceil(h / size)` chunks. Cells past the
/// grid edge are `Dead`. A size of zero yields no chunks.
pub fn split_in_chunks(grid: &OccupancyGrid, chunk_size: usize) -> ChunkGrid {
    if chunk_size == 0 {
        return ChunkGrid::default();
    }

    let chunks_x = grid.width().div_ceil(chunk_size);
    let chunks_y = grid.height().div_ceil(chunk_size);
    let mut chunks = Vec::with_capacity(chunks_x * chunks_y);

    for j in 0..chunks_y {
        for i in 0..chunks_x {
            let cells = Tilemap::from_fn(chunk_size, chunk_size, |x, y| {
                let gx = (i * chunk_size + x) as i32;
                let gy = (j * chunk_size + y) as i32;
                grid.try_get(gx, gy).unwrap_or(CellState::Dead)
            });
            chunks.push(Chunk {
                coord: ChunkCoord { x: i, y: j },
                size: chunk_size,
                cells,
            });
        }
    }

    ChunkGrid {
        chunks_x,
        chunks_y,
        chunk_size,
        chunks,
    }
}

/// A chunk padded with a one-cell ring taken from its neighbors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderedChunk {
    pub size: usize,
    cells: Tilemap<CellState>,
}

impl BorderedChunk {
    /// State at chunk-local `(x, y)`, valid for `-1..=size` on both axes.
    pub fn get(&self, x: i32, y: i32) -> Option<CellState> {
        self.cells.get(x + 1, y + 1).copied()
    }
}

/// Build the bordered view of chunk `(i, j)`.
///
/// The interior is the chunk itself. Each side of the ring is the facing edge
/// of the neighbor across that side, or `Dead` at the grid boundary. Corners
/// are always `Dead`. Returns `None` if `(i, j)` is not a chunk.
pub fn build_border(chunks: &ChunkGrid, i: usize, j: usize) -> Option<BorderedChunk> {
    let (i, j) = (i as i64, j as i64);
    let chunk = chunks.get(i, j)?;
    let n = chunk.size as i32;
    let mut cells = Tilemap::new_with(chunk.size + 2, chunk.size + 2, CellState::Dead);

    for y in 0..n {
        for x in 0..n {
            cells.set(x + 1, y + 1, chunk.get(x, y).unwrap_or_default());
        }
    }

    let edge = |c: &Chunk, x: i32, y: i32| c.get(x, y).unwrap_or_default();

    if let Some(west) = chunks.get(i - 1, j) {
        for y in 0..n {
            cells.set(0, y + 1, edge(west, n - 1, y));
        }
    }
    if let Some(east) = chunks.get(i + 1, j) {
        for y in 0..n {
            cells.set(n + 1, y + 1, edge(east, 0, y));
        }
    }
    if let Some(south) = chunks.get(i, j - 1) {
        for x in 0..n {
            cells.set(x + 1, 0, edge(south, x, n - 1));
        }
    }
    if let Some(north) = chunks.get(i, j + 1) {
        for x in 0..n {
            cells.set(x + 1, n + 1, edge(north, x, 0));
        }
    }

    Some(BorderedChunk {
        size: chunk.size,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_counts_round_up() {
        let grid = OccupancyGrid::new(10, 7);
        let chunks = split_in_chunks(&grid, 4);
        assert_eq!((chunks.chunks_x, chunks.chunks_y), (3, 2));
        assert_eq!(chunks.len(), 6);

        let exact = split_in_chunks(&OccupancyGrid::new(8, 8), 4);
        assert_eq!((exact.chunks_x, exact.chunks_y), (2, 2));
    }

    #[test]
    fn test_zero_chunk_size_is_empty() {
        let chunks = split_in_chunks(&OccupancyGrid::new(5, 5), 0);
        assert!(chunks.is_empty());
        assert!(build_border(&chunks, 0, 0).is_none());
    }

    #[test]
    fn test_chunk_copies_window_and_pads_dead() {
        let grid = OccupancyGrid::from_ascii(&["#####", "#####", "#####"]);
        let chunks = split_in_chunks(&grid, 2);
        let last = chunks.get(2, 1).unwrap();
        assert_eq!(last.coord, ChunkCoord { x: 2, y: 1 });
        assert_eq!(last.get(0, 0), Some(CellState::Alive));
        assert_eq!(last.get(1, 0), Some(CellState::Dead));
        assert_eq!(last.get(0, 1), Some(CellState::Dead));
    }

    #[test]
    fn test_chunk_is_independent_of_grid() {
        let mut grid = OccupancyGrid::from_ascii(&["##", "##"]);
        let chunks = split_in_chunks(&grid, 2);
        grid.set(0, 0, CellState::Dead).unwrap();
        assert_eq!(chunks.get(0, 0).unwrap().get(0, 0), Some(CellState::Alive));
    }

    #[test]
    fn test_world_offset() {
        let chunks = split_in_chunks(&OccupancyGrid::new(16, 16), 8);
        assert_eq!(chunks.get(1, 1).unwrap().world_offset(2.0), [16.0, 0.0, 16.0]);
    }

    #[test]
    fn test_border_stitching_horizontal() {
        let grid = OccupancyGrid::from_ascii(&[
            "#..#.#",
            ".##..#",
            "#.#.##",
        ]);
        let chunks = split_in_chunks(&grid, 3);
        let a = chunks.get(0, 0).unwrap();
        let b = chunks.get(1, 0).unwrap();
        let border_a = build_border(&chunks, 0, 0).unwrap();
        let border_b = build_border(&chunks, 1, 0).unwrap();

        for y in 0..3 {
            // B's west ring is A's east column, A's east ring is B's west column
            assert_eq!(border_b.get(-1, y), a.get(2, y));
            assert_eq!(border_a.get(3, y), b.get(0, y));
        }
    }

    #[test]
    fn test_border_stitching_vertical() {
        let grid = OccupancyGrid::from_ascii(&["#.", ".#", "##", ".."]);
        let chunks = split_in_chunks(&grid, 2);
        let low = chunks.get(0, 0).unwrap();
        let high = chunks.get(0, 1).unwrap();
        let border_low = build_border(&chunks, 0, 0).unwrap();
        let border_high = build_border(&chunks, 0, 1).unwrap();

        for x in 0..2 {
            assert_eq!(border_high.get(x, -1), low.get(x, 1));
            assert_eq!(border_low.get(x, 2), high.get(x, 0));
        }
    }

    #[test]
    fn test_border_corners_stay_dead() {
        let grid = OccupancyGrid::from_ascii(&["######", "######", "######", "######", "######", "######"]);
        let chunks = split_in_chunks(&grid, 2);
        let border = build_border(&chunks, 1, 1).unwrap();
        for (x, y) in [(-1, -1), (2, -1), (-1, 2), (2, 2)] {
            assert_eq!(border.get(x, y), Some(CellState::Dead));
        }
        assert_eq!(border.get(-1, 0), Some(CellState::Alive));
        assert_eq!(border.get(0, 2), Some(CellState::Alive));
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = OccupancyGrid::from_ascii(&["#"]);
        let chunks = split_in_chunks(&grid, 1);
        assert_eq!(chunks.len(), 1);
        let border = build_border(&chunks, 0, 0).unwrap();
        let alive: Vec<_> = (-1..=1)
            .flat_map(|y| (-1..=1).map(move |x| (x, y)))
            .filter(|&(x, y)| border.get(x, y) == Some(CellState::Alive))
            .collect();
        assert_eq!(alive, vec![(0, 0)]);
        assert_eq!(border.get(2, 0), None);
    }
}
