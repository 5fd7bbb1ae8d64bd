//! Occupancy grid and the cave-smoothing cellular automaton.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::cell::CellState;
use crate::error::{DungeonError, Result};
use crate::tilemap::Tilemap;

/// Integer grid coordinate, also used as a graph vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The dungeon layout: one [`CellState`] per cell, mutated in place by every
/// pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: Tilemap<CellState>,
}

impl OccupancyGrid {
    /// All-dead grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Tilemap::new_with(width, height, CellState::Dead),
        }
    }

    /// Random initial state: each cell is alive with `alive_probability`.
    pub fn random(width: usize, height: usize, alive_probability: f64, rng: &mut ChaCha8Rng) -> Self {
        let p = alive_probability.clamp(0.0, 1.0);
        let cells = Tilemap::from_fn(width, height, |_, _| {
            if rng.gen_bool(p) {
                CellState::Alive
            } else {
                CellState::Dead
            }
        });
        Self { cells }
    }

    /// Build a grid from rows of `#` (alive) and `.` (dead). Row 0 is `y = 0`.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let cells = Tilemap::from_fn(width, height, |x, y| match rows[y].as_bytes().get(x) {
            Some(b'#') => CellState::Alive,
            _ => CellState::Dead,
        });
        Self { cells }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.cells.in_bounds(x, y)
    }

    pub fn cells(&self) -> &Tilemap<CellState> {
        &self.cells
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> DungeonError {
        DungeonError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<CellState> {
        self.cells.get(x, y).copied().ok_or_else(|| self.out_of_bounds(x, y))
    }

    pub fn set(&mut self, x: i32, y: i32, state: CellState) -> Result<()> {
        if self.cells.set(x, y, state) {
            Ok(())
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    pub fn get_point(&self, p: Point) -> Result<CellState> {
        self.get(p.x, p.y)
    }

    pub fn set_point(&mut self, p: Point, state: CellState) -> Result<()> {
        self.set(p.x, p.y, state)
    }

    /// State at `(x, y)`, `None` when off-grid.
    pub fn try_get(&self, x: i32, y: i32) -> Option<CellState> {
        self.cells.get(x, y).copied()
    }

    /// Write `state` if `(x, y)` is on the grid; off-grid writes are dropped.
    pub(crate) fn set_clipped(&mut self, x: i32, y: i32, state: CellState) {
        self.cells.set(x, y, state);
    }

    /// Number of open (non-dead) Moore neighbors. Off-grid neighbors don't count.
    pub fn open_neighbors(&self, x: i32, y: i32) -> usize {
        self.cells
            .neighbors_8(x, y)
            .filter(|&(nx, ny)| self.cells.get(nx, ny).is_some_and(|s| s.is_open()))
            .count()
    }

    /// Run one synchronous automaton generation.
    ///
    /// Markers left by earlier stages count as open both for the cell itself
    /// and for its neighbors. The next generation is built in a fresh buffer
    /// from the current one, so no cell sees a partially updated neighborhood.
    pub fn step(&mut self, birth_threshold: usize, survival_threshold: usize) {
        let current = &self.cells;
        let next = Tilemap::from_fn(current.width, current.height, |x, y| {
            let (x, y) = (x as i32, y as i32);
            let open = self.open_neighbors(x, y);
            let threshold = match current.get(x, y).copied().unwrap_or_default() {
                CellState::Dead => birth_threshold,
                CellState::Alive | CellState::Visited | CellState::Corridor | CellState::DeadEnd => {
                    survival_threshold
                }
            };
            if open >= threshold {
                CellState::Alive
            } else {
                CellState::Dead
            }
        });
        self.cells = next;
    }

    /// Run `iterations` automaton generations.
    pub fn smooth(&mut self, iterations: usize, birth_threshold: usize, survival_threshold: usize) {
        for _ in 0..iterations {
            self.step(birth_threshold, survival_threshold);
        }
    }

    /// Flatten every marker back to `Alive`, leaving a pure occupancy mask.
    pub fn collapse_to_binary(&mut self) {
        for (_, _, cell) in self.cells.iter_mut() {
            *cell = match *cell {
                CellState::Dead => CellState::Dead,
                CellState::Alive | CellState::Visited | CellState::Corridor | CellState::DeadEnd => {
                    CellState::Alive
                }
            };
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.as_slice().iter().filter(|&&s| s == state).count()
    }

    /// Fraction of cells that are not dead.
    pub fn fraction_open(&self) -> f64 {
        let total = self.width() * self.height();
        if total == 0 {
            return 0.0;
        }
        let open = self.cells.as_slice().iter().filter(|s| s.is_open()).count();
        open as f64 / total as f64
    }

    /// Render as `#`/`.` rows, markers shown as `#`.
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| {
                        let state = self.try_get(x as i32, y as i32).unwrap_or_default();
                        if state.is_open() { '#' } else { '.' }
                    })
                    .collect()
            })
            .collect()
    }
}
