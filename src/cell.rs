//! Cell states of the occupancy grid.

/// State of a single grid cell.
///
/// The automaton only ever produces `Alive` and `Dead`; the other variants are
/// markers written by later stages and flattened away by
/// [`OccupancyGrid::collapse_to_binary`](crate::grid::OccupancyGrid::collapse_to_binary).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    Alive,
    #[default]
    Dead,
    /// Absorbed into a surviving region by the flood fill
    Visited,
    /// Endpoint of a carved corridor (region junction)
    Corridor,
    /// Representative of a region with a single corridor
    DeadEnd,
}

impl CellState {
    /// Whether the automaton counts this cell as occupied.
    pub fn is_open(&self) -> bool {
        match self {
            CellState::Dead => false,
            CellState::Alive | CellState::Visited | CellState::Corridor | CellState::DeadEnd => true,
        }
    }

    /// Color used for the preview buffer.
    pub fn color(&self) -> [u8; 3] {
        match self {
            CellState::Alive => [255, 255, 255],
            CellState::Dead => [0, 0, 0],
            CellState::Visited => [255, 235, 4],
            CellState::Corridor => [0, 0, 255],
            CellState::DeadEnd => [0, 255, 0],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CellState::Alive => "Alive",
            CellState::Dead => "Dead",
            CellState::Visited => "Visited",
            CellState::Corridor => "Corridor",
            CellState::DeadEnd => "Dead end",
        }
    }

    pub const ALL: [CellState; 5] = [
        CellState::Alive,
        CellState::Dead,
        CellState::Visited,
        CellState::Corridor,
        CellState::DeadEnd,
    ];
}
