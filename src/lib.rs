//! Cave dungeon generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod cell;
pub mod chunks;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod grid;
pub mod mesh;
pub mod pipeline;
pub mod regions;
pub mod seeds;
pub mod tilemap;
pub mod tunnel;

pub use cell::CellState;
pub use config::DungeonConfig;
pub use error::{DungeonError, Result};
pub use grid::{OccupancyGrid, Point};
pub use pipeline::{generate, generate_with_seeds, Dungeon, GenerationStats};
pub use seeds::DungeonSeeds;
