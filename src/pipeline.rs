//! End-to-end generation
//!
//! Runs every stage in order on one grid: random fill, automaton smoothing,
//! region extraction, connectivity graph, corridor carving, optional collapse,
//! chunk partitioning and meshing.

use crate::chunks::{split_in_chunks, ChunkGrid};
use crate::config::DungeonConfig;
use crate::error::Result;
use crate::graph::ConnectivityGraph;
use crate::grid::{OccupancyGrid, Point};
use crate::mesh::{mesh_all, ChunkMesh};
use crate::regions::extract_all;
use crate::seeds::DungeonSeeds;
use crate::tunnel::carve_corridors;

/// Summary numbers of one generation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationStats {
    pub regions: usize,
    pub corridors: usize,
    pub dead_ends: usize,
    pub corridor_length: f64,
    /// Fraction of non-dead cells in the final grid
    pub open_fraction: f64,
    pub chunks: usize,
    pub floor_quads: usize,
    pub wall_quads: usize,
}

/// Everything one run produces.
#[derive(Clone, Debug)]
pub struct Dungeon {
    pub seeds: DungeonSeeds,
    pub grid: OccupancyGrid,
    /// One point per surviving region, in discovery order
    pub representatives: Vec<Point>,
    pub graph: ConnectivityGraph,
    pub chunks: ChunkGrid,
    /// Empty unless chunk generation is enabled
    pub meshes: Vec<ChunkMesh>,
    pub stats: GenerationStats,
}

/// Generate a dungeon. Seeds come from `config.seed`, or a random master seed.
pub fn generate(config: &DungeonConfig) -> Result<Dungeon> {
    let seeds = match config.seed {
        Some(master) => DungeonSeeds::from_master(master),
        None => DungeonSeeds::default(),
    };
    generate_with_seeds(config, seeds)
}

/// Generate a dungeon with explicit stage seeds.
pub fn generate_with_seeds(config: &DungeonConfig, seeds: DungeonSeeds) -> Result<Dungeon> {
    config.validate()?;
    log::info!("Generating {}x{} dungeon, {}", config.width, config.height, seeds);

    let mut layout_rng = seeds.layout_rng();
    let mut grid = OccupancyGrid::random(config.width, config.height, config.alive_probability, &mut layout_rng);
    grid.smooth(config.iterations, config.birth_threshold, config.survival_threshold);
    log::info!(
        "Automaton: {} generations, {:.1}% open",
        config.iterations,
        grid.fraction_open() * 100.0
    );

    let mut regions_rng = seeds.regions_rng();
    let representatives = extract_all(&mut grid, config.area_threshold, config.flood_kernel, &mut regions_rng);
    log::info!("Regions: {} kept", representatives.len());

    let graph = ConnectivityGraph::build(&representatives);
    carve_corridors(&mut grid, &graph, config.tunnel_width)?;
    let dead_ends = graph.dead_ends();
    log::info!(
        "Corridors: {} carved, {} dead ends, total length {:.1}",
        graph.edges.len(),
        dead_ends.len(),
        graph.total_length()
    );

    if config.collapse {
        grid.collapse_to_binary();
    }

    let chunks = split_in_chunks(&grid, config.chunk_size);
    let meshes = if config.generate_chunks {
        mesh_all(&chunks, config.mesh_settings())
    } else {
        Vec::new()
    };

    let stats = GenerationStats {
        regions: representatives.len(),
        corridors: graph.edges.len(),
        dead_ends: dead_ends.len(),
        corridor_length: graph.total_length(),
        open_fraction: grid.fraction_open(),
        chunks: chunks.len(),
        floor_quads: meshes.iter().map(|m| m.floor.quad_count()).sum(),
        wall_quads: meshes.iter().map(|m| m.walls.quad_count()).sum(),
    };
    log::info!(
        "Chunks: {} of {} cells, {} floor quads, {} wall quads",
        stats.chunks,
        config.chunk_size,
        stats.floor_quads,
        stats.wall_quads
    );

    Ok(Dungeon {
        seeds,
        grid,
        representatives,
        graph,
        chunks,
        meshes,
        stats,
    })
}
