use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use cave_dungeon::export::export_grid;
use cave_dungeon::{generate, CellState, DungeonConfig};

#[derive(Parser, Debug)]
#[command(name = "cave_dungeon")]
#[command(about = "Generate procedural cave dungeons and their chunk meshes")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial chance of a cell being alive
    #[arg(short = 'p', long)]
    probability: Option<f64>,

    /// Automaton generations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Birth threshold of the automaton
    #[arg(long)]
    birth: Option<usize>,

    /// Survival threshold of the automaton
    #[arg(long)]
    survival: Option<usize>,

    /// Minimum region size in cells
    #[arg(short, long)]
    area: Option<usize>,

    /// Corridor width in cells
    #[arg(short, long)]
    tunnel_width: Option<f32>,

    /// Chunk edge length in cells
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Keep region and corridor markers in the final grid
    #[arg(long)]
    keep_markers: bool,

    /// Skip chunk meshing
    #[arg(long)]
    no_chunks: bool,

    /// Write a preview image of the grid (e.g., "dungeon.png")
    #[arg(long)]
    preview: Option<String>,

    /// Print the grid as text
    #[arg(long)]
    ascii: bool,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn into_config(self) -> Result<(DungeonConfig, Self), Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => DungeonConfig::from_json_file(path)?,
            None => DungeonConfig::default(),
        };

        self.apply_overrides(&mut config);

        // Pin the seed so the run can be reproduced from the printed value
        if config.seed.is_none() {
            config.seed = Some(rand::random());
        }

        config.validate()?;
        Ok((config, self))
    }

    /// Copy every flag that was given onto `config`.
    fn apply_overrides(&self, config: &mut DungeonConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(probability) = self.probability {
            config.alive_probability = probability;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(birth) = self.birth {
            config.birth_threshold = birth;
        }
        if let Some(survival) = self.survival {
            config.survival_threshold = survival;
        }
        if let Some(area) = self.area {
            config.area_threshold = area;
        }
        if let Some(tunnel_width) = self.tunnel_width {
            config.tunnel_width = tunnel_width;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if self.keep_markers {
            config.collapse = false;
        }
        if self.no_chunks {
            config.generate_chunks = false;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let (config, args) = Args::parse().into_config()?;

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    println!("Generating dungeon with seed: {}", config.seed.unwrap_or_default());
    println!("Grid size: {}x{}", config.width, config.height);

    let dungeon = generate(&config)?;
    let stats = &dungeon.stats;

    println!("Open cells: {:.1}%", stats.open_fraction * 100.0);
    println!("Regions: {} (smaller than {} cells removed)", stats.regions, config.area_threshold);
    println!(
        "Corridors: {} ({} dead ends, total length {:.1})",
        stats.corridors, stats.dead_ends, stats.corridor_length
    );
    if config.generate_chunks {
        println!(
            "Chunks: {} ({} floor quads, {} wall quads)",
            stats.chunks, stats.floor_quads, stats.wall_quads
        );
    }

    if args.ascii {
        for row in dungeon.grid.to_ascii().iter().rev() {
            println!("{}", row);
        }
    }

    if let Some(path) = &args.preview {
        export_grid(&dungeon.grid, config.texture_width, config.texture_height, path)?;
        println!("Saved preview to: {}", path);
        if !config.collapse {
            for state in CellState::ALL {
                println!("  {:?} = {}", state.color(), state.display_name());
            }
        }
    }

    Ok(())
}
