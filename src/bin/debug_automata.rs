//! Debug tool for comparing automaton parameters visually
//! Renders a sheet of smoothed grids, one per birth/survival/iteration variant,
//! all grown from the same random fill.

use cave_dungeon::export::{color_buffer, compose_panels};
use cave_dungeon::regions::{extract_all, FloodKernel};
use cave_dungeon::seeds::DungeonSeeds;
use cave_dungeon::OccupancyGrid;
use image::RgbImage;

const WIDTH: usize = 128;
const HEIGHT: usize = 96;
const SEED: u64 = 42;
const AREA_THRESHOLD: usize = 40;

/// (birth, survival, iterations); labels read "birth survival/iterations"
const VARIANTS: [(usize, usize, usize); 9] = [
    (3, 4, 0),
    (3, 4, 1),
    (3, 4, 5),
    (4, 4, 5),
    (5, 4, 5),
    (5, 3, 5),
    (3, 3, 5),
    (4, 5, 5),
    (5, 5, 10),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating automaton comparison sheet...");

    let seeds = DungeonSeeds::from_master(SEED);
    let base = OccupancyGrid::random(WIDTH, HEIGHT, 0.5, &mut seeds.layout_rng());

    let mut panels: Vec<(String, RgbImage)> = Vec::new();
    for (birth, survival, iterations) in VARIANTS {
        let mut grid = base.clone();
        grid.smooth(iterations, birth, survival);
        let open = grid.fraction_open();

        let regions = extract_all(&mut grid, AREA_THRESHOLD, FloodKernel::default(), &mut seeds.regions_rng());
        println!(
            "  birth {} survival {} x{}: {:.1}% open, {} regions",
            birth,
            survival,
            iterations,
            open * 100.0,
            regions.len()
        );

        panels.push((format!("{}{}/{}", birth, survival, iterations), color_buffer(&grid)));
    }

    let sheet = compose_panels(&panels, 3);
    sheet.save("automata_comparison.png")?;
    println!("Saved automata_comparison.png");
    Ok(())
}
