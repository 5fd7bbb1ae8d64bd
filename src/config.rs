//! Generation parameters
//!
//! Every knob of the pipeline lives in [`DungeonConfig`]. It deserializes from
//! JSON with missing fields taking their defaults, and the binary layers CLI
//! flags on top.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::mesh::MeshSettings;
use crate::regions::FloodKernel;
use crate::tunnel::DEFAULT_TUNNEL_WIDTH;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Chance that a cell starts alive
    pub alive_probability: f64,
    /// Master seed; random when absent
    pub seed: Option<u64>,

    /// A dead cell with at least this many open neighbors becomes alive
    pub birth_threshold: usize,
    /// An open cell needs at least this many open neighbors to stay open
    pub survival_threshold: usize,
    /// Automaton generations
    pub iterations: usize,

    /// Regions smaller than this are removed
    pub area_threshold: usize,
    pub flood_kernel: FloodKernel,

    pub tunnel_width: f32,
    /// Turn region and corridor markers back into plain floor before meshing
    pub collapse: bool,

    /// Chunk edge length in cells
    pub chunk_size: usize,
    pub cell_size: f32,
    pub wall_height: f32,
    /// Build chunk meshes; when off only the grid is produced
    pub generate_chunks: bool,

    /// Preview image size in pixels
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            alive_probability: 0.5,
            seed: None,
            birth_threshold: 3,
            survival_threshold: 4,
            iterations: 5,
            area_threshold: 40,
            flood_kernel: FloodKernel::default(),
            tunnel_width: DEFAULT_TUNNEL_WIDTH,
            collapse: true,
            chunk_size: 16,
            cell_size: 1.0,
            wall_height: 1.0,
            generate_chunks: true,
            texture_width: 512,
            texture_height: 512,
        }
    }
}

impl DungeonConfig {
    /// Load a config from a JSON file. Absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no stage can work with. Degenerate but meaningful values
    /// (zero size grid, zero iterations, chunk size 0) are accepted.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(DungeonError::InvalidConfig(format!(
                "alive_probability must be within [0, 1], got {}",
                self.alive_probability
            )));
        }
        if self.birth_threshold > 8 || self.survival_threshold > 8 {
            return Err(DungeonError::InvalidConfig(format!(
                "automaton thresholds must be at most 8, got birth {} and survival {}",
                self.birth_threshold, self.survival_threshold
            )));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(DungeonError::InvalidConfig(format!(
                "grid size {}x{} does not fit cell coordinates",
                self.width, self.height
            )));
        }
        let reach = self.width.max(self.height).max(1);
        if self.flood_kernel.x as usize > reach || self.flood_kernel.y as usize > reach {
            return Err(DungeonError::InvalidConfig(format!(
                "flood_kernel radii must be at most {}, got {}x{}",
                reach, self.flood_kernel.x, self.flood_kernel.y
            )));
        }
        if !self.tunnel_width.is_finite() || self.tunnel_width < 0.0 {
            return Err(DungeonError::InvalidConfig(format!(
                "tunnel_width must be a non-negative number, got {}",
                self.tunnel_width
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(DungeonError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.wall_height.is_finite() && self.wall_height >= 0.0) {
            return Err(DungeonError::InvalidConfig(format!(
                "wall_height must be non-negative, got {}",
                self.wall_height
            )));
        }
        Ok(())
    }

    pub fn mesh_settings(&self) -> MeshSettings {
        MeshSettings {
            cell_size: self.cell_size,
            wall_height: self.wall_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DungeonConfig::default();
        config.validate().unwrap();
        assert_eq!(config.birth_threshold, 3);
        assert_eq!(config.survival_threshold, 4);
        assert_eq!(config.area_threshold, 40);
        assert_eq!(config.flood_kernel, FloodKernel { x: 1, y: 1 });
        assert_eq!(config.tunnel_width, 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DungeonConfig::from_json(r#"{ "width": 64, "seed": 7, "flood_kernel": { "x": 2, "y": 1 } }"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.flood_kernel, FloodKernel { x: 2, y: 1 });
        assert_eq!(config.height, DungeonConfig::default().height);
    }

    #[test]
    fn test_json_round_trip() {
        let config = DungeonConfig {
            seed: Some(42),
            collapse: false,
            ..Default::default()
        };
        let parsed = DungeonConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            DungeonConfig { alive_probability: 1.5, ..Default::default() },
            DungeonConfig { birth_threshold: 9, ..Default::default() },
            DungeonConfig { tunnel_width: -1.0, ..Default::default() },
            DungeonConfig { cell_size: 0.0, ..Default::default() },
            DungeonConfig { wall_height: f32::NAN, ..Default::default() },
            DungeonConfig { flood_kernel: FloodKernel::new(u32::MAX, 1), ..Default::default() },
            DungeonConfig { flood_kernel: FloodKernel::new(1, 129), ..Default::default() },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(DungeonError::InvalidConfig(_))), "{:?}", config);
        }
    }

    #[test]
    fn test_oversized_kernel_in_json_rejected() {
        let result = DungeonConfig::from_json(r#"{ "flood_kernel": { "x": 4294967295, "y": 1 } }"#);
        assert!(matches!(result, Err(DungeonError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(DungeonConfig::from_json("{ width: }"), Err(DungeonError::Json(_))));
        assert!(matches!(
            DungeonConfig::from_json_file("/nonexistent/dungeon.json"),
            Err(DungeonError::Io(_))
        ));
    }

    #[test]
    fn test_degenerate_values_accepted() {
        let config = DungeonConfig {
            width: 0,
            iterations: 0,
            chunk_size: 0,
            ..Default::default()
        };
        config.validate().unwrap();
    }
}
