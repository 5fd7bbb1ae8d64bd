//! Error type shared by the generation pipeline and the driver.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DungeonError>;

/// Errors that can occur while generating or exporting a dungeon
#[derive(Error, Debug)]
pub enum DungeonError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
