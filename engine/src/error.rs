use thiserror::Error;

use crate::types::Coord;

/// Errors raised by the engine. Unreachable connections are not errors;
/// the pathfinder reports them as an empty [`Path`](crate::types::Path).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cell ({x}, {y}) is outside the {columns}x{rows} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        columns: usize,
        rows: usize,
    },

    #[error("grid dimensions must be at least 1x1, got {columns}x{rows}")]
    InvalidDimensions { columns: usize, rows: usize },

    #[error("cannot resize while {occupied} tiles are still placed")]
    ResizeWhileOccupied { occupied: usize },

    #[error("border cell {0} must stay empty and walkable")]
    BorderCell(Coord),

    #[error("no such tile: {0}")]
    UnknownTile(u32),

    #[error("tile catalog is empty")]
    EmptyCatalog,

    #[error("cross-pattern repair did not settle after {passes} passes")]
    RepairDidNotConverge { passes: usize },

    #[error("could not generate a repairable board in {attempts} attempts")]
    GenerationFailed { attempts: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
