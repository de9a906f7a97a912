pub mod types;
pub mod error;
pub mod config;
pub mod grid;
pub mod pathfinding;
pub mod generator;
pub mod repair;
pub mod setup;
pub mod matcher;
pub mod view;
pub mod engine;


pub use types::*;
pub use error::{EngineError, Result};
pub use config::{GameConfig, LevelSettings};
pub use grid::Grid;
pub use pathfinding::{Pathfinder, SearchGraph};
pub use matcher::{ClickOutcome, Matcher, Selection};
pub use view::{BoardView, Hint};
pub use engine::{Session, Status};
