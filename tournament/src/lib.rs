pub mod runner;
pub mod database;

pub use runner::{run_batch, run_game, GameResult, LevelResult, Outcome};
pub use database::{Database, Standing};
