// ═══════════════════════════════════════════════════════════════════════
// Board setup — generate, populate, repair, retry
// ═══════════════════════════════════════════════════════════════════════

use rand::Rng;
use tracing::{info, warn};

use crate::config::LevelSettings;
use crate::error::{EngineError, Result};
use crate::generator::{generate_pairs, populate};
use crate::grid::Grid;
use crate::repair::repair;

/// How many fresh boards to try when repair keeps failing.
pub const MAX_GENERATION_ATTEMPTS: usize = 8;

/// Build a populated, repaired grid for one level.
pub fn build_board<R: Rng + ?Sized>(settings: &LevelSettings, catalog_len: usize, rng: &mut R) -> Result<Grid> {
    let mut grid = Grid::new(settings.width, settings.height)?;
    refill(&mut grid, settings, catalog_len, rng)?;
    Ok(grid)
}

/// Clear `grid`, resize it to `settings` and deal a new board onto it.
pub fn refill<R: Rng + ?Sized>(grid: &mut Grid, settings: &LevelSettings, catalog_len: usize, rng: &mut R) -> Result<()> {
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        grid.clear();
        grid.resize(settings.width, settings.height)?;

        let slots = generate_pairs(catalog_len, settings.unique_kinds, grid.interior_len(), rng)?;
        populate(grid, &slots)?;

        match repair(grid) {
            Ok(swaps) => {
                info!(
                    width = settings.width,
                    height = settings.height,
                    tiles = grid.occupied_count(),
                    swaps,
                    attempt,
                    "board ready"
                );
                return Ok(());
            }
            Err(EngineError::RepairDidNotConverge { passes }) => {
                warn!(attempt, passes, "repair did not converge, regenerating");
            }
            Err(e) => return Err(e),
        }
    }

    grid.clear();
    Err(EngineError::GenerationFailed { attempts: MAX_GENERATION_ATTEMPTS })
}
