// ═══════════════════════════════════════════════════════════════════════
// Cross-pattern repair
//
// In a 2x2 block
//     n3 n4
//     n1 n2
// n1 matching n4 while n2 matches n3 leaves two pairs that block each
// other. Swapping n1 and n2 straightens them into adjacent pairs. Passes
// repeat until one finds nothing to fix.
// ═══════════════════════════════════════════════════════════════════════

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::types::Coord;

/// Upper bound on full passes before giving up.
pub fn pass_limit(grid: &Grid) -> usize {
    grid.interior_len().max(1) * 4
}

/// Find the bottom-left corner of every cross in the interior.
pub fn find_crosses(grid: &Grid) -> Vec<Coord> {
    let mut found = Vec::new();
    for y in 1..grid.rows().saturating_sub(2) {
        for x in 1..grid.columns().saturating_sub(2) {
            let n1 = Coord::new(x, y);
            if is_cross(grid, n1) {
                found.push(n1);
            }
        }
    }
    found
}

fn is_cross(grid: &Grid, n1: Coord) -> bool {
    let (Some(k1), Some(k2), Some(k3), Some(k4)) = (
        grid.kind_at(n1),
        grid.kind_at(Coord::new(n1.x + 1, n1.y)),
        grid.kind_at(Coord::new(n1.x, n1.y + 1)),
        grid.kind_at(Coord::new(n1.x + 1, n1.y + 1)),
    ) else {
        return false;
    };
    // A block of one kind already has adjacent pairs, and swapping it
    // changes nothing.
    k1 == k4 && k2 == k3 && k1 != k2
}

/// Swap away crosses until a full pass finds none. Returns the number of
/// swaps made. Gives up with `RepairDidNotConverge` after
/// [`pass_limit`] passes so the caller can regenerate.
pub fn repair(grid: &mut Grid) -> Result<usize> {
    let limit = pass_limit(grid);
    let mut swaps = 0;

    for pass in 0..limit {
        let mut fixed = 0;
        for y in 1..grid.rows().saturating_sub(2) {
            for x in 1..grid.columns().saturating_sub(2) {
                let n1 = Coord::new(x, y);
                if is_cross(grid, n1) {
                    grid.swap_occupants(n1, Coord::new(x + 1, y))?;
                    fixed += 1;
                }
            }
        }
        swaps += fixed;
        if fixed == 0 {
            debug!(passes = pass + 1, swaps, "board repaired");
            return Ok(swaps);
        }
    }

    Err(EngineError::RepairDidNotConverge { passes: limit })
}
