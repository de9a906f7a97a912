// ═══════════════════════════════════════════════════════════════════════
// Board generation — randomized pairs of tile kinds
// ═══════════════════════════════════════════════════════════════════════

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::types::KindId;

/// Produce `total` slots where every kind appears an even number of times.
///
/// The catalog order is shuffled, then consecutive slot pairs take the next
/// kind, cycling back once `unique` kinds have been used. The result is
/// shuffled again. With an odd `total` exactly one slot stays `None`.
/// Asking for more kinds than the catalog holds clamps to the catalog.
pub fn generate_pairs<R: Rng + ?Sized>(
    catalog_len: usize,
    unique: usize,
    total: usize,
    rng: &mut R,
) -> Result<Vec<Option<KindId>>> {
    if catalog_len == 0 {
        return Err(EngineError::EmptyCatalog);
    }
    let mut unique = unique;
    if unique > catalog_len {
        warn!(requested = unique, available = catalog_len, "not enough unique tile kinds, clamping");
        unique = catalog_len;
    }
    if unique == 0 {
        return Err(EngineError::InvalidConfig("unique kind count must be at least 1".into()));
    }

    let mut kinds: Vec<KindId> = (0..catalog_len).map(|k| KindId(k as u16)).collect();
    kinds.shuffle(rng);

    let mut slots = vec![None; total];
    let mut next = 0;
    for pair in slots.chunks_exact_mut(2) {
        let kind = kinds[next];
        pair[0] = Some(kind);
        pair[1] = Some(kind);
        next = (next + 1) % unique;
    }

    slots.shuffle(rng);
    Ok(slots)
}

/// Lay `slots` onto the interior of an empty grid, row-major from the
/// bottom-left, skipping the border. `None` slots stay empty.
pub fn populate(grid: &mut Grid, slots: &[Option<KindId>]) -> Result<()> {
    let expected = grid.interior_len();
    if slots.len() != expected {
        return Err(EngineError::InvalidConfig(format!(
            "{} slots for an interior of {} cells",
            slots.len(),
            expected
        )));
    }

    let cells: Vec<_> = grid.interior().collect();
    for (at, slot) in cells.into_iter().zip(slots) {
        if let Some(kind) = *slot {
            let tile = grid.spawn_tile(kind);
            grid.place(tile, at)?;
        }
    }
    Ok(())
}
