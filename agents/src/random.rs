// ═══════════════════════════════════════════════════════════════════════
// Random Agent — clicks random tiles.
// Baseline for comparison and a stress test for the matcher.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilelink_engine::matcher::Selection;
use tilelink_engine::types::Coord;
use tilelink_engine::view::BoardView;

pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }

    fn choose_click(&mut self, view: &BoardView) -> Option<Coord> {
        let occupied: Vec<_> = view.occupied().collect();

        // Half the time, follow up a selection with a tile of the same kind.
        if let Selection::Selected(at) = view.selection {
            if let Some(kind) = view.kind_at(at) {
                let same: Vec<Coord> = occupied.iter()
                    .filter(|&&(c, k)| k == kind && c != at)
                    .map(|&(c, _)| c)
                    .collect();
                if !same.is_empty() && self.rng.gen_bool(0.5) {
                    return same.choose(&mut self.rng).copied();
                }
            }
        }

        occupied.choose(&mut self.rng).map(|&(c, _)| c)
    }
}
