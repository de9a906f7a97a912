// ═══════════════════════════════════════════════════════════════════════
// Heuristic Agent — only clicks pairs it has already verified connect.
// Significantly stronger than RandomAgent.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use tilelink_engine::matcher::Selection;
use tilelink_engine::types::Coord;
use tilelink_engine::view::{BoardView, Hint};
use tracing::trace;

#[derive(Debug, Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    pub fn new() -> Self {
        HeuristicAgent
    }

    /// Best pair on the board: fewest turns, then shortest path.
    fn best_pair(&self, view: &BoardView) -> Option<Hint> {
        let occupied: Vec<_> = view.occupied().collect();
        let mut best: Option<Hint> = None;

        for (i, &(a, kind_a)) in occupied.iter().enumerate() {
            for &(b, kind_b) in &occupied[i + 1..] {
                if kind_a != kind_b {
                    continue;
                }
                let Some(path) = view.connection(a, b) else { continue };
                let better = match &best {
                    None => true,
                    Some(h) => (path.turns, path.len()) < (h.path.turns, h.path.len()),
                };
                if better {
                    best = Some(Hint { first: a, second: b, path });
                }
            }
        }
        best
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str { "Heuristic" }

    fn choose_click(&mut self, view: &BoardView) -> Option<Coord> {
        // Finish what is already selected when it has a partner.
        if let Selection::Selected(at) = view.selection {
            if let Some(hint) = view.partner_of(at) {
                return Some(hint.second);
            }
        }

        let hint = self.best_pair(view)?;
        trace!(first = %hint.first, second = %hint.second, turns = hint.path.turns, "heuristic pick");
        // Clicking `first` either selects it or, if a same-kind tile without a
        // partner is selected, gets rejected and leaves `first` selected.
        Some(hint.first)
    }
}
