// ═══════════════════════════════════════════════════════════════════════
// Matcher — selection state machine and sole mutator of the grid in play
//
//   Idle          + click(n)               → Selected(n)
//   Selected(a)   + click(a)               → Idle
//   Selected(a)   + click(b), kinds differ → Selected(b)
//   Selected(a)   + click(b), kinds equal  → search a → b
//       turns ≤ max_turns → commit (clear both, emit TilesMatched) → Idle
//       otherwise         → Selected(b)
//
// A commit clears the nodes before anyone hears about it. Listeners that
// animate a match must not expect the tiles to still be on the grid.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::grid::Grid;
use crate::pathfinding::{connect, Pathfinder};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Idle,
    Selected(Coord),
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// The clicked node was empty.
    Ignored,
    Selected(Coord),
    Deselected,
    /// Same kind, but no path within the turn budget; the second tile is
    /// now selected instead.
    Rejected { from: Coord, to: Coord, turns: u32 },
    Matched { from: Coord, to: Coord, turns: u32 },
}

pub struct Matcher<S: EventSink> {
    grid: Grid,
    selection: Selection,
    max_turns: u32,
    pathfinder: Pathfinder,
    sink: S,
    cleared_reported: bool,
}

impl<S: EventSink> Matcher<S> {
    pub fn new(grid: Grid, max_turns: u32, sink: S) -> Self {
        let pathfinder = Pathfinder::for_area(grid.columns() * grid.rows());
        Matcher {
            grid,
            selection: Selection::Idle,
            max_turns,
            pathfinder,
            sink,
            cleared_reported: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Swap in a new board; the selection and cleared flag start over.
    pub fn replace_grid(&mut self, grid: Grid) -> Grid {
        self.pathfinder = Pathfinder::for_area(grid.columns() * grid.rows());
        self.selection = Selection::Idle;
        self.cleared_reported = false;
        std::mem::replace(&mut self.grid, grid)
    }

    pub fn deselect(&mut self) {
        self.selection = Selection::Idle;
    }

    pub fn into_parts(self) -> (Grid, S) {
        (self.grid, self.sink)
    }

    /// Handle a click on `at`. Out-of-range coordinates are an error;
    /// clicks on empty nodes are ignored.
    pub fn click(&mut self, at: Coord) -> Result<ClickOutcome> {
        let node = self.grid.node(at)?;
        if !node.is_occupied() {
            return Ok(ClickOutcome::Ignored);
        }

        let current = match self.selection {
            Selection::Idle => return Ok(self.select(at)),
            Selection::Selected(current) => current,
        };

        if current == at {
            self.selection = Selection::Idle;
            return Ok(ClickOutcome::Deselected);
        }

        // A selection whose tile vanished (board swapped underneath) is dropped.
        let (Some(kind_a), Some(kind_b)) = (self.grid.kind_at(current), self.grid.kind_at(at)) else {
            return Ok(self.select(at));
        };
        if kind_a != kind_b {
            return Ok(self.select(at));
        }

        let path = connect(&self.pathfinder, &self.grid, current, at);
        if !path.is_reachable() || path.turns > self.max_turns {
            debug!(from = %current, to = %at, turns = path.turns, "match rejected");
            self.selection = Selection::Selected(at);
            return Ok(ClickOutcome::Rejected { from: current, to: at, turns: path.turns });
        }

        let turns = path.turns;
        self.commit(current, at, path);
        Ok(ClickOutcome::Matched { from: current, to: at, turns })
    }

    fn select(&mut self, at: Coord) -> ClickOutcome {
        self.selection = Selection::Selected(at);
        ClickOutcome::Selected(at)
    }

    fn commit(&mut self, a: Coord, b: Coord, path: Path) {
        let first = self.take(a);
        let second = self.take(b);
        self.selection = Selection::Idle;
        debug!(from = %a, to = %b, turns = path.turns, "tiles matched");

        if let (Some(first), Some(second)) = (first, second) {
            self.sink.emit(Event::TilesMatched { first, second, path });
        }

        if !self.cleared_reported && self.grid.occupied_count() == 0 {
            self.cleared_reported = true;
            self.sink.emit(Event::BoardCleared);
        }
    }

    fn take(&mut self, at: Coord) -> Option<MatchedTile> {
        let id = self.grid.detach(at)?;
        let kind = self.grid.tile(id).ok()?.kind;
        Some(MatchedTile { id, kind, at })
    }
}
