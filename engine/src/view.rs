// ═══════════════════════════════════════════════════════════════════════
// Board view — what an automated player is allowed to see
//
// Agents never hold the grid itself. They get an owned snapshot that can
// be searched (it implements SearchGraph) but not mutated, so every
// change to the board still goes through the matcher.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::grid::{lattice_neighbours, Grid};
use crate::matcher::Selection;
use crate::pathfinding::{connect, Pathfinder, SearchGraph};
use crate::types::{Coord, KindId, Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: usize,
    pub rows: usize,
    /// Kind on each cell, row-major from the bottom-left.
    pub cells: Vec<Option<KindId>>,
    pub selection: Selection,
    pub max_turns: u32,
    pub level: u32,
    pub score: u32,
    pub time_left: f32,
}

/// A pair of same-kind tiles that can currently be matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub first: Coord,
    pub second: Coord,
    pub path: Path,
}

impl BoardView {
    pub fn from_grid(grid: &Grid, selection: Selection, max_turns: u32) -> Self {
        let cells = grid
            .nodes()
            .map(|n| n.occupant().and_then(|id| grid.tile(id).ok()).map(|t| t.kind))
            .collect();
        BoardView {
            columns: grid.columns(),
            rows: grid.rows(),
            cells,
            selection,
            max_turns,
            level: 1,
            score: 0,
            time_left: 0.0,
        }
    }

    pub fn kind_at(&self, at: Coord) -> Option<KindId> {
        if self.contains(at) {
            self.cells[at.y * self.columns + at.x]
        } else {
            None
        }
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Coord, KindId)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|kind| (Coord::new(i % self.columns, i / self.columns), kind))
        })
    }

    pub fn remaining(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining() == 0
    }

    /// Connecting path between two cells, or `None` if they are different
    /// kinds or cannot be joined within `max_turns`.
    pub fn connection(&self, a: Coord, b: Coord) -> Option<Path> {
        if a == b {
            return None;
        }
        match (self.kind_at(a), self.kind_at(b)) {
            (Some(ka), Some(kb)) if ka == kb => {}
            _ => return None,
        }
        let path = connect(&self.pathfinder(), self, a, b);
        (path.is_reachable() && path.turns <= self.max_turns).then_some(path)
    }

    /// First matchable pair found, scanning kinds in id order.
    pub fn available_match(&self) -> Option<Hint> {
        self.matches_for(None)
    }

    /// A matchable partner for the tile on `at`, if any.
    pub fn partner_of(&self, at: Coord) -> Option<Hint> {
        self.matches_for(Some(at))
    }

    fn matches_for(&self, anchor: Option<Coord>) -> Option<Hint> {
        let mut by_kind: BTreeMap<KindId, Vec<Coord>> = BTreeMap::new();
        for (at, kind) in self.occupied() {
            by_kind.entry(kind).or_default().push(at);
        }

        for cells in by_kind.values() {
            for (i, &a) in cells.iter().enumerate() {
                if anchor.is_some_and(|anchor| anchor != a) {
                    continue;
                }
                let partners = if anchor.is_some() { &cells[..] } else { &cells[i + 1..] };
                for &b in partners {
                    if let Some(path) = self.connection(a, b) {
                        return Some(Hint { first: a, second: b, path });
                    }
                }
            }
        }
        None
    }

    fn pathfinder(&self) -> Pathfinder {
        Pathfinder::for_area(self.columns * self.rows)
    }
}

impl SearchGraph for BoardView {
    fn contains(&self, at: Coord) -> bool {
        at.x < self.columns && at.y < self.rows
    }

    fn weight(&self, at: Coord) -> f32 {
        match self.contains(at) {
            true if self.kind_at(at).is_none() => 1.0,
            _ => -1.0,
        }
    }

    fn neighbours(&self, at: Coord) -> Vec<Coord> {
        lattice_neighbours(at, self.columns, self.rows)
    }
}

/// Text rendering, top row first: `.` for empty cells, a letter per kind
/// (wrapping after 26 kinds), brackets around the selection.
impl std::fmt::Display for BoardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.rows).rev() {
            for x in 0..self.columns {
                let at = Coord::new(x, y);
                let glyph = match self.kind_at(at) {
                    Some(KindId(k)) => (b'A' + (k % 26) as u8) as char,
                    None => '.',
                };
                if self.selection == Selection::Selected(at) {
                    write!(f, "[{}]", glyph)?;
                } else {
                    write!(f, " {} ", glyph)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
