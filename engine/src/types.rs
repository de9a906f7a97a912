// ═══════════════════════════════════════════════════════════════════════
// Core types — coordinates, tile kinds, tiles, paths, events
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Coordinates ────────────────────────────────────────────────────────

/// Column/row address of a grid cell. (0, 0) is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// Manhattan distance, the search heuristic on a 4-connected lattice.
    pub fn manhattan(self, other: Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Movement vector from `self` to `to`.
    pub fn heading_to(self, to: Coord) -> Heading {
        Heading {
            dx: to.x as isize - self.x as isize,
            dy: to.y as isize - self.y as isize,
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction of travel between two consecutive path nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    pub dx: isize,
    pub dy: isize,
}

// ── Tile kinds ─────────────────────────────────────────────────────────
// A kind is identified by its index into the level's catalog.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KindId(pub u16);

/// Catalog entry: display name plus the points awarded per matched tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileKind {
    pub name: String,
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    1
}

impl TileKind {
    pub fn new(name: impl Into<String>, points: u32) -> Self {
        TileKind { name: name.into(), points }
    }
}

/// Built-in catalog, large enough for the hardest default level.
pub fn default_catalog() -> Vec<TileKind> {
    const NAMES: [(&str, u32); 24] = [
        ("Apple", 1), ("Banana", 1), ("Cherry", 1), ("Date", 1),
        ("Elder", 1), ("Fig", 1), ("Grape", 1), ("Hazel", 1),
        ("Iris", 1), ("Juniper", 1), ("Kiwi", 1), ("Lemon", 1),
        ("Mango", 2), ("Nutmeg", 2), ("Olive", 2), ("Peach", 2),
        ("Quince", 2), ("Rowan", 2), ("Sage", 2), ("Thyme", 2),
        ("Ugli", 3), ("Vanilla", 3), ("Walnut", 3), ("Yuzu", 3),
    ];
    NAMES.iter().map(|&(name, points)| TileKind::new(name, points)).collect()
}

// ── Tiles ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A typed occupant. `node` is the back-reference to the cell holding it;
/// the grid keeps both sides in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: KindId,
    pub(crate) node: Option<Coord>,
}

impl Tile {
    /// The cell this tile sits on, or None once it has been matched or evicted.
    pub fn node(&self) -> Option<Coord> {
        self.node
    }

    pub fn is_placed(&self) -> bool {
        self.node.is_some()
    }
}

// ── Path ───────────────────────────────────────────────────────────────

/// Turn count reported when no connection exists.
pub const UNREACHABLE: u32 = u32::MAX;

/// Ordered nodes from source to target inclusive plus the number of
/// direction changes along them. An empty path means "no connection".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<Coord>,
    pub turns: u32,
}

impl Path {
    pub fn unreachable() -> Self {
        Path { nodes: Vec::new(), turns: UNREACHABLE }
    }

    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── Events ─────────────────────────────────────────────────────────────

/// Snapshot of a tile at the moment it was matched. The tile's node has
/// already been cleared when a consumer sees this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTile {
    pub id: TileId,
    pub kind: KindId,
    pub at: Coord,
}

/// Outbound notifications from the matcher and the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Two tiles were connected and removed from the grid.
    TilesMatched {
        first: MatchedTile,
        second: MatchedTile,
        path: Path,
    },
    /// The last occupied node was cleared.
    BoardCleared,
    ScoreChanged { score: u32 },
    LevelStarted { level: u32 },
    LevelComplete { level: u32 },
    GameComplete,
    TimeExpired,
    GameReset,
}

/// Receiver for outbound events, held by the matcher for the lifetime of a board.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl EventSink for std::sync::mpsc::Sender<Event> {
    fn emit(&mut self, event: Event) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.send(event);
    }
}
