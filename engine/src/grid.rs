// ═══════════════════════════════════════════════════════════════════════
// Grid — rectangular lattice of nodes with a one-cell empty border
//
// Nodes live in a flat arena indexed by `y * columns + x`. Adjacency is
// not stored; it is derived from coordinates on demand, so a resize only
// has to rebuild the arena.
//
// Occupancy and walkability are coupled: placing a tile makes its node
// impassable, detaching it makes the node walkable again.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{EngineError, Result};
use crate::pathfinding::SearchGraph;
use crate::types::*;

/// Weight given to a node while a tile sits on it.
pub const BLOCKED: f32 = -1.0;
/// Default traversal cost of an empty node.
pub const WALKABLE: f32 = 1.0;

/// One addressable cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    coord: Coord,
    weight: f32,
    occupant: Option<TileId>,
}

impl Node {
    fn new(coord: Coord) -> Self {
        Node { coord, weight: WALKABLE, occupant: None }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Traversal cost; negative means impassable.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn occupant(&self) -> Option<TileId> {
        self.occupant
    }

    pub fn is_walkable(&self) -> bool {
        self.weight >= 0.0
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    columns: usize,
    rows: usize,
    nodes: Vec<Node>,
    /// Every tile spawned for the current board, matched ones included.
    /// Indexed by `TileId`.
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        let mut grid = Grid { columns: 0, rows: 0, nodes: Vec::new(), tiles: Vec::new() };
        grid.resize(columns, rows)?;
        Ok(grid)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rebuild the lattice. Any previously obtained coordinates or tile ids
    /// become meaningless; live tiles must be cleared first.
    pub fn resize(&mut self, columns: usize, rows: usize) -> Result<()> {
        if columns == 0 || rows == 0 {
            return Err(EngineError::InvalidDimensions { columns, rows });
        }
        let occupied = self.occupied_count();
        if occupied > 0 {
            return Err(EngineError::ResizeWhileOccupied { occupied });
        }

        self.columns = columns;
        self.rows = rows;
        self.nodes = (0..rows)
            .flat_map(|y| (0..columns).map(move |x| Node::new(Coord::new(x, y))))
            .collect();
        self.tiles.clear();
        Ok(())
    }

    /// Detach every occupant and reset all weights to walkable.
    pub fn clear(&mut self) {
        self.clear_with(|_| {});
    }

    /// Like [`clear`](Self::clear), handing each detached tile to `dispose` first.
    pub fn clear_with<F: FnMut(&Tile)>(&mut self, mut dispose: F) {
        for node in &mut self.nodes {
            if let Some(id) = node.occupant.take() {
                let tile = &mut self.tiles[id.0 as usize];
                tile.node = None;
                dispose(tile);
            }
            node.weight = WALKABLE;
        }
    }

    // ── Lookup ─────────────────────────────────────────────────────────

    pub fn contains(&self, at: Coord) -> bool {
        at.x < self.columns && at.y < self.rows
    }

    fn index(&self, at: Coord) -> Result<usize> {
        if self.contains(at) {
            Ok(at.y * self.columns + at.x)
        } else {
            Err(EngineError::OutOfBounds { x: at.x, y: at.y, columns: self.columns, rows: self.rows })
        }
    }

    pub fn node_at(&self, x: usize, y: usize) -> Result<&Node> {
        self.node(Coord::new(x, y))
    }

    pub fn node(&self, at: Coord) -> Result<&Node> {
        let i = self.index(at)?;
        Ok(&self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn is_border(&self, at: Coord) -> bool {
        at.x == 0 || at.y == 0 || at.x + 1 >= self.columns || at.y + 1 >= self.rows
    }

    /// Playable cells in row-major order (bottom row first), border excluded.
    pub fn interior(&self) -> impl Iterator<Item = Coord> + '_ {
        let columns = self.columns;
        (1..self.rows.saturating_sub(1))
            .flat_map(move |y| (1..columns.saturating_sub(1)).map(move |x| Coord::new(x, y)))
    }

    pub fn interior_len(&self) -> usize {
        self.columns.saturating_sub(2) * self.rows.saturating_sub(2)
    }

    /// 4-connected neighbours in the order left, down, up, right.
    pub fn neighbours(&self, at: Coord) -> Vec<Coord> {
        lattice_neighbours(at, self.columns, self.rows)
    }

    /// Number of nodes holding a tile. O(area).
    pub fn occupied_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.occupant.is_some()).count()
    }

    // ── Tiles ──────────────────────────────────────────────────────────

    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        self.tiles.get(id.0 as usize).ok_or(EngineError::UnknownTile(id.0))
    }

    pub fn tile_at(&self, at: Coord) -> Option<&Tile> {
        let occupant = self.node(at).ok()?.occupant?;
        self.tiles.get(occupant.0 as usize)
    }

    pub fn kind_at(&self, at: Coord) -> Option<KindId> {
        self.tile_at(at).map(|t| t.kind)
    }

    /// Create an unplaced tile of the given kind.
    pub fn spawn_tile(&mut self, kind: KindId) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(Tile { id, kind, node: None });
        id
    }

    /// Put `tile` on `at`. The tile leaves its previous node, and whatever
    /// tile was on `at` before is evicted (left unplaced).
    pub fn place(&mut self, tile: TileId, at: Coord) -> Result<()> {
        let target = self.index(at)?;
        if self.is_border(at) {
            return Err(EngineError::BorderCell(at));
        }
        let previous = self.tile(tile)?.node;

        if let Some(prev) = previous {
            self.detach(prev);
        }
        self.detach(at);

        self.nodes[target].occupant = Some(tile);
        self.nodes[target].weight = BLOCKED;
        self.tiles[tile.0 as usize].node = Some(at);
        Ok(())
    }

    /// Remove the occupant of `at`, making the node walkable again.
    pub fn detach(&mut self, at: Coord) -> Option<TileId> {
        let i = self.index(at).ok()?;
        let id = self.nodes[i].occupant.take()?;
        self.nodes[i].weight = WALKABLE;
        self.tiles[id.0 as usize].node = None;
        Some(id)
    }

    /// Exchange the occupants (and weights) of two nodes.
    pub fn swap_occupants(&mut self, a: Coord, b: Coord) -> Result<()> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        if ia == ib {
            return Ok(());
        }

        let (occ_a, w_a) = (self.nodes[ia].occupant, self.nodes[ia].weight);
        let (occ_b, w_b) = (self.nodes[ib].occupant, self.nodes[ib].weight);
        self.nodes[ia].occupant = occ_b;
        self.nodes[ia].weight = w_b;
        self.nodes[ib].occupant = occ_a;
        self.nodes[ib].weight = w_a;

        if let Some(id) = occ_a {
            self.tiles[id.0 as usize].node = Some(b);
        }
        if let Some(id) = occ_b {
            self.tiles[id.0 as usize].node = Some(a);
        }
        Ok(())
    }

    /// Override the traversal cost of an empty node. Border nodes must stay
    /// walkable, and occupied nodes keep their blocked weight.
    pub fn set_weight(&mut self, at: Coord, weight: f32) -> Result<()> {
        let i = self.index(at)?;
        if weight < 0.0 && self.is_border(at) {
            return Err(EngineError::BorderCell(at));
        }
        if self.nodes[i].occupant.is_none() {
            self.nodes[i].weight = weight;
        }
        Ok(())
    }
}

/// Neighbours of `at` on a `columns` x `rows` lattice: left, down, up, right.
pub(crate) fn lattice_neighbours(at: Coord, columns: usize, rows: usize) -> Vec<Coord> {
    let mut out = Vec::with_capacity(4);
    if at.x >= columns || at.y >= rows {
        return out;
    }
    if at.x > 0 {
        out.push(Coord::new(at.x - 1, at.y));
    }
    if at.y > 0 {
        out.push(Coord::new(at.x, at.y - 1));
    }
    if at.y + 1 < rows {
        out.push(Coord::new(at.x, at.y + 1));
    }
    if at.x + 1 < columns {
        out.push(Coord::new(at.x + 1, at.y));
    }
    out
}

impl SearchGraph for Grid {
    fn contains(&self, at: Coord) -> bool {
        Grid::contains(self, at)
    }

    fn weight(&self, at: Coord) -> f32 {
        self.node(at).map_or(BLOCKED, |n| n.weight)
    }

    fn neighbours(&self, at: Coord) -> Vec<Coord> {
        Grid::neighbours(self, at)
    }
}
