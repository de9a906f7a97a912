// ═══════════════════════════════════════════════════════════════════════
// Pathfinding — minimum-turn A* over any node graph
//
// Search entries are keyed by (node, incoming heading), not by node
// alone: the same cell reached from two directions carries different
// turn counts, and both must stay in play.
//
// Cost = sum of node weights + `turn_penalty` per direction change. The
// penalty dominates raw distance, so the cheapest path is the one with
// the fewest turns and length only breaks ties.
// ═══════════════════════════════════════════════════════════════════════

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::{Coord, Heading, Path};

/// Penalty used on boards small enough that no path can outgrow it.
pub const DEFAULT_TURN_PENALTY: f32 = 100.0;

/// What the pathfinder needs from a graph. Negative weight = impassable.
pub trait SearchGraph {
    fn contains(&self, at: Coord) -> bool;
    fn weight(&self, at: Coord) -> f32;
    fn neighbours(&self, at: Coord) -> Vec<Coord>;
}

/// Read-only overlay that treats one node as walkable without touching the
/// underlying graph. Connecting two tiles needs this because the target
/// is itself occupied.
pub struct WalkableTarget<'a, G: SearchGraph + ?Sized> {
    graph: &'a G,
    target: Coord,
}

impl<'a, G: SearchGraph + ?Sized> WalkableTarget<'a, G> {
    pub fn new(graph: &'a G, target: Coord) -> Self {
        WalkableTarget { graph, target }
    }
}

impl<G: SearchGraph + ?Sized> SearchGraph for WalkableTarget<'_, G> {
    fn contains(&self, at: Coord) -> bool {
        self.graph.contains(at)
    }

    fn weight(&self, at: Coord) -> f32 {
        if at == self.target {
            1.0
        } else {
            self.graph.weight(at)
        }
    }

    fn neighbours(&self, at: Coord) -> Vec<Coord> {
        self.graph.neighbours(at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pathfinder {
    pub turn_penalty: f32,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Pathfinder { turn_penalty: DEFAULT_TURN_PENALTY }
    }
}

// One step of the search. Parents are indices into the step arena.
struct Step {
    node: Coord,
    heading: Option<Heading>,
    g: f32,
    f: f32,
    turns: u32,
    parent: Option<usize>,
}

impl Pathfinder {
    /// Pathfinder whose turn penalty exceeds any simple path on a board of
    /// `cells` unit-weight nodes, keeping turns the primary criterion.
    pub fn for_area(cells: usize) -> Self {
        Pathfinder { turn_penalty: DEFAULT_TURN_PENALTY.max(cells as f32 + 1.0) }
    }

    /// Find the path from `source` to `target` with the fewest turns.
    ///
    /// Weights are read as-is: callers connecting two occupied nodes should
    /// wrap the graph in [`WalkableTarget`] (see [`connect`]). Missing
    /// endpoints and exhausted searches both yield [`Path::unreachable`].
    pub fn find_path<G: SearchGraph + ?Sized>(&self, graph: &G, source: Coord, target: Coord) -> Path {
        if !graph.contains(source) || !graph.contains(target) {
            warn!(%source, %target, "find_path called with a node outside the graph");
            return Path::unreachable();
        }

        let mut steps: Vec<Step> = vec![Step {
            node: source,
            heading: None,
            g: 0.0,
            f: 0.0,
            turns: 0,
            parent: None,
        }];
        // Insertion-ordered so ties on f resolve to the earliest entry.
        let mut open: Vec<usize> = vec![0];
        let mut open_index: HashMap<(Coord, Option<Heading>), usize> = HashMap::new();
        let mut closed: HashSet<(Coord, Option<Heading>)> = HashSet::new();
        open_index.insert((source, None), 0);

        while let Some(pos) = lowest_f(&steps, &open) {
            let current = open.remove(pos);
            let (node, heading, g, turns) = {
                let s = &steps[current];
                (s.node, s.heading, s.g, s.turns)
            };

            if node == target {
                // The first move always registers as a turn; discount it.
                return Path { nodes: unwind(&steps, current), turns: turns.saturating_sub(1) };
            }

            open_index.remove(&(node, heading));
            closed.insert((node, heading));

            for next in graph.neighbours(node) {
                let weight = graph.weight(next);
                let next_heading = Some(node.heading_to(next));
                if weight < 0.0 || closed.contains(&(next, next_heading)) {
                    continue;
                }

                let mut next_g = g + weight;
                let mut next_turns = turns;
                if next_heading != heading {
                    next_g += self.turn_penalty;
                    next_turns += 1;
                }
                let next_f = next_g + next.manhattan(target) as f32;

                match open_index.get(&(next, next_heading)) {
                    Some(&existing) => {
                        let step = &mut steps[existing];
                        if next_g < step.g {
                            step.g = next_g;
                            step.f = next_f;
                            step.turns = next_turns;
                            step.parent = Some(current);
                        }
                    }
                    None => {
                        steps.push(Step {
                            node: next,
                            heading: next_heading,
                            g: next_g,
                            f: next_f,
                            turns: next_turns,
                            parent: Some(current),
                        });
                        let id = steps.len() - 1;
                        open.push(id);
                        open_index.insert((next, next_heading), id);
                    }
                }
            }
        }

        Path::unreachable()
    }
}

/// Connect two occupied nodes: `target` is treated as walkable for the
/// duration of the search only.
pub fn connect<G: SearchGraph + ?Sized>(pathfinder: &Pathfinder, graph: &G, source: Coord, target: Coord) -> Path {
    pathfinder.find_path(&WalkableTarget::new(graph, target), source, target)
}

/// Position in `open` of the first entry with the minimum f score.
fn lowest_f(steps: &[Step], open: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (pos, &id) in open.iter().enumerate() {
        let f = steps[id].f;
        match best {
            Some((_, best_f)) if f >= best_f => {}
            _ => best = Some((pos, f)),
        }
    }
    best.map(|(pos, _)| pos)
}

fn unwind(steps: &[Step], mut id: usize) -> Vec<Coord> {
    let mut nodes = vec![steps[id].node];
    while let Some(parent) = steps[id].parent {
        nodes.push(steps[parent].node);
        id = parent;
    }
    nodes.reverse();
    nodes
}
