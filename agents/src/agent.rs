// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface every automated player implements
//
// Agents receive a `BoardView` snapshot, never the live grid. The only
// way an agent changes the board is by returning a click, which the
// session routes through the matcher like any human click.
// ═══════════════════════════════════════════════════════════════════════

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tilelink_engine::types::Coord;
use tilelink_engine::view::BoardView;

use crate::heuristic::HeuristicAgent;
use crate::random::RandomAgent;

pub trait Agent: Send + Sync {
    /// Human-readable name, used as the key in result storage.
    fn name(&self) -> &str;

    /// Next cell to click, or `None` to give up on the board.
    fn choose_click(&mut self, view: &BoardView) -> Option<Coord>;
}

/// The agent implementations that can be picked by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Random,
    Heuristic,
}

impl AgentKind {
    pub const ALL: [AgentKind; 2] = [AgentKind::Random, AgentKind::Heuristic];

    pub fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::Heuristic => Box::new(HeuristicAgent::new()),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Random => write!(f, "random"),
            AgentKind::Heuristic => write!(f, "heuristic"),
        }
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "heuristic" => Ok(AgentKind::Heuristic),
            other => Err(format!("unknown agent '{}' (expected random or heuristic)", other)),
        }
    }
}
