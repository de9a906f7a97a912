// ═══════════════════════════════════════════════════════════════════════
// Game Runner — plays a complete headless session with one agent
// ═══════════════════════════════════════════════════════════════════════

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tilelink_agents::{Agent, AgentKind};
use tilelink_engine::config::GameConfig;
use tilelink_engine::engine::{Session, Status};
use tilelink_engine::matcher::ClickOutcome;
use tracing::{debug, info, warn};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every level was cleared.
    GameComplete,
    TimeExpired,
    /// Tiles remain but no pair can be connected (or the agent gave up).
    Stuck,
    /// The click budget ran out first.
    ClickLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::GameComplete => "complete",
            Outcome::TimeExpired => "time_expired",
            Outcome::Stuck => "stuck",
            Outcome::ClickLimit => "click_limit",
        };
        write!(f, "{}", s)
    }
}

/// Summary of one cleared level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: u32,
    pub score: u32,
    pub clicks: u32,
    pub time_left: f32,
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: u64,
    pub agent_name: String,
    pub outcome: Outcome,
    /// Level being played (or just finished) when the game ended.
    pub final_level: u32,
    pub levels: Vec<LevelResult>,
    pub score: u32,
    pub matches: u32,
    pub clicks: u32,
    pub rejected: u32,
}

impl GameResult {
    pub fn levels_completed(&self) -> u32 {
        self.levels.len() as u32
    }
}

/// Play one game from `seed` until it completes, the clock runs out, the
/// board jams, or `max_clicks` clicks have been spent. Every click costs
/// `seconds_per_click` of simulated time.
pub fn run_game(
    agent: &mut dyn Agent,
    config: &GameConfig,
    seed: u64,
    max_clicks: u32,
    seconds_per_click: f32,
) -> Result<GameResult, String> {
    let mut session = Session::new(config.clone(), seed).map_err(|e| e.to_string())?;
    let mut levels = Vec::new();
    let mut clicks = 0u32;
    let mut rejected = 0u32;
    let mut level_clicks = 0u32;
    // Only matches and new levels change the board, so jams are only
    // checked after one of those.
    let mut board_changed = true;

    let outcome = loop {
        match session.status() {
            Status::Playing => {}
            Status::LevelComplete | Status::GameComplete => {
                levels.push(LevelResult {
                    level: session.level(),
                    score: session.score(),
                    clicks: level_clicks,
                    time_left: session.timer().remaining,
                });
                debug!(seed, level = session.level(), clicks = level_clicks, "level cleared");
                if session.status() == Status::GameComplete {
                    break Outcome::GameComplete;
                }
                session.load_next_level().map_err(|e| e.to_string())?;
                level_clicks = 0;
                board_changed = true;
                continue;
            }
            Status::TimeExpired => break Outcome::TimeExpired,
        }

        if clicks >= max_clicks {
            break Outcome::ClickLimit;
        }

        let view = session.view();
        if board_changed {
            if view.available_match().is_none() {
                break Outcome::Stuck;
            }
            board_changed = false;
        }

        let Some(at) = agent.choose_click(&view) else {
            break Outcome::Stuck;
        };
        match session.click(at).map_err(|e| e.to_string())? {
            ClickOutcome::Matched { .. } => board_changed = true,
            ClickOutcome::Rejected { .. } => rejected += 1,
            _ => {}
        }
        clicks += 1;
        level_clicks += 1;
        session.tick(seconds_per_click);
    };

    let result = GameResult {
        seed,
        agent_name: agent.name().to_string(),
        outcome,
        final_level: session.level(),
        levels,
        score: session.score(),
        matches: session.matches(),
        clicks,
        rejected,
    };
    info!(
        seed,
        agent = %result.agent_name,
        outcome = %result.outcome,
        level = result.final_level,
        score = result.score,
        "game finished"
    );
    Ok(result)
}

/// Run one game per seed in parallel, each with a fresh agent of `kind`.
/// Results come back in seed order.
pub fn run_batch(
    kind: AgentKind,
    config: &GameConfig,
    seeds: &[u64],
    max_clicks: u32,
    seconds_per_click: f32,
) -> Vec<Result<GameResult, String>> {
    seeds
        .par_iter()
        .map(|&seed| {
            let mut agent = kind.build(seed);
            let result = run_game(agent.as_mut(), config, seed, max_clicks, seconds_per_click);
            if let Err(e) = &result {
                warn!(seed, agent = %kind, error = %e, "game failed");
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilelink_agents::HeuristicAgent;
    use tilelink_engine::config::LevelSettings;
    use tilelink_engine::types::{Coord, TileKind};
    use tilelink_engine::view::BoardView;

    /// Two 2x2 boards of two kinds; always clearable.
    fn tiny_config() -> GameConfig {
        GameConfig {
            max_turns: 2,
            time_bonus_per_match: 2.0,
            levels: vec![
                LevelSettings::new(4, 4, 30.0, 2),
                LevelSettings::new(4, 4, 30.0, 2),
            ],
            catalog: vec![TileKind::new("Plain", 1), TileKind::new("Gold", 5)],
        }
    }

    struct Quitter;

    impl Agent for Quitter {
        fn name(&self) -> &str { "Quitter" }
        fn choose_click(&mut self, _view: &BoardView) -> Option<Coord> { None }
    }

    #[test]
    fn test_heuristic_clears_tiny_game() {
        let mut agent = HeuristicAgent::new();
        let result = run_game(&mut agent, &tiny_config(), 7, 100, 0.5).unwrap();
        assert_eq!(result.outcome, Outcome::GameComplete);
        assert_eq!(result.levels_completed(), 2);
        assert_eq!(result.score, 24);
        assert_eq!(result.matches, 4);
        assert_eq!(result.final_level, 2);
        assert_eq!(result.clicks, 8);
        assert_eq!(result.agent_name, "Heuristic");
    }

    #[test]
    fn test_click_budget_ends_game() {
        let mut agent = HeuristicAgent::new();
        let result = run_game(&mut agent, &tiny_config(), 7, 3, 0.5).unwrap();
        assert_eq!(result.outcome, Outcome::ClickLimit);
        assert_eq!(result.clicks, 3);
        assert!(result.levels.is_empty());
    }

    #[test]
    fn test_slow_clicks_run_out_the_clock() {
        let mut agent = HeuristicAgent::new();
        let result = run_game(&mut agent, &tiny_config(), 7, 100, 100.0).unwrap();
        assert_eq!(result.outcome, Outcome::TimeExpired);
        assert_eq!(result.clicks, 1);
    }

    #[test]
    fn test_agent_giving_up_is_stuck() {
        let result = run_game(&mut Quitter, &tiny_config(), 7, 100, 0.5).unwrap();
        assert_eq!(result.outcome, Outcome::Stuck);
        assert_eq!(result.clicks, 0);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = tiny_config();
        config.levels.clear();
        assert!(run_game(&mut Quitter, &config, 1, 10, 1.0).is_err());
    }

    #[test]
    fn test_batch_keeps_seed_order() {
        let seeds = [3, 1, 4, 1, 5];
        let results = run_batch(AgentKind::Heuristic, &tiny_config(), &seeds, 100, 0.5);
        assert_eq!(results.len(), seeds.len());
        for (result, &seed) in results.iter().zip(&seeds) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.seed, seed);
            assert_eq!(result.outcome, Outcome::GameComplete);
        }
    }

    #[test]
    fn test_random_agent_is_deterministic() {
        let config = GameConfig::default();
        let a = run_game(AgentKind::Random.build(9).as_mut(), &config, 9, 200, 0.1).unwrap();
        let b = run_game(AgentKind::Random.build(9).as_mut(), &config, 9, 200, 0.1).unwrap();
        assert_eq!(a, b);
        assert!(a.clicks <= 200);
    }
}
