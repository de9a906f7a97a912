// ═══════════════════════════════════════════════════════════════════════
// Session — levels, score and clock around one matcher
//
// Architecture:
//   The session is a pure state machine. It never sleeps or renders.
//   The caller feeds it clicks and elapsed time; it answers with a
//   ClickOutcome and queues events that the caller drains.
//
// Flow:
//   1. `Session::new(config, seed)` deals level 1 and starts the clock
//   2. Caller sends `click(coord)` / `tick(seconds)`
//   3. Matches add score and bonus time; a cleared board completes the level
//   4. Caller calls `load_next_level()` (or `reset()`) and repeats
// ═══════════════════════════════════════════════════════════════════════

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameConfig;
use crate::error::Result;
use crate::matcher::{ClickOutcome, Matcher};
use crate::setup::build_board;
use crate::types::*;
use crate::view::BoardView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    LevelComplete,
    GameComplete,
    TimeExpired,
}

/// Countdown for one level. Only runs while `active`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub remaining: f32,
    pub limit: f32,
    pub active: bool,
}

impl Timer {
    fn new(limit: f32) -> Self {
        Timer { remaining: limit, limit, active: false }
    }

    pub fn fraction(&self) -> f32 {
        if self.limit > 0.0 {
            self.remaining / self.limit
        } else {
            0.0
        }
    }

    fn add(&mut self, seconds: f32) {
        self.remaining = (self.remaining + seconds).clamp(0.0, self.limit);
    }
}

pub struct Session {
    config: GameConfig,
    rng: ChaCha8Rng,
    level: u32,
    score: u32,
    matches: u32,
    status: Status,
    timer: Timer,
    matcher: Matcher<Vec<Event>>,
    events: Vec<Event>,
}

impl Session {
    /// Validate `config` and deal level 1.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let settings = *config.level(1);
        let grid = build_board(&settings, config.catalog.len(), &mut rng)?;
        let matcher = Matcher::new(grid, config.max_turns, Vec::new());

        let mut session = Session {
            timer: Timer::new(settings.time_limit),
            config,
            rng,
            level: 1,
            score: 0,
            matches: 0,
            status: Status::Playing,
            matcher,
            events: Vec::new(),
        };
        session.begin_level();
        Ok(session)
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Matches committed since the last reset.
    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn timer(&self) -> Timer {
        self.timer
    }

    pub fn matcher(&self) -> &Matcher<Vec<Event>> {
        &self.matcher
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.config.max_level()
    }

    pub fn view(&self) -> BoardView {
        let mut view = BoardView::from_grid(self.matcher.grid(), self.matcher.selection(), self.matcher.max_turns());
        view.level = self.level;
        view.score = self.score;
        view.time_left = self.timer.remaining;
        view
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Input ──────────────────────────────────────────────────────────

    pub fn click(&mut self, at: Coord) -> Result<ClickOutcome> {
        if self.status != Status::Playing {
            return Ok(ClickOutcome::Ignored);
        }
        let outcome = self.matcher.click(at)?;
        let fired = std::mem::take(self.matcher.sink_mut());
        for event in fired {
            self.events.push(event.clone());
            self.react(&event);
        }
        Ok(outcome)
    }

    /// Advance the clock by `seconds` of play.
    pub fn tick(&mut self, seconds: f32) {
        if !self.timer.active || self.status != Status::Playing {
            return;
        }
        self.timer.remaining -= seconds;
        if self.timer.remaining <= 0.0 {
            self.timer.remaining = 0.0;
            self.timer.active = false;
            self.status = Status::TimeExpired;
            info!(level = self.level, score = self.score, "time expired");
            self.events.push(Event::TimeExpired);
        }
    }

    // ── Progression ────────────────────────────────────────────────────

    /// Deal the next level (the final level is replayed once reached).
    pub fn load_next_level(&mut self) -> Result<()> {
        self.level = (self.level + 1).min(self.config.max_level());
        self.deal()
    }

    /// Back to level 1 with a zero score.
    pub fn reset(&mut self) -> Result<()> {
        self.level = 1;
        self.matches = 0;
        self.set_score(0);
        self.events.push(Event::GameReset);
        self.deal()
    }

    fn deal(&mut self) -> Result<()> {
        let settings = *self.config.level(self.level);
        let grid = build_board(&settings, self.config.catalog.len(), &mut self.rng)?;
        self.matcher.replace_grid(grid);
        self.timer = Timer::new(settings.time_limit);
        self.begin_level();
        Ok(())
    }

    fn begin_level(&mut self) {
        self.status = Status::Playing;
        self.timer.active = true;
        info!(level = self.level, tiles = self.matcher.grid().occupied_count(), "level started");
        self.events.push(Event::LevelStarted { level: self.level });
    }

    fn react(&mut self, event: &Event) {
        match event {
            Event::TilesMatched { first, second, .. } => {
                self.matches += 1;
                let points = self.points(first.kind) + self.points(second.kind);
                self.set_score(self.score + points);
                self.timer.add(self.config.time_bonus_per_match);
            }
            Event::BoardCleared => {
                self.timer.active = false;
                info!(level = self.level, score = self.score, "level complete");
                self.events.push(Event::LevelComplete { level: self.level });
                if self.is_final_level() {
                    self.status = Status::GameComplete;
                    self.events.push(Event::GameComplete);
                } else {
                    self.status = Status::LevelComplete;
                }
            }
            _ => {}
        }
    }

    fn points(&self, kind: KindId) -> u32 {
        self.config.catalog.get(kind.0 as usize).map_or(0, |k| k.points)
    }

    fn set_score(&mut self, score: u32) {
        if score != self.score {
            self.score = score;
            self.events.push(Event::ScoreChanged { score });
        }
    }
}
