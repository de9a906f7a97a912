// ═══════════════════════════════════════════════════════════════════════
// Configuration — per-level settings and game-wide rules
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{default_catalog, TileKind};

/// Grid size includes the empty border, so a 10x10 level has an 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    pub width: usize,
    pub height: usize,
    /// Seconds on the clock at level start.
    pub time_limit: f32,
    pub unique_kinds: usize,
}

impl LevelSettings {
    pub const fn new(width: usize, height: usize, time_limit: f32, unique_kinds: usize) -> Self {
        LevelSettings { width, height, time_limit, unique_kinds }
    }

    /// Number of playable (non-border) cells.
    pub fn slot_count(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Most direction changes a connecting path may have.
    pub max_turns: u32,
    /// Seconds added to the clock per committed match.
    pub time_bonus_per_match: f32,
    /// Level 1 is `levels[0]`.
    pub levels: Vec<LevelSettings>,
    pub catalog: Vec<TileKind>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_turns: 2,
            time_bonus_per_match: 2.0,
            levels: vec![
                LevelSettings::new(10, 10, 70.0, 12),
                LevelSettings::new(14, 10, 100.0, 16),
                LevelSettings::new(17, 10, 180.0, 20),
            ],
            catalog: default_catalog(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(EngineError::InvalidConfig("at least one level is required".into()));
        }
        if self.catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        if self.time_bonus_per_match < 0.0 {
            return Err(EngineError::InvalidConfig("time bonus cannot be negative".into()));
        }
        for (i, level) in self.levels.iter().enumerate() {
            if level.width < 3 || level.height < 3 {
                return Err(EngineError::InvalidConfig(format!(
                    "level {} is {}x{}; a board needs at least 3x3 including its border",
                    i + 1,
                    level.width,
                    level.height
                )));
            }
            if level.unique_kinds == 0 {
                return Err(EngineError::InvalidConfig(format!("level {} has no tile kinds", i + 1)));
            }
            if level.time_limit <= 0.0 {
                return Err(EngineError::InvalidConfig(format!("level {} has no time", i + 1)));
            }
        }
        Ok(())
    }

    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Settings for a 1-based level, clamped into the configured range.
    pub fn level(&self, level: u32) -> &LevelSettings {
        let idx = (level.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        &self.levels[idx]
    }
}
