// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite storage for game results and the agent leaderboard
// ═══════════════════════════════════════════════════════════════════════

use rusqlite::{params, Connection, Result};
use serde::Serialize;

use crate::runner::{GameResult, Outcome};

pub struct Database {
    conn: Connection,
}

/// One leaderboard line, best agents first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub games: u32,
    pub completions: u32,
    pub avg_score: f64,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn new(path: &str) -> Result<Self> {
        let db = Database { conn: Connection::open(path)? };
        db.create_schema()?;
        Ok(db)
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Result<Self> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.create_schema()?;
        Ok(db)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch("
            CREATE TABLE IF NOT EXISTS agents (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                games       INTEGER NOT NULL DEFAULT 0,
                completions INTEGER NOT NULL DEFAULT 0,
                total_score INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS games (
                id          INTEGER PRIMARY KEY,
                agent_id    INTEGER NOT NULL REFERENCES agents(id),
                seed        INTEGER NOT NULL,
                outcome     TEXT NOT NULL,
                final_level INTEGER NOT NULL,
                levels_done INTEGER NOT NULL,
                score       INTEGER NOT NULL,
                matches     INTEGER NOT NULL,
                clicks      INTEGER NOT NULL,
                played_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ")
    }

    /// Register an agent (or return existing ID).
    pub fn register_agent(&self, name: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT OR IGNORE INTO agents (name) VALUES (?1)",
            params![name],
        )?;
        self.conn.query_row(
            "SELECT id FROM agents WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
    }

    /// Store a finished game and fold it into the agent's totals.
    pub fn store_game(&self, result: &GameResult, agent_id: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO games (agent_id, seed, outcome, final_level, levels_done, score, matches, clicks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                agent_id,
                result.seed as i64,
                result.outcome.to_string(),
                result.final_level,
                result.levels_completed(),
                result.score,
                result.matches,
                result.clicks,
            ],
        )?;
        let game_id = self.conn.last_insert_rowid();

        let completed = result.outcome == Outcome::GameComplete;
        self.conn.execute(
            "UPDATE agents SET games = games + 1, completions = completions + ?1, total_score = total_score + ?2
             WHERE id = ?3",
            params![completed as i64, result.score, agent_id],
        )?;

        Ok(game_id)
    }

    /// Agents ranked by completed games, then average score.
    pub fn leaderboard(&self) -> Result<Vec<Standing>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, games, completions,
                    CASE WHEN games > 0 THEN CAST(total_score AS REAL) / games ELSE 0.0 END AS avg_score
             FROM agents
             ORDER BY completions DESC, avg_score DESC, name ASC"
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Standing {
                name: row.get(0)?,
                games: row.get(1)?,
                completions: row.get(2)?,
                avg_score: row.get(3)?,
            })
        })?;
        let standings = rows.collect::<Result<Vec<_>>>()?;
        Ok(standings)
    }

    /// Get total number of games stored.
    pub fn game_count(&self) -> Result<u32> {
        self.conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(agent: &str, seed: u64, outcome: Outcome, score: u32) -> GameResult {
        GameResult {
            seed,
            agent_name: agent.to_string(),
            outcome,
            final_level: 1,
            levels: Vec::new(),
            score,
            matches: score / 2,
            clicks: score,
            rejected: 0,
        }
    }

    #[test]
    fn test_register_agent_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let a = db.register_agent("Random").unwrap();
        let b = db.register_agent("Heuristic").unwrap();
        assert_ne!(a, b);
        assert_eq!(db.register_agent("Random").unwrap(), a);
    }

    #[test]
    fn test_store_and_rank() {
        let db = Database::in_memory().unwrap();
        let random = db.register_agent("Random").unwrap();
        let heuristic = db.register_agent("Heuristic").unwrap();

        db.store_game(&result("Random", 1, Outcome::TimeExpired, 10), random).unwrap();
        db.store_game(&result("Random", 2, Outcome::ClickLimit, 20), random).unwrap();
        db.store_game(&result("Heuristic", 1, Outcome::GameComplete, 100), heuristic).unwrap();
        assert_eq!(db.game_count().unwrap(), 3);

        let board = db.leaderboard().unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "Heuristic");
        assert_eq!(board[0].completions, 1);
        assert_eq!(board[1].games, 2);
        assert_eq!(board[1].completions, 0);
        assert!((board[1].avg_score - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_agent_without_games_averages_zero() {
        let db = Database::in_memory().unwrap();
        db.register_agent("Idle").unwrap();
        let board = db.leaderboard().unwrap();
        assert_eq!(board[0].games, 0);
        assert_eq!(board[0].avg_score, 0.0);
        assert_eq!(db.game_count().unwrap(), 0);
    }
}
