// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing boards and running tournaments
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tilelink_agents::AgentKind;
use tilelink_engine::config::GameConfig;
use tilelink_engine::matcher::Selection;
use tilelink_engine::setup::build_board;
use tilelink_engine::view::BoardView;
use tilelink_tournament::{run_batch, run_game, Database, Outcome};
use tracing::info;

#[derive(Parser)]
#[command(name = "tilelink", about = "Tile-pairing puzzle lab")]
struct Cli {
    /// JSON game configuration; built-in levels are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game with one agent
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Agent type: "random" or "heuristic"
        #[arg(short, long, default_value = "heuristic")]
        agent: String,
        #[arg(long, default_value_t = 5_000)]
        max_clicks: u32,
        /// Simulated seconds spent per click
        #[arg(long, default_value_t = 0.5)]
        seconds_per_click: f32,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the board a seed deals for a level
    Board {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 1)]
        level: u32,
        #[arg(long)]
        json: bool,
    },
    /// Run a tournament of N games
    Tournament {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value = "results.db")]
        db: String,
        /// Agent type: "random", "heuristic", or "mixed" (both on the same seeds)
        #[arg(short, long, default_value = "mixed")]
        agent: String,
        #[arg(long, default_value_t = 5_000)]
        max_clicks: u32,
        #[arg(long, default_value_t = 0.5)]
        seconds_per_click: f32,
    },
    /// Show leaderboard from database
    Leaderboard {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Play { seed, agent, max_clicks, seconds_per_click, json } => {
            cmd_play(&config, seed, &agent, max_clicks, seconds_per_click, json)
        }
        Commands::Board { seed, level, json } => cmd_board(&config, seed, level, json),
        Commands::Tournament { games, db, agent, max_clicks, seconds_per_click } => {
            cmd_tournament(&config, games, &db, &agent, max_clicks, seconds_per_click)
        }
        Commands::Leaderboard { db } => cmd_leaderboard(&db),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig, String> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let config = GameConfig::from_json(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
    info!(path = %path.display(), levels = config.max_level(), "loaded config");
    Ok(config)
}

fn cmd_play(
    config: &GameConfig,
    seed: u64,
    agent_type: &str,
    max_clicks: u32,
    seconds_per_click: f32,
    json: bool,
) -> Result<(), String> {
    let kind: AgentKind = agent_type.parse()?;
    let mut agent = kind.build(seed);
    let result = run_game(agent.as_mut(), config, seed, max_clicks, seconds_per_click)?;

    if json {
        let text = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== Tile-Pairing Puzzle Lab ===\n");
    println!("Single game: seed={}, agent={}\n", seed, result.agent_name);
    for level in &result.levels {
        println!(
            "  Level {:>2} cleared -- score: {:>5}, clicks: {:>4}, time left: {:>6.1}s",
            level.level, level.score, level.clicks, level.time_left
        );
    }
    println!();
    println!("  Outcome:  {}", result.outcome);
    println!("  Level:    {} / {}", result.final_level, config.max_level());
    println!("  Score:    {}", result.score);
    println!("  Matches:  {} ({} rejected attempts)", result.matches, result.rejected);
    println!("  Clicks:   {}", result.clicks);
    Ok(())
}

fn cmd_board(config: &GameConfig, seed: u64, level: u32, json: bool) -> Result<(), String> {
    let settings = config.level(level);
    // Level 1 dealt from a fresh seed matches the first board `play` sees.
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = build_board(settings, config.catalog.len(), &mut rng).map_err(|e| e.to_string())?;
    let view = BoardView::from_grid(&grid, Selection::Idle, config.max_turns);

    if json {
        let text = serde_json::to_string_pretty(&view).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!(
        "Level {} ({}x{}, {} kinds, {:.0}s), seed {}\n",
        level.clamp(1, config.max_level()),
        settings.width,
        settings.height,
        settings.unique_kinds,
        settings.time_limit,
        seed
    );
    print!("{}", view);
    println!();

    let mut used: Vec<_> = view.occupied().map(|(_, kind)| kind).collect();
    used.sort();
    used.dedup();
    for kind in used {
        if let Some(entry) = config.catalog.get(kind.0 as usize) {
            let glyph = (b'A' + (kind.0 % 26) as u8) as char;
            println!("  {} = {} ({} pts)", glyph, entry.name, entry.points);
        }
    }
    match view.available_match() {
        Some(hint) => println!("\nFirst available match: {} -> {} ({} turns)", hint.first, hint.second, hint.path.turns),
        None => println!("\nNo available match."),
    }
    Ok(())
}

fn cmd_tournament(
    config: &GameConfig,
    num_games: u32,
    db_path: &str,
    agent_type: &str,
    max_clicks: u32,
    seconds_per_click: f32,
) -> Result<(), String> {
    let kinds: Vec<AgentKind> = match agent_type {
        "mixed" => AgentKind::ALL.to_vec(),
        other => vec![other.parse()?],
    };
    println!("=== Tournament: {} games, agents={} ===\n", num_games, agent_type);

    let db = Database::new(db_path).map_err(|e| e.to_string())?;
    let seeds: Vec<u64> = (0..num_games as u64).map(|g| 42 + g * 1000).collect();

    for kind in kinds {
        let results = run_batch(kind, config, &seeds, max_clicks, seconds_per_click);

        let mut outcomes: HashMap<Outcome, u32> = HashMap::new();
        let mut errors = 0u32;
        let mut total_score = 0u64;
        for result in &results {
            match result {
                Ok(result) => {
                    let agent_id = db.register_agent(&result.agent_name).map_err(|e| e.to_string())?;
                    db.store_game(result, agent_id).map_err(|e| e.to_string())?;
                    *outcomes.entry(result.outcome).or_insert(0) += 1;
                    total_score += result.score as u64;
                }
                Err(e) => {
                    errors += 1;
                    eprintln!("{} game: ERROR -- {}", kind, e);
                }
            }
        }

        let played = results.len() as u32 - errors;
        println!("--- {} ({} games, {} errors) ---", kind, played, errors);
        for outcome in [Outcome::GameComplete, Outcome::TimeExpired, Outcome::Stuck, Outcome::ClickLimit] {
            let n = outcomes.get(&outcome).copied().unwrap_or(0);
            let pct = if played > 0 { n as f64 / played as f64 * 100.0 } else { 0.0 };
            println!("  {:14}: {:>4} ({:.1}%)", outcome.to_string(), n, pct);
        }
        let avg = if played > 0 { total_score as f64 / played as f64 } else { 0.0 };
        println!("  {:14}: {:.1}\n", "avg score", avg);
    }

    println!("Results saved to: {}", db_path);
    println!("Total games in DB: {}", db.game_count().map_err(|e| e.to_string())?);
    Ok(())
}

fn cmd_leaderboard(db_path: &str) -> Result<(), String> {
    let db = Database::new(db_path).map_err(|e| e.to_string())?;
    let board = db.leaderboard().map_err(|e| e.to_string())?;
    if board.is_empty() {
        println!("No agents found. Run some tournaments first.");
        return Ok(());
    }
    println!("=== Leaderboard ===\n");
    println!("{:<20} {:>8} {:>12} {:>10}", "Agent", "Games", "Completions", "Avg score");
    println!("{}", "-".repeat(53));
    for s in &board {
        println!("{:<20} {:>8} {:>12} {:>10.1}", s.name, s.games, s.completions, s.avg_score);
    }
    Ok(())
}
