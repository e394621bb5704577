//! Review command - compare each played move with an engine's choice
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_moves(), replay(), review_game(), report()
//! - Level 3: review_move()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use hex_core::{Game, GameOptions, GameState, MoveData, PlayerData, PlayerIndex};

use crate::engine::{Engine, EngineClient, EngineMove, ProcessClient};

/// Environment variable naming the engine binary
pub const ENGINE_ENV_VAR: &str = "HEX_ENGINE_BINARY";

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReviewArgs {
    /// Engine binary (defaults to $HEX_ENGINE_BINARY)
    #[arg(long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Extra argument passed to the engine (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG")]
    pub engine_args: Vec<String>,

    /// Board size
    #[arg(long, default_value = "13")]
    pub size: usize,

    /// Space separated moves, e.g. "k7 k6 i8"
    #[arg(long, conflicts_with = "moves_file")]
    pub moves: Option<String>,

    /// File containing the moves
    #[arg(long, value_name = "FILE")]
    pub moves_file: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Engine verdict on one played move
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReviewEntry {
    pub index: usize,
    pub player: PlayerIndex,
    pub played: MoveData,
    /// Engine evaluation of the played move, from the mover's side
    pub played_score: Option<f64>,
    pub best: EngineMove,
    pub best_score: Option<f64>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run review command
///
/// 1. Load and replay the moves (fail fast on illegal ones)
/// 2. Start the engine
/// 3. Review every move
/// 4. Report
pub fn run(args: ReviewArgs) -> Result<()> {
    let mut moves = load_moves(&args)?;
    let replayed = replay(args.size, &moves)?;
    moves.truncate(replayed.moves().len());

    let engine_path = resolve_engine(&args)?;
    let client = ProcessClient::spawn(&engine_path, &args.engine_args)
        .with_context(|| format!("Failed to start engine: {}", engine_path.display()))?;
    let mut engine = Engine::new(client);

    tracing::info!(
        "Reviewing {} moves on a {}x{} board with {}",
        moves.len(),
        args.size,
        args.size,
        engine_path.display()
    );

    let progress = ProgressBar::new(moves.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} moves reviewed",
    )?);

    let entries = review_game(&mut engine, args.size, &moves, &progress)?;
    progress.finish_and_clear();

    if let Err(e) = engine.quit() {
        tracing::debug!("Engine did not quit cleanly: {}", e);
    }

    report(&entries, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn resolve_engine(args: &ReviewArgs) -> Result<PathBuf> {
    if let Some(path) = &args.engine {
        return Ok(path.clone());
    }
    std::env::var_os(ENGINE_ENV_VAR)
        .map(PathBuf::from)
        .with_context(|| format!("No engine given: pass --engine or set {}", ENGINE_ENV_VAR))
}

fn load_moves(args: &ReviewArgs) -> Result<Vec<MoveData>> {
    let text = match (&args.moves, &args.moves_file) {
        (Some(moves), _) => moves.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read moves file: {}", path.display()))?,
        (None, None) => anyhow::bail!("No moves given: pass --moves or --moves-file"),
    };
    parse_moves(&text)
}

/// Whitespace separated coordinates
pub fn parse_moves(text: &str) -> Result<Vec<MoveData>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, coord)| {
            coord
                .parse::<MoveData>()
                .with_context(|| format!("Move {} is not a coordinate: {:?}", i + 1, coord))
        })
        .collect()
}

/// Play the moves through the rules engine, stopping at the end of the game
pub fn replay(size: usize, moves: &[MoveData]) -> Result<Game> {
    let mut game = Game::new(
        [PlayerData::new("first"), PlayerData::new("second")],
        GameOptions { size },
    )?;
    game.start()?;

    for (i, &mv) in moves.iter().enumerate() {
        if game.state() == GameState::Ended {
            tracing::warn!("Game ended after move {}; ignoring {} more", i, moves.len() - i);
            break;
        }
        let player = game.current_player();
        game.apply_move(player, mv)
            .with_context(|| format!("Move {} ({}) by {} is illegal", i + 1, mv, player))?;
    }

    Ok(game)
}

/// Ask the engine about every move of the game
pub fn review_game<C: EngineClient>(
    engine: &mut Engine<C>,
    size: usize,
    moves: &[MoveData],
    progress: &ProgressBar,
) -> Result<Vec<ReviewEntry>> {
    engine.set_board_size(size)?;

    let mut game = replay(size, &[])?;
    let mut entries = Vec::with_capacity(moves.len());

    for (index, &mv) in moves.iter().enumerate() {
        if game.state() == GameState::Ended {
            break;
        }
        let entry = review_move(engine, &mut game, index, mv)?;
        tracing::info!("{}", format_entry(&entry));
        entries.push(entry);
        progress.inc(1);
    }

    Ok(entries)
}

fn report(entries: &[ReviewEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    println!("=== AI REVIEW ===");
    for entry in entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Best move before the move is played, then the opponent's evaluation
/// right after it (flipped back to the mover's side)
fn review_move<C: EngineClient>(
    engine: &mut Engine<C>,
    game: &mut Game,
    index: usize,
    mv: MoveData,
) -> Result<ReviewEntry> {
    let player = game.current_player();

    let best = engine.suggest(player)?;
    engine.play(player, mv)?;
    game.apply_move(player, mv)?;

    // No position left to evaluate once the game is over
    let played_score = if game.state() == GameState::Ended {
        None
    } else {
        engine.suggest(player.opponent())?.score.map(|s| 1.0 - s)
    };

    Ok(ReviewEntry {
        index,
        player,
        played: mv,
        played_score,
        best: best.mv,
        best_score: best.score,
    })
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.2}", s),
        None => "-".to_string(),
    }
}

fn format_entry(entry: &ReviewEntry) -> String {
    format!(
        "{:>3}. {}: best {} (score {}), played {} (score {})",
        entry.index + 1,
        entry.player,
        entry.best,
        format_score(entry.best_score),
        entry.played,
        format_score(entry.played_score),
    )
}

// ============================================================================
// TESTS
// ============================================================================
