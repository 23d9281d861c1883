//! Play command - replay a scripted list of actions
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_script(), play_script(), report_results()
//! - Level 3: apply_step()
//! - Level 4: formatting utilities

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexbattle_core::{
    Action, GameResult, Gaussian, Outcome, PieceRecord, Session, TurnLog, Variance,
};

use crate::config_cmd::load_board;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// JSON array of actions to apply in order
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    /// Seed for combat variance (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the turn log here
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One scripted action and what came of it
#[derive(Clone, Debug, serde::Serialize)]
struct StepRecord {
    step: usize,
    player: u8,
    action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejected: Option<String>,
}

/// Full replay report
#[derive(Clone, Debug, serde::Serialize)]
struct PlayReport {
    steps: Vec<StepRecord>,
    result: GameResult,
    winner: u8,
    turns: u32,
    pieces: Vec<PieceRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load config and script
/// 2. Replay the script (stopping at victory)
/// 3. Report results
pub fn run(args: PlayArgs) -> Result<()> {
    let (_, board) = load_board(&args.config)?;
    let actions = load_script(&args.script)?;

    tracing::info!(
        "Replaying {} actions on {} ({} tiles)",
        actions.len(),
        args.config.display(),
        board.len()
    );

    let session = Session::new(board, Gaussian::new(create_rng(args.seed)));

    let report = match &args.log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log: {}", path.display()))?;
            let mut log = TurnLog::new(BufWriter::new(file), session.board())?;
            let report = play_script(session, &actions, Some(&mut log))?;
            tracing::info!("Wrote {} turn snapshots to {}", log.turns(), path.display());
            report
        }
        None => play_script::<_, std::io::Sink>(session, &actions, None)?,
    };

    report_results(&report, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load a JSON array of actions
fn load_script(path: &Path) -> Result<Vec<Action>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    let actions = serde_json::from_str(&content)
        .with_context(|| format!("Malformed script: {}", path.display()))?;
    Ok(actions)
}

/// Apply every action in order, snapshotting the log at each turn end
fn play_script<V: Variance, W: Write>(
    mut session: Session<V>,
    actions: &[Action],
    mut log: Option<&mut TurnLog<W>>,
) -> Result<PlayReport> {
    if let Some(log) = log.as_deref_mut() {
        log.record_turn(session.board())?;
    }

    let mut steps = Vec::with_capacity(actions.len());
    for (i, &action) in actions.iter().enumerate() {
        let record = apply_step(&mut session, i + 1, action);

        if matches!(record.outcome, Some(Outcome::TurnEnded(_))) {
            if let Some(log) = log.as_deref_mut() {
                log.record_turn(session.board())?;
            }
        }
        steps.push(record);

        if session.result().is_over() {
            if i + 1 < actions.len() {
                tracing::info!("Game over, skipping {} remaining actions", actions.len() - i - 1);
            }
            break;
        }
    }

    let board = session.board();
    Ok(PlayReport {
        steps,
        result: session.result(),
        winner: session.result().winner_id(),
        turns: board.turn(),
        pieces: board.occupied(),
    })
}

/// Report replay results
fn report_results(report: &PlayReport, args: &PlayArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_text_results(report);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn apply_step<V: Variance>(session: &mut Session<V>, step: usize, action: Action) -> StepRecord {
    let player = session.board().active_player().id();
    let (outcome, rejected) = match session.apply(action) {
        Ok(outcome) => (Some(outcome), None),
        Err(err) => {
            tracing::warn!("Step {}: {}", step, err);
            (None, Some(err.to_string()))
        }
    };

    StepRecord {
        step,
        player,
        action,
        outcome,
        rejected,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn describe_outcome(outcome: &Outcome) -> String {
    use hexbattle_core::MoveOutcome;

    match outcome {
        Outcome::Moved(MoveOutcome::Relocated { from, to }) => format!("moved {} -> {}", from, to),
        Outcome::Moved(MoveOutcome::Repelled(s)) => {
            format!("hit {} for {}, defender holds ({} hp)", s.target, s.damage, s.remaining_health)
        }
        Outcome::Moved(MoveOutcome::Overran { from, to, strike }) => {
            format!("destroyed {} ({} damage), moved {} -> {}", strike.target, strike.damage, from, to)
        }
        Outcome::Rotated { at, facing } => format!("turned {} to face {}", at, facing),
        Outcome::Attacked(s) if s.killed() => format!("destroyed {} ({} damage)", s.target, s.damage),
        Outcome::Attacked(s) => format!("hit {} for {} ({} hp left)", s.target, s.damage, s.remaining_health),
        Outcome::TurnEnded(GameResult::Ongoing) => "turn ended".to_string(),
        Outcome::TurnEnded(result) => format!("turn ended, player {} wins", result.winner_id()),
    }
}

fn print_text_results(report: &PlayReport) {
    println!("=== Replay ===");
    for step in &report.steps {
        let detail = match (&step.outcome, &step.rejected) {
            (Some(outcome), _) => describe_outcome(outcome),
            (None, Some(reason)) => format!("rejected: {}", reason),
            (None, None) => String::new(),
        };
        println!("{:>4}. P{}  {}", step.step, step.player, detail);
    }

    println!("\n=== Board ===");
    for rec in &report.pieces {
        println!(
            "  P{} type {} at {} facing {} ({} hp)",
            rec.owner.id(),
            rec.piece_type,
            rec.at,
            rec.facing,
            rec.health
        );
    }

    println!();
    match report.result.winner() {
        Some(player) => println!("Player {} has won! (turn {})", player.id(), report.turns),
        None => println!("No winner yet (turn {})", report.turns),
    }
}

// ============================================================================
// TESTS
// ============================================================================
