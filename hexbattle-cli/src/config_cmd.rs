//! Config commands - validate and generate board configs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexbattle_core::{Board, BoardConfig, Player};

#[derive(Args)]
pub struct CheckArgs {
    /// Board config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct InitArgs {
    /// Radius of the hexagonal board
    #[arg(long, default_value = "4")]
    pub radius: u32,

    /// Where to write the config
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Load a config and build its board, failing on any validation error
pub fn load_board(path: &Path) -> Result<(BoardConfig, Board)> {
    let config = BoardConfig::load(path)
        .with_context(|| format!("Failed to load board config: {}", path.display()))?;
    let board = config
        .to_board()
        .with_context(|| format!("Invalid board config: {}", path.display()))?;
    Ok((config, board))
}

pub fn check(args: CheckArgs) -> Result<()> {
    let (_, board) = load_board(&args.config)?;
    tracing::info!("Config {} is valid", args.config.display());
    print_summary(&board);
    Ok(())
}

pub fn init(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let config = BoardConfig::sample(args.radius);
    config
        .save(&args.output)
        .with_context(|| format!("Failed to write config: {}", args.output.display()))?;

    tracing::info!(
        "Wrote sample config ({} tiles) to {}",
        config.board.len(),
        args.output.display()
    );
    Ok(())
}

fn print_summary(board: &Board) {
    println!("Tiles:     {}", board.len());
    println!("Templates:");
    for (i, t) in board.templates().iter().enumerate().skip(1) {
        println!(
            "  {}: health {}, movement {}, attack distance {}, power {}",
            i, t.max_health, t.movement_distance, t.attack_distance, t.attack_power
        );
    }
    for player in [Player::One, Player::Two] {
        println!("Player {}: {} pieces", player.id(), board.piece_count(player));
        for rec in board.occupied().iter().filter(|r| r.owner == player) {
            println!(
                "  type {} at {} facing {} ({} hp)",
                rec.piece_type, rec.at, rec.facing, rec.health
            );
        }
    }
}
