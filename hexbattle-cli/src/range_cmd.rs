//! Range command - inspect what one piece can reach

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexbattle_core::{attack_range, movement_range, Board, Hex};

use crate::config_cmd::load_board;

#[derive(Args)]
pub struct RangeArgs {
    /// Board config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Axial q of the piece
    #[arg(long, allow_hyphen_values = true)]
    pub q: i32,

    /// Axial r of the piece
    #[arg(long, allow_hyphen_values = true)]
    pub r: i32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RangeArgs) -> Result<()> {
    let (_, board) = load_board(&args.config)?;
    let origin = Hex::new(args.q, args.r);

    if args.json {
        print_json(&board, origin)
    } else {
        print_text(&board, origin)
    }
}

fn print_text(board: &Board, origin: Hex) -> Result<()> {
    let piece = board
        .piece(origin)
        .with_context(|| format!("No piece at {}", origin))?;
    let moves = movement_range(board, origin).with_context(|| format!("No piece at {}", origin))?;
    let attacks = attack_range(board, origin).with_context(|| format!("No piece at {}", origin))?;

    println!(
        "Player {} type {} at {} facing {} ({}/{} hp)",
        piece.owner.id(),
        piece.piece_type,
        origin,
        piece.facing,
        piece.health,
        piece.max_health()
    );

    println!("\nMovement (distance {}):", piece.movement_distance());
    let enemies = moves.combat_targets(board);
    for (hex, _) in moves.destinations() {
        let arrivals: Vec<String> = moves
            .arrivals(hex)
            .iter()
            .map(|(facing, cost)| format!("{}={}", facing, cost))
            .collect();
        let marker = if enemies.contains(&hex) { "  [combat]" } else { "" };
        println!("  {:<10} {}{}", hex.to_string(), arrivals.join(" "), marker);
    }

    println!("\nAttack (distance {}):", piece.attack_distance());
    for (hex, cost) in attacks.targets() {
        let marker = match board.piece(hex) {
            Some(p) if p.owner != piece.owner => "  [enemy]",
            _ => "",
        };
        println!("  {:<10} {}{}", hex.to_string(), cost, marker);
    }

    Ok(())
}

fn print_json(board: &Board, origin: Hex) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonMove {
        at: Hex,
        facing: hexbattle_core::Direction,
        cost: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonAttack {
        at: Hex,
        cost: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        origin: Hex,
        movement: Vec<JsonMove>,
        combat: Vec<Hex>,
        attack: Vec<JsonAttack>,
    }

    let moves = movement_range(board, origin).with_context(|| format!("No piece at {}", origin))?;
    let attacks = attack_range(board, origin).with_context(|| format!("No piece at {}", origin))?;

    let output = JsonOutput {
        origin,
        movement: moves
            .entries()
            .into_iter()
            .map(|(at, facing, cost)| JsonMove { at, facing, cost })
            .collect(),
        combat: moves.combat_targets(board),
        attack: attacks
            .targets()
            .into_iter()
            .map(|(at, cost)| JsonAttack { at, cost })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
