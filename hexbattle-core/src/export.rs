//! Read-only export of board state, and the plain-text game log
//!
//! Log layout:
//!
//! ```text
//! <health> <movement> <attack distance> <power>    one line per template
//! -
//! <q> <r> <q> <r> ...                              every board tile
//! -
//! <owner> <type> <q> <r> <facing> <health>         one line per piece, player 1 first
//! -                                                after each recorded turn
//! ```

use crate::board::Board;
use crate::hex::{Direction, Hex};
use crate::pieces::{PieceTypeId, Player};
use serde::Serialize;
use std::io::{self, Write};

/// One occupied tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PieceRecord {
    pub owner: Player,
    pub piece_type: PieceTypeId,
    pub at: Hex,
    pub facing: Direction,
    pub health: u32,
}

impl Board {
    /// Every occupied tile, in layout order
    pub fn occupied(&self) -> Vec<PieceRecord> {
        self.pieces()
            .map(|(at, piece)| PieceRecord {
                owner: piece.owner,
                piece_type: piece.piece_type,
                at,
                facing: piece.facing,
                health: piece.health,
            })
            .collect()
    }
}

/// Writer for the game log
pub struct TurnLog<W: Write> {
    out: W,
    turns: usize,
}

impl<W: Write> TurnLog<W> {
    /// Start a log with the board's templates and layout
    pub fn new(mut out: W, board: &Board) -> io::Result<Self> {
        for template in board.templates().iter().skip(1) {
            writeln!(
                out,
                "{} {} {} {}",
                template.max_health,
                template.movement_distance,
                template.attack_distance,
                template.attack_power
            )?;
        }
        writeln!(out, "-")?;

        let coords: Vec<String> = board
            .layout()
            .iter()
            .map(|hex| format!("{} {}", hex.q, hex.r))
            .collect();
        writeln!(out, "{}", coords.join(" "))?;
        writeln!(out, "-")?;

        Ok(Self { out, turns: 0 })
    }

    /// Append a snapshot of every piece
    pub fn record_turn(&mut self, board: &Board) -> io::Result<()> {
        let records = board.occupied();
        for owner in [Player::One, Player::Two] {
            for rec in records.iter().filter(|r| r.owner == owner) {
                writeln!(
                    self.out,
                    "{} {} {} {} {} {}",
                    rec.owner.id(),
                    rec.piece_type,
                    rec.at.q,
                    rec.at.r,
                    rec.facing,
                    rec.health
                )?;
            }
        }
        writeln!(self.out, "-")?;
        self.out.flush()?;
        self.turns += 1;
        Ok(())
    }

    /// Snapshots written so far
    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
