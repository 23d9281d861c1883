//! Game session: the board plus the variance source combat draws from

use crate::actions::{ActionError, MoveOutcome, Strike};
use crate::board::Board;
use crate::combat::{Gaussian, Variance};
use crate::config::{BoardConfig, ConfigError};
use crate::hex::{Direction, Hex};
use crate::range::{self, AttackRange, MovementRange};
use crate::turn::GameResult;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A player request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move { from: Hex, to: Hex, facing: Direction },
    Rotate { at: Hex, facing: Direction },
    Attack { from: Hex, target: Hex },
    EndTurn,
}

/// What an applied action did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Moved(MoveOutcome),
    Rotated { at: Hex, facing: Direction },
    Attacked(Strike),
    TurnEnded(GameResult),
}

/// One game, from setup to victory.
///
/// All mutation goes through `&mut self`; embedders sharing a session across
/// threads must lock the whole thing.
#[derive(Clone, Debug)]
pub struct Session<V = Gaussian<ChaCha8Rng>> {
    pub(crate) board: Board,
    pub(crate) variance: V,
    pub(crate) result: GameResult,
}

impl Session {
    /// Session with Gaussian variance from a seeded ChaCha8 stream
    pub fn seeded(config: &BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_config(config, Gaussian::new(ChaCha8Rng::seed_from_u64(seed)))
    }
}

impl<V: Variance> Session<V> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(board: Board, variance: V) -> Self {
        Self {
            board,
            variance,
            result: GameResult::Ongoing,
        }
    }

    pub fn from_config(config: &BoardConfig, variance: V) -> Result<Self, ConfigError> {
        let board = config.to_board()?;
        tracing::info!(
            "Session started: {} tiles, {} vs {} pieces",
            board.len(),
            board.piece_count(crate::Player::One),
            board.piece_count(crate::Player::Two)
        );
        Ok(Self::new(board, variance))
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Result as of the last turn end
    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn variance_mut(&mut self) -> &mut V {
        &mut self.variance
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn movement_range(&self, origin: Hex) -> Option<MovementRange> {
        range::movement_range(&self.board, origin)
    }

    pub fn attack_range(&self, origin: Hex) -> Option<AttackRange> {
        range::attack_range(&self.board, origin)
    }

    // ========================================================================
    // APPLY ACTION
    // ========================================================================

    /// Validate and apply one action. Rejected actions leave the session untouched.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, ActionError> {
        match action {
            Action::Move { from, to, facing } => self.move_piece(from, to, facing).map(Outcome::Moved),
            Action::Rotate { at, facing } => self
                .rotate_piece(at, facing)
                .map(|()| Outcome::Rotated { at, facing }),
            Action::Attack { from, target } => self.attack_piece(from, target).map(Outcome::Attacked),
            Action::EndTurn => Ok(Outcome::TurnEnded(self.end_turn())),
        }
    }

    /// Finish the active player's turn (see [`Board::end_turn`])
    pub fn end_turn(&mut self) -> GameResult {
        self.result = self.board.end_turn();
        self.result
    }
}
