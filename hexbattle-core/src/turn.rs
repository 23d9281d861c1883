//! Turn rotation and victory detection

use crate::board::Board;
use crate::pieces::Player;
use serde::{Deserialize, Serialize};

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Ongoing,
    Player1Wins,
    Player2Wins,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Ongoing => None,
            GameResult::Player1Wins => Some(Player::One),
            GameResult::Player2Wins => Some(Player::Two),
        }
    }

    /// Winner id as reported to drivers: 0 while ongoing, else 1 or 2
    pub fn winner_id(self) -> u8 {
        self.winner().map_or(0, Player::id)
    }

    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }
}

impl Board {
    /// Clear the acted-sets, hand the turn to the other player and check for
    /// a wiped-out army.
    pub fn end_turn(&mut self) -> GameResult {
        self.moved_this_turn.clear();
        self.attacked_this_turn.clear();
        self.active_player = self.active_player.opponent();
        self.turn += 1;

        let result = self.standing();
        match result.winner() {
            Some(winner) => tracing::info!("Player {} has won on turn {}", winner.id(), self.turn),
            None => tracing::debug!(
                "Turn {}: player {} to act",
                self.turn,
                self.active_player.id()
            ),
        }
        result
    }

    /// Result implied by the current piece counts
    pub fn standing(&self) -> GameResult {
        if self.piece_count(Player::One) == 0 {
            GameResult::Player2Wins
        } else if self.piece_count(Player::Two) == 0 {
            GameResult::Player1Wins
        } else {
            GameResult::Ongoing
        }
    }
}
