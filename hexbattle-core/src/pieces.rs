//! Piece templates, live pieces and players

use crate::hex::Direction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Piece type identifier (index into the board's templates, 0 = none)
pub type PieceTypeId = usize;

/// Player identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Numeric id as used by configs and logs (1 or 2)
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

/// Static stats for a class of piece
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceTemplate {
    pub max_health: u32,
    pub movement_distance: u32,
    pub attack_distance: u32,
    pub attack_power: u32,
}

impl PieceTemplate {
    /// Placeholder template of an unoccupied tile
    pub const EMPTY: PieceTemplate = PieceTemplate::new(0, 0, 0, 0);

    pub const fn new(
        max_health: u32,
        movement_distance: u32,
        attack_distance: u32,
        attack_power: u32,
    ) -> Self {
        Self {
            max_health,
            movement_distance,
            attack_distance,
            attack_power,
        }
    }

    /// All-zero stats denote "no piece"
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

/// A piece on the board
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub piece_type: PieceTypeId,
    pub owner: Player,
    pub health: u32,
    pub facing: Direction,
    template: Arc<PieceTemplate>,
}

impl Piece {
    /// New piece at full health
    pub fn new(
        piece_type: PieceTypeId,
        owner: Player,
        facing: Direction,
        template: Arc<PieceTemplate>,
    ) -> Self {
        Self {
            piece_type,
            owner,
            health: template.max_health,
            facing,
            template,
        }
    }

    pub fn template(&self) -> &PieceTemplate {
        &self.template
    }

    pub fn max_health(&self) -> u32 {
        self.template.max_health
    }

    pub fn movement_distance(&self) -> u32 {
        self.template.movement_distance
    }

    pub fn attack_distance(&self) -> u32 {
        self.template.attack_distance
    }

    pub fn attack_power(&self) -> u32 {
        self.template.attack_power
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Subtract `damage`, clamping at zero. Returns true if the piece died.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.is_dead()
    }
}
