//! Hex Battle Core - Board engine for two-player hex battles
//!
//! This crate provides the game logic:
//! - Hex geometry (axial/cube coordinates, six facings, turning cost)
//! - Piece templates and live pieces
//! - Board store with per-turn bookkeeping
//! - Movement and attack range search with direction-change cost
//! - Move/attack execution with randomized combat
//! - Turn rotation and victory detection

pub mod hex;
pub mod pieces;
pub mod board;
pub mod range;
pub mod combat;
pub mod actions;
pub mod turn;
pub mod game;
pub mod config;
pub mod export;

// Re-exports for convenient access
pub use hex::{direction_turn_cost, Cube, Direction, Hex};
pub use pieces::{Piece, PieceTemplate, PieceTypeId, Player};
pub use board::{Board, BoardError, Placement, Tile, TileContent};
pub use range::{attack_range, movement_range, AttackRange, MovementRange};
pub use combat::{Fixed, Gaussian, Sequence, Variance};
pub use actions::{ActionError, MoveOutcome, Strike};
pub use turn::GameResult;
pub use game::{Action, Outcome, Session};
pub use config::{BoardConfig, ConfigError, PiecePlacement};
pub use export::{PieceRecord, TurnLog};
