//! BoardConfig - the configuration snapshot a session is started from

use crate::board::{Board, Placement};
use crate::hex::{Direction, Hex};
use crate::pieces::{PieceTemplate, PieceTypeId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Load-time configuration failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tile {0} appears more than once in the board layout")]
    DuplicateTile(Hex),

    #[error("placement at {hex} uses unknown piece type {piece_type}")]
    UnknownTemplate { piece_type: PieceTypeId, hex: Hex },

    #[error("piece type {0} has zero health")]
    EmptyTemplate(PieceTypeId),

    #[error("player {player} piece at {hex} is outside the board")]
    OutsideBoard { player: u8, hex: Hex },

    #[error("more than one piece placed at {0}")]
    OverlappingPlacement(Hex),
}

/// One initial piece placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecePlacement {
    /// Template index, 1-based
    pub piece: PieceTypeId,
    pub at: Hex,
    pub facing: Direction,
}

impl PiecePlacement {
    pub fn new(piece: PieceTypeId, at: Hex, facing: Direction) -> Self {
        Self { piece, at, facing }
    }

    fn as_tuple(&self) -> Placement {
        (self.piece, self.at, self.facing)
    }
}

/// Templates, layout and starting armies for one game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Piece templates; the first entry is piece type 1
    pub templates: Vec<PieceTemplate>,
    /// Playable coordinates
    pub board: Vec<Hex>,
    pub player1: Vec<PiecePlacement>,
    pub player2: Vec<PiecePlacement>,
}

impl BoardConfig {
    /// Build and validate the board this config describes
    pub fn to_board(&self) -> Result<Board, ConfigError> {
        let player1: Vec<Placement> = self.player1.iter().map(PiecePlacement::as_tuple).collect();
        let player2: Vec<Placement> = self.player2.iter().map(PiecePlacement::as_tuple).collect();
        Board::new(&self.templates, &self.board, &player1, &player2)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Hexagonal board of `radius` with three piece classes and mirrored armies.
    ///
    /// Player 1 lines up one row in from the southern edge facing NW, player 2
    /// mirrors it through the center facing SE. Radius is raised to 2 if smaller.
    pub fn sample(radius: u32) -> Self {
        let radius = radius.max(2);
        let row = radius as i32 - 1;

        let templates = vec![
            PieceTemplate::new(10, 2, 2, 5), // infantry
            PieceTemplate::new(16, 1, 1, 4), // defense
            PieceTemplate::new(6, 4, 1, 3),  // speed
        ];

        let army = [(2, -1), (1, 0), (3, 1)];
        let player1 = army
            .iter()
            .map(|&(piece, q)| PiecePlacement::new(piece, Hex::new(q, row), Direction::NW))
            .collect();
        let player2 = army
            .iter()
            .map(|&(piece, q)| PiecePlacement::new(piece, Hex::new(-q, -row), Direction::SE))
            .collect();

        Self {
            templates,
            board: Hex::new(0, 0).disk(radius),
            player1,
            player2,
        }
    }
}
