//! Board store: the playable layout, its occupants and per-turn bookkeeping

use crate::config::ConfigError;
use crate::hex::{Direction, Hex};
use crate::pieces::{Piece, PieceTemplate, PieceTypeId, Player};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Initial placement: (template index, position, facing)
pub type Placement = (PieceTypeId, Hex, Direction);

/// What sits on a tile
#[derive(Clone, Debug, PartialEq)]
pub enum TileContent {
    Empty,
    Occupied(Piece),
}

impl TileContent {
    pub fn piece(&self) -> Option<&Piece> {
        match self {
            TileContent::Empty => None,
            TileContent::Occupied(piece) => Some(piece),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TileContent::Empty)
    }

    pub fn owner(&self) -> Option<Player> {
        self.piece().map(|p| p.owner)
    }
}

/// A coordinate of the layout together with its content
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile<'a> {
    pub hex: Hex,
    pub content: &'a TileContent,
}

impl<'a> Tile<'a> {
    pub fn piece(&self) -> Option<&'a Piece> {
        self.content.piece()
    }
}

/// Errors from direct board mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("tile {0} is not part of the board")]
    UnknownTile(Hex),
}

/// Full board state for one game session
#[derive(Clone, Debug)]
pub struct Board {
    /// Layout in load order (drives iteration order)
    layout: Vec<Hex>,

    /// hex -> content, one entry per layout coordinate
    tiles: FxHashMap<Hex, TileContent>,

    /// Templates; index 0 is the empty template
    templates: Vec<Arc<PieceTemplate>>,

    pub(crate) active_player: Player,
    pub(crate) moved_this_turn: FxHashSet<Hex>,
    pub(crate) attacked_this_turn: FxHashSet<Hex>,

    player1_pieces: usize,
    player2_pieces: usize,

    /// Turn number, starting at 1
    pub(crate) turn: u32,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Build a board from templates (1-indexed by placements), a layout and
    /// both players' initial placements.
    pub fn new(
        templates: &[PieceTemplate],
        layout: &[Hex],
        player1: &[Placement],
        player2: &[Placement],
    ) -> Result<Self, ConfigError> {
        let mut all_templates = Vec::with_capacity(templates.len() + 1);
        all_templates.push(Arc::new(PieceTemplate::EMPTY));
        for (i, template) in templates.iter().enumerate() {
            if template.max_health == 0 {
                return Err(ConfigError::EmptyTemplate(i + 1));
            }
            all_templates.push(Arc::new(*template));
        }

        let mut tiles = FxHashMap::default();
        tiles.reserve(layout.len());
        for &hex in layout {
            if tiles.insert(hex, TileContent::Empty).is_some() {
                return Err(ConfigError::DuplicateTile(hex));
            }
        }

        let mut board = Self {
            layout: layout.to_vec(),
            tiles,
            templates: all_templates,
            active_player: Player::One,
            moved_this_turn: FxHashSet::default(),
            attacked_this_turn: FxHashSet::default(),
            player1_pieces: 0,
            player2_pieces: 0,
            turn: 1,
        };

        for (owner, placements) in [(Player::One, player1), (Player::Two, player2)] {
            for &(piece_type, hex, facing) in placements {
                board.place(owner, piece_type, hex, facing)?;
            }
        }

        Ok(board)
    }

    fn place(
        &mut self,
        owner: Player,
        piece_type: PieceTypeId,
        hex: Hex,
        facing: Direction,
    ) -> Result<(), ConfigError> {
        let template = match self.templates.get(piece_type) {
            Some(t) if piece_type != 0 => Arc::clone(t),
            _ => return Err(ConfigError::UnknownTemplate { piece_type, hex }),
        };

        let slot = self
            .tiles
            .get_mut(&hex)
            .ok_or(ConfigError::OutsideBoard { player: owner.id(), hex })?;
        if !slot.is_empty() {
            return Err(ConfigError::OverlappingPlacement(hex));
        }

        *slot = TileContent::Occupied(Piece::new(piece_type, owner, facing, template));
        *self.count_mut(owner) += 1;
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Tile at `hex`, or None if the coordinate is not part of the layout
    pub fn get(&self, hex: Hex) -> Option<Tile<'_>> {
        self.tiles.get(&hex).map(|content| Tile { hex, content })
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    /// Piece at `hex` (None for empty or absent tiles)
    pub fn piece(&self, hex: Hex) -> Option<&Piece> {
        self.tiles.get(&hex).and_then(TileContent::piece)
    }

    pub(crate) fn piece_mut(&mut self, hex: Hex) -> Option<&mut Piece> {
        match self.tiles.get_mut(&hex) {
            Some(TileContent::Occupied(piece)) => Some(piece),
            _ => None,
        }
    }

    /// All tiles in layout order
    pub fn tiles(&self) -> impl Iterator<Item = Tile<'_>> + '_ {
        self.layout.iter().map(move |&hex| Tile {
            hex,
            content: &self.tiles[&hex],
        })
    }

    /// Occupied tiles in layout order
    pub fn pieces(&self) -> impl Iterator<Item = (Hex, &Piece)> + '_ {
        self.tiles().filter_map(|tile| tile.piece().map(|p| (tile.hex, p)))
    }

    pub fn layout(&self) -> &[Hex] {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Templates, index 0 being the empty template
    pub fn templates(&self) -> &[Arc<PieceTemplate>] {
        &self.templates
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn moved_this_turn(&self) -> &FxHashSet<Hex> {
        &self.moved_this_turn
    }

    pub fn attacked_this_turn(&self) -> &FxHashSet<Hex> {
        &self.attacked_this_turn
    }

    pub fn has_moved(&self, hex: Hex) -> bool {
        self.moved_this_turn.contains(&hex)
    }

    pub fn has_attacked(&self, hex: Hex) -> bool {
        self.attacked_this_turn.contains(&hex)
    }

    /// Live pieces owned by `player`
    pub fn piece_count(&self, player: Player) -> usize {
        match player {
            Player::One => self.player1_pieces,
            Player::Two => self.player2_pieces,
        }
    }

    fn count_mut(&mut self, player: Player) -> &mut usize {
        match player {
            Player::One => &mut self.player1_pieces,
            Player::Two => &mut self.player2_pieces,
        }
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Put `piece` on `hex`, replacing whatever was there. Piece counts follow
    /// both the replaced occupant and the new piece.
    pub fn set_piece(&mut self, hex: Hex, piece: Piece) -> Result<(), BoardError> {
        self.replace(hex, TileContent::Occupied(piece)).map(|_| ())
    }

    /// Empty the tile at `hex`
    pub fn clear(&mut self, hex: Hex) -> Result<(), BoardError> {
        self.replace(hex, TileContent::Empty).map(|_| ())
    }

    /// Lift the piece off `hex`, leaving the tile empty
    pub(crate) fn take(&mut self, hex: Hex) -> Option<Piece> {
        match self.replace(hex, TileContent::Empty).ok()? {
            TileContent::Occupied(piece) => Some(piece),
            TileContent::Empty => None,
        }
    }

    /// Remove a killed piece
    pub(crate) fn remove_dead(&mut self, hex: Hex) {
        if let Some(piece) = self.take(hex) {
            debug_assert!(piece.is_dead());
        }
    }

    /// Swap the content of `hex`, keeping the per-player counts in step
    fn replace(&mut self, hex: Hex, content: TileContent) -> Result<TileContent, BoardError> {
        let added = content.owner();
        let slot = self.tiles.get_mut(&hex).ok_or(BoardError::UnknownTile(hex))?;
        let old = std::mem::replace(slot, content);

        if let Some(owner) = old.owner() {
            let count = self.count_mut(owner);
            debug_assert!(*count > 0, "piece count underflow for {:?}", owner);
            *count = count.saturating_sub(1);
        }
        if let Some(owner) = added {
            *self.count_mut(owner) += 1;
        }
        Ok(old)
    }
}
