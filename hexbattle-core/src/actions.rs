//! Move, rotate and attack: validation, combat and per-turn bookkeeping
//!
//! Every action validates completely before touching state, so a rejected
//! request leaves the session exactly as it was.

use crate::board::Board;
use crate::combat::{self, Variance};
use crate::game::Session;
use crate::hex::{Direction, Hex};
use crate::pieces::{Piece, Player};
use crate::range::{attack_range_of, movement_range_of};
use serde::Serialize;

/// Why an action was refused. Never fatal; the session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("source and target are the same tile {0}")]
    SameTile(Hex),

    #[error("tile {0} is not part of the board")]
    UnknownTile(Hex),

    #[error("no piece at {0}")]
    NoPiece(Hex),

    #[error("piece at {at} belongs to player {}", owner.id())]
    NotYourPiece { at: Hex, owner: Player },

    #[error("piece at {0} has already moved this turn")]
    AlreadyMoved(Hex),

    #[error("piece at {0} has already attacked this turn")]
    AlreadyAttacked(Hex),

    #[error("{0} is out of range")]
    OutOfRange(Hex),

    #[error("piece at {at} cannot turn to face {facing}")]
    CannotTurn { at: Hex, facing: Direction },

    #[error("{0} is occupied by a friendly piece")]
    BlockedByAlly(Hex),

    #[error("no enemy piece at {0}")]
    NoTarget(Hex),
}

/// Damage dealt to one defender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Strike {
    pub target: Hex,
    pub damage: u32,
    pub remaining_health: u32,
}

impl Strike {
    pub fn killed(&self) -> bool {
        self.remaining_health == 0
    }
}

/// Result of a successful move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Moved onto an empty tile
    Relocated { from: Hex, to: Hex },
    /// Attacked the occupant, which survived; the mover stays put
    Repelled(Strike),
    /// Killed the occupant and took its tile
    Overran { from: Hex, to: Hex, strike: Strike },
}

/// The active player's piece at `hex`
fn actor(board: &Board, hex: Hex) -> Result<&Piece, ActionError> {
    let tile = board.get(hex).ok_or(ActionError::UnknownTile(hex))?;
    let piece = tile.piece().ok_or(ActionError::NoPiece(hex))?;
    if piece.owner != board.active_player() {
        return Err(ActionError::NotYourPiece { at: hex, owner: piece.owner });
    }
    Ok(piece)
}

fn reject<T>(err: ActionError) -> Result<T, ActionError> {
    tracing::debug!("Action rejected: {}", err);
    Err(err)
}

impl<V: Variance> Session<V> {
    /// Move the piece at `source` to `destination`, facing `new_facing` on arrival.
    ///
    /// An enemy on `destination` is attacked with the path cost as range
    /// falloff; the mover only advances if the defender dies.
    pub fn move_piece(
        &mut self,
        source: Hex,
        destination: Hex,
        new_facing: Direction,
    ) -> Result<MoveOutcome, ActionError> {
        if source == destination {
            return reject(ActionError::SameTile(source));
        }
        if !self.board.contains(destination) {
            return reject(ActionError::UnknownTile(destination));
        }

        let piece = match actor(&self.board, source) {
            Ok(p) => p,
            Err(e) => return reject(e),
        };
        if self.board.has_moved(source) {
            return reject(ActionError::AlreadyMoved(source));
        }

        let defender = self.board.piece(destination).map(|p| p.owner);
        if defender == Some(piece.owner) {
            return reject(ActionError::BlockedByAlly(destination));
        }

        let range = movement_range_of(&self.board, source, piece);
        let Some(cost) = range.cost_to(destination) else {
            return reject(ActionError::OutOfRange(destination));
        };
        let attack_power = piece.attack_power();

        if defender.is_none() {
            self.relocate(source, destination, new_facing);
            tracing::debug!("Piece moved {} -> {} facing {}", source, destination, new_facing);
            return Ok(MoveOutcome::Relocated { from: source, to: destination });
        }

        let strike = self.strike(destination, attack_power, cost);
        if !strike.killed() {
            self.board.moved_this_turn.insert(source);
            return Ok(MoveOutcome::Repelled(strike));
        }

        self.relocate(source, destination, new_facing);
        Ok(MoveOutcome::Overran { from: source, to: destination, strike })
    }

    /// Turn the piece at `at` in place.
    ///
    /// The turn costs `direction_turn_cost(facing, new_facing)` out of the
    /// piece's movement budget. Counts as the piece's move for the turn.
    pub fn rotate_piece(&mut self, at: Hex, new_facing: Direction) -> Result<(), ActionError> {
        let piece = match actor(&self.board, at) {
            Ok(p) => p,
            Err(e) => return reject(e),
        };
        if self.board.has_moved(at) {
            return reject(ActionError::AlreadyMoved(at));
        }
        if piece.facing == new_facing {
            return reject(ActionError::CannotTurn { at, facing: new_facing });
        }

        if piece.facing.turn_cost(new_facing) > piece.movement_distance() {
            return reject(ActionError::CannotTurn { at, facing: new_facing });
        }

        if let Some(piece) = self.board.piece_mut(at) {
            piece.facing = new_facing;
        }
        self.board.moved_this_turn.insert(at);
        tracing::debug!("Piece at {} turned to face {}", at, new_facing);
        Ok(())
    }

    /// Attack the enemy at `target` from `source` without moving
    pub fn attack_piece(&mut self, source: Hex, target: Hex) -> Result<Strike, ActionError> {
        if source == target {
            return reject(ActionError::SameTile(source));
        }
        if !self.board.contains(target) {
            return reject(ActionError::UnknownTile(target));
        }

        let piece = match actor(&self.board, source) {
            Ok(p) => p,
            Err(e) => return reject(e),
        };
        if self.board.has_attacked(source) {
            return reject(ActionError::AlreadyAttacked(source));
        }
        match self.board.piece(target) {
            Some(defender) if defender.owner != piece.owner => {}
            _ => return reject(ActionError::NoTarget(target)),
        }

        let range = attack_range_of(&self.board, source, piece);
        let Some(cost) = range.cost_to(target) else {
            return reject(ActionError::OutOfRange(target));
        };
        let attack_power = piece.attack_power();

        let strike = self.strike(target, attack_power, cost);
        self.board.attacked_this_turn.insert(source);
        Ok(strike)
    }

    // ========================================================================
    // HELPERS (state already validated)
    // ========================================================================

    /// Roll damage against the piece at `target`, removing it if it dies
    fn strike(&mut self, target: Hex, attack_power: u32, cost: u32) -> Strike {
        let damage = combat::damage(attack_power, cost, self.variance.factor());

        let mut remaining_health = 0;
        let mut owner = None;
        if let Some(defender) = self.board.piece_mut(target) {
            defender.take_damage(damage);
            remaining_health = defender.health;
            owner = Some(defender.owner);
        }

        if remaining_health == 0 {
            self.board.remove_dead(target);
            if let Some(owner) = owner {
                tracing::info!(
                    "Player {} piece at {} destroyed ({} damage, {} left)",
                    owner.id(),
                    target,
                    damage,
                    self.board.piece_count(owner)
                );
            }
        } else {
            tracing::debug!("Hit {} for {} ({} health left)", target, damage, remaining_health);
        }

        Strike { target, damage, remaining_health }
    }

    /// Carry the piece from `source` to the (empty) `destination`
    fn relocate(&mut self, source: Hex, destination: Hex, new_facing: Direction) {
        let Some(mut piece) = self.board.take(source) else {
            return;
        };
        piece.facing = new_facing;
        if self.board.set_piece(destination, piece).is_err() {
            return;
        }

        self.board.moved_this_turn.insert(destination);
        // Keep "already attacked" attached to the piece, not the tile it left
        if self.board.attacked_this_turn.remove(&source) {
            self.board.attacked_this_turn.insert(destination);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Fixed, Sequence};
    use crate::pieces::PieceTemplate;

    fn line_session(variance: f64) -> Session<Fixed> {
        let board = Board::new(
            &[PieceTemplate::new(10, 2, 1, 5)],
            &[Hex::new(0, 0), Hex::new(1, 0), Hex::new(2, 0)],
            &[(1, Hex::new(0, 0), Direction::E)],
            &[(1, Hex::new(2, 0), Direction::W)],
        )
        .unwrap();
        Session::new(board, Fixed(variance))
    }

    /// Disk of radius 3: two player-1 pieces and one player-2 piece
    fn skirmish(variance: Vec<f64>) -> Session<Sequence> {
        let templates = [
            PieceTemplate::new(10, 3, 2, 6),
            PieceTemplate::new(1, 1, 1, 1),
        ];
        let board = Board::new(
            &templates,
            &Hex::new(0, 0).disk(3),
            &[(1, Hex::new(0, 0), Direction::E), (1, Hex::new(-1, 0), Direction::E)],
            &[(2, Hex::new(2, 0), Direction::W)],
        )
        .unwrap();
        Session::new(board, Sequence::new(variance))
    }

    #[test]
    fn test_move_to_empty_tile() {
        let mut session = line_session(1.0);
        let out = session.move_piece(Hex::new(0, 0), Hex::new(1, 0), Direction::SE).unwrap();
        assert_eq!(out, MoveOutcome::Relocated { from: Hex::new(0, 0), to: Hex::new(1, 0) });

        let board = session.board();
        assert!(board.piece(Hex::new(0, 0)).is_none());
        let moved = board.piece(Hex::new(1, 0)).unwrap();
        assert_eq!(moved.facing, Direction::SE);
        assert_eq!(moved.health, 10);
        assert!(board.has_moved(Hex::new(1, 0)));
        assert!(!board.has_moved(Hex::new(0, 0)));
    }

    #[test]
    fn test_move_combat_defender_survives() {
        let mut session = line_session(1.0);
        let out = session.move_piece(Hex::new(0, 0), Hex::new(2, 0), Direction::W).unwrap();

        // floor(5 / (1 + ln 2) * 1.0) = 2
        let expected = Strike { target: Hex::new(2, 0), damage: 2, remaining_health: 8 };
        assert_eq!(out, MoveOutcome::Repelled(expected));

        let board = session.board();
        assert_eq!(board.piece(Hex::new(2, 0)).unwrap().health, 8);
        assert_eq!(board.piece(Hex::new(0, 0)).unwrap().facing, Direction::E);
        assert!(board.has_moved(Hex::new(0, 0)));
        assert_eq!(board.piece_count(Player::Two), 1);
    }

    #[test]
    fn test_move_combat_defender_dies() {
        // floor(2.953 * 4) = 11 >= 10
        let mut session = line_session(4.0);
        let out = session.move_piece(Hex::new(0, 0), Hex::new(2, 0), Direction::W).unwrap();
        assert!(matches!(out, MoveOutcome::Overran { strike: Strike { damage: 11, .. }, .. }));

        let board = session.board();
        assert!(board.piece(Hex::new(0, 0)).is_none());
        let winner = board.piece(Hex::new(2, 0)).unwrap();
        assert_eq!(winner.owner, Player::One);
        assert_eq!(winner.facing, Direction::W);
        assert_eq!(board.piece_count(Player::Two), 0);
        assert_eq!(board.piece_count(Player::One), 1);
        assert!(board.has_moved(Hex::new(2, 0)));
    }

    #[test]
    fn test_move_twice_rejected() {
        let mut session = line_session(1.0);
        session.move_piece(Hex::new(0, 0), Hex::new(1, 0), Direction::E).unwrap();
        let err = session.move_piece(Hex::new(1, 0), Hex::new(0, 0), Direction::W).unwrap_err();
        assert_eq!(err, ActionError::AlreadyMoved(Hex::new(1, 0)));
    }

    #[test]
    fn test_repelled_piece_cannot_move_again() {
        let mut session = line_session(0.0);
        let out = session.move_piece(Hex::new(0, 0), Hex::new(2, 0), Direction::E).unwrap();
        assert!(matches!(out, MoveOutcome::Repelled(Strike { damage: 0, remaining_health: 10, .. })));
        let err = session.move_piece(Hex::new(0, 0), Hex::new(1, 0), Direction::E).unwrap_err();
        assert_eq!(err, ActionError::AlreadyMoved(Hex::new(0, 0)));
    }

    #[test]
    fn test_invalid_moves_do_not_mutate() {
        let mut session = line_session(1.0);
        let before = session.board().clone();

        let cases = [
            (Hex::new(0, 0), Hex::new(0, 0), ActionError::SameTile(Hex::new(0, 0))),
            (Hex::new(0, 0), Hex::new(5, 0), ActionError::UnknownTile(Hex::new(5, 0))),
            (Hex::new(1, 0), Hex::new(0, 0), ActionError::NoPiece(Hex::new(1, 0))),
            (
                Hex::new(2, 0),
                Hex::new(1, 0),
                ActionError::NotYourPiece { at: Hex::new(2, 0), owner: Player::Two },
            ),
        ];
        for (from, to, expected) in cases {
            assert_eq!(session.move_piece(from, to, Direction::E), Err(expected));
        }

        let board = session.board();
        assert_eq!(board.moved_this_turn(), before.moved_this_turn());
        assert_eq!(board.piece(Hex::new(0, 0)), before.piece(Hex::new(0, 0)));
        assert_eq!(board.piece(Hex::new(2, 0)), before.piece(Hex::new(2, 0)));
    }

    #[test]
    fn test_move_out_of_range() {
        let mut session = skirmish(vec![1.0]);
        // Facing E with budget 3: directly behind then one more is 1 + 3 + 1
        let err = session.move_piece(Hex::new(-1, 0), Hex::new(-3, 0), Direction::W).unwrap_err();
        assert_eq!(err, ActionError::OutOfRange(Hex::new(-3, 0)));
        assert!(session.board().piece(Hex::new(-1, 0)).is_some());
    }

    #[test]
    fn test_move_onto_ally_rejected() {
        let mut session = skirmish(vec![1.0]);
        let err = session.move_piece(Hex::new(-1, 0), Hex::new(0, 0), Direction::E).unwrap_err();
        assert_eq!(err, ActionError::BlockedByAlly(Hex::new(0, 0)));
    }

    #[test]
    fn test_attack_kills_one_health_target() {
        let mut session = skirmish(vec![1.0]);
        let strike = session.attack_piece(Hex::new(0, 0), Hex::new(2, 0)).unwrap();

        assert!(strike.damage > 0);
        assert!(strike.killed());
        let board = session.board();
        assert!(board.piece(Hex::new(2, 0)).is_none());
        assert!(board.get(Hex::new(2, 0)).unwrap().content.is_empty());
        assert_eq!(board.piece_count(Player::Two), 0);
        assert_eq!(board.piece_count(Player::One), 2);
        // The attacker stays
        assert!(board.piece(Hex::new(0, 0)).is_some());
        assert!(board.has_attacked(Hex::new(0, 0)));
    }

    #[test]
    fn test_attack_marks_even_without_kill() {
        let mut session = skirmish(vec![0.0]);
        let strike = session.attack_piece(Hex::new(0, 0), Hex::new(2, 0)).unwrap();
        assert_eq!(strike.damage, 0);
        assert!(!strike.killed());
        assert!(session.board().has_attacked(Hex::new(0, 0)));

        let err = session.attack_piece(Hex::new(0, 0), Hex::new(2, 0)).unwrap_err();
        assert_eq!(err, ActionError::AlreadyAttacked(Hex::new(0, 0)));
    }

    #[test]
    fn test_attack_needs_enemy_target() {
        let mut session = skirmish(vec![1.0]);
        assert_eq!(
            session.attack_piece(Hex::new(0, 0), Hex::new(1, 0)),
            Err(ActionError::NoTarget(Hex::new(1, 0)))
        );
        assert_eq!(
            session.attack_piece(Hex::new(0, 0), Hex::new(-1, 0)),
            Err(ActionError::NoTarget(Hex::new(-1, 0)))
        );
        assert!(session.board().attacked_this_turn().is_empty());
    }

    #[test]
    fn test_attack_out_of_range() {
        let mut session = skirmish(vec![1.0]);
        // Attack distance 2 from (-1, 0) facing E: (2, 0) is 3 steps away
        assert_eq!(
            session.attack_piece(Hex::new(-1, 0), Hex::new(2, 0)),
            Err(ActionError::OutOfRange(Hex::new(2, 0)))
        );
    }

    #[test]
    fn test_attack_through_pieces() {
        let templates = [PieceTemplate::new(10, 1, 3, 6)];
        let board = Board::new(
            &templates,
            &[Hex::new(0, 0), Hex::new(1, 0), Hex::new(2, 0)],
            &[(1, Hex::new(0, 0), Direction::E), (1, Hex::new(1, 0), Direction::E)],
            &[(1, Hex::new(2, 0), Direction::W)],
        )
        .unwrap();
        let mut session = Session::new(board, Fixed(1.0));

        // floor(6 / (1 + ln 2)) = 3
        let strike = session.attack_piece(Hex::new(0, 0), Hex::new(2, 0)).unwrap();
        assert_eq!(strike, Strike { target: Hex::new(2, 0), damage: 3, remaining_health: 7 });
    }

    #[test]
    fn test_attack_then_move_keeps_attack_mark() {
        let mut session = skirmish(vec![0.0]);
        session.attack_piece(Hex::new(0, 0), Hex::new(2, 0)).unwrap();
        session.move_piece(Hex::new(0, 0), Hex::new(0, 1), Direction::SE).unwrap();

        let board = session.board();
        assert!(!board.has_attacked(Hex::new(0, 0)));
        assert!(board.has_attacked(Hex::new(0, 1)));
        assert_eq!(
            session.attack_piece(Hex::new(0, 1), Hex::new(2, 0)),
            Err(ActionError::AlreadyAttacked(Hex::new(0, 1)))
        );

        // Another piece moving onto the vacated tile may still attack
        session.move_piece(Hex::new(-1, 0), Hex::new(0, 0), Direction::E).unwrap();
        assert!(!session.board().has_attacked(Hex::new(0, 0)));
    }

    #[test]
    fn test_move_then_attack() {
        let mut session = skirmish(vec![1.0]);
        session.move_piece(Hex::new(-1, 0), Hex::new(-1, 1), Direction::SE).unwrap();
        assert!(session.board().has_moved(Hex::new(-1, 1)));
        assert!(!session.board().has_attacked(Hex::new(-1, 1)));
    }

    #[test]
    fn test_rotate_in_place() {
        let templates = [PieceTemplate::new(10, 3, 1, 1)];
        let board = Board::new(
            &templates,
            &Hex::new(0, 0).disk(2),
            &[(1, Hex::new(0, 0), Direction::E)],
            &[],
        )
        .unwrap();
        let mut session = Session::new(board, Fixed(1.0));

        session.rotate_piece(Hex::new(0, 0), Direction::W).unwrap();
        let board = session.board();
        assert_eq!(board.piece(Hex::new(0, 0)).unwrap().facing, Direction::W);
        assert!(board.has_moved(Hex::new(0, 0)));

        assert_eq!(
            session.rotate_piece(Hex::new(0, 0), Direction::E),
            Err(ActionError::AlreadyMoved(Hex::new(0, 0)))
        );
    }

    #[test]
    fn test_rotate_needs_movement_budget() {
        let mut session = line_session(1.0);
        // Turning around costs 3, movement is 2
        assert_eq!(
            session.rotate_piece(Hex::new(0, 0), Direction::W),
            Err(ActionError::CannotTurn { at: Hex::new(0, 0), facing: Direction::W })
        );
        assert_eq!(session.board().piece(Hex::new(0, 0)).unwrap().facing, Direction::E);
        assert!(session.board().moved_this_turn().is_empty());
    }

    #[test]
    fn test_rotate_cost_by_angle() {
        let templates = [PieceTemplate::new(10, 1, 1, 1)];
        let board = Board::new(
            &templates,
            &[Hex::new(0, 0), Hex::new(1, 0)],
            &[(1, Hex::new(0, 0), Direction::E), (1, Hex::new(1, 0), Direction::E)],
            &[],
        )
        .unwrap();
        let mut session = Session::new(board, Fixed(1.0));

        // Movement 1 pays for one step of turn, not a reversal
        assert_eq!(
            session.rotate_piece(Hex::new(0, 0), Direction::W),
            Err(ActionError::CannotTurn { at: Hex::new(0, 0), facing: Direction::W })
        );
        assert_eq!(
            session.rotate_piece(Hex::new(0, 0), Direction::SW),
            Err(ActionError::CannotTurn { at: Hex::new(0, 0), facing: Direction::SW })
        );
        session.rotate_piece(Hex::new(0, 0), Direction::NE).unwrap();
        session.rotate_piece(Hex::new(1, 0), Direction::SE).unwrap();

        let board = session.board();
        assert_eq!(board.piece(Hex::new(0, 0)).unwrap().facing, Direction::NE);
        assert_eq!(board.piece(Hex::new(1, 0)).unwrap().facing, Direction::SE);
    }

    #[test]
    fn test_rotate_ignores_surroundings() {
        // Boxed in by allies, the piece can still turn where it stands
        let templates = [PieceTemplate::new(10, 2, 1, 1)];
        let mut player1 = vec![(1, Hex::new(0, 0), Direction::E)];
        player1.extend(Direction::ALL.iter().map(|&d| (1, Hex::new(0, 0).neighbor(d), d)));
        let board = Board::new(&templates, &Hex::new(0, 0).disk(1), &player1, &[]).unwrap();
        let mut session = Session::new(board, Fixed(1.0));

        session.rotate_piece(Hex::new(0, 0), Direction::NW).unwrap();
        assert_eq!(session.board().piece(Hex::new(0, 0)).unwrap().facing, Direction::NW);
    }
}
