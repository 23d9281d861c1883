//! Movement and attack ranges for directional pieces
//!
//! Both searches walk the board's hex adjacency with a cost-ordered frontier.
//! Search state is `(hex, heading)`: a step in direction `d` while heading `h`
//! costs `1 + turn_cost(h, d)` and leaves the piece heading `d`. The origin is
//! seeded with the piece's facing at cost 0.

use crate::board::{Board, TileContent};
use crate::hex::{Direction, Hex};
use crate::pieces::{Piece, Player};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// How the search treats a tile it steps onto
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Record and keep searching from here
    Traverse,
    /// Record, but the branch ends here
    Stop,
    /// Neither record nor expand
    Blocked,
}

/// Cheapest cost for each reachable `(hex, heading)`
type Costs = FxHashMap<(Hex, Direction), u32>;

fn search(
    board: &Board,
    origin: Hex,
    facing: Direction,
    budget: u32,
    classify: impl Fn(Hex, &TileContent) -> Step,
) -> Costs {
    let mut best: Costs = FxHashMap::default();
    let mut frontier = BinaryHeap::new();

    best.insert((origin, facing), 0);
    frontier.push(Reverse((0u32, origin, facing)));

    while let Some(Reverse((cost, hex, heading))) = frontier.pop() {
        if best.get(&(hex, heading)).is_some_and(|&known| known < cost) {
            continue;
        }

        for direction in Direction::ALL {
            let next = hex.neighbor(direction);
            let Some(tile) = board.get(next) else {
                continue;
            };

            let step = classify(next, tile.content);
            if step == Step::Blocked {
                continue;
            }

            let next_cost = cost + 1 + heading.turn_cost(direction);
            if next_cost > budget {
                continue;
            }

            let key = (next, direction);
            if best.get(&key).is_some_and(|&known| known <= next_cost) {
                continue;
            }
            best.insert(key, next_cost);

            if step == Step::Traverse {
                frontier.push(Reverse((next_cost, next, direction)));
            }
        }
    }

    best
}

// ============================================================================
// MOVEMENT
// ============================================================================

/// Destinations a piece can move to, keyed by arrival heading
#[derive(Clone, Debug)]
pub struct MovementRange {
    origin: Hex,
    owner: Player,
    costs: Costs,
}

impl MovementRange {
    pub fn origin(&self) -> Hex {
        self.origin
    }

    /// Cost of arriving at `hex` facing `facing`
    pub fn cost(&self, hex: Hex, facing: Direction) -> Option<u32> {
        self.costs.get(&(hex, facing)).copied()
    }

    /// Cheapest arrival cost at `hex`
    pub fn cost_to(&self, hex: Hex) -> Option<u32> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.cost(hex, d))
            .min()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.cost_to(hex).is_some()
    }

    pub fn allows_facing(&self, hex: Hex, facing: Direction) -> bool {
        self.costs.contains_key(&(hex, facing))
    }

    /// Headings the piece can arrive at `hex` with, and their costs
    pub fn arrivals(&self, hex: Hex) -> Vec<(Direction, u32)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.cost(hex, d).map(|c| (d, c)))
            .collect()
    }

    /// Distinct reachable hexes with their cheapest cost, sorted by hex
    pub fn destinations(&self) -> Vec<(Hex, u32)> {
        let mut cheapest: FxHashMap<Hex, u32> = FxHashMap::default();
        for (&(hex, _), &cost) in &self.costs {
            cheapest
                .entry(hex)
                .and_modify(|c| *c = (*c).min(cost))
                .or_insert(cost);
        }
        let mut out: Vec<_> = cheapest.into_iter().collect();
        out.sort_unstable();
        out
    }

    /// Every `(hex, heading, cost)` entry, sorted
    pub fn entries(&self) -> Vec<(Hex, Direction, u32)> {
        let mut out: Vec<_> = self
            .costs
            .iter()
            .map(|(&(hex, facing), &cost)| (hex, facing, cost))
            .collect();
        out.sort_unstable();
        out
    }

    /// Reachable hexes holding an enemy piece on `board`
    pub fn combat_targets(&self, board: &Board) -> Vec<Hex> {
        self.destinations()
            .into_iter()
            .map(|(hex, _)| hex)
            .filter(|&hex| board.piece(hex).is_some_and(|p| p.owner != self.owner))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Movement range of the piece at `origin`, or None if the tile holds no piece.
///
/// Empty tiles are traversed. Enemy pieces are recorded as combat destinations
/// but end the branch; friendly pieces block outright. The origin counts as
/// empty since the piece leaves it.
pub fn movement_range(board: &Board, origin: Hex) -> Option<MovementRange> {
    let piece = board.piece(origin)?;
    Some(movement_range_of(board, origin, piece))
}

pub(crate) fn movement_range_of(board: &Board, origin: Hex, piece: &Piece) -> MovementRange {
    let owner = piece.owner;
    let costs = search(board, origin, piece.facing, piece.movement_distance(), |hex, content| {
        match content.owner() {
            _ if hex == origin => Step::Traverse,
            None => Step::Traverse,
            Some(o) if o == owner => Step::Blocked,
            Some(_) => Step::Stop,
        }
    });

    tracing::debug!(
        "movement range from {}: {} entries (distance {})",
        origin,
        costs.len(),
        piece.movement_distance()
    );

    MovementRange { origin, owner, costs }
}

// ============================================================================
// ATTACK
// ============================================================================

/// Hexes a piece can strike, with the cheapest cost to each
#[derive(Clone, Debug)]
pub struct AttackRange {
    origin: Hex,
    costs: FxHashMap<Hex, u32>,
}

impl AttackRange {
    pub fn origin(&self) -> Hex {
        self.origin
    }

    pub fn cost_to(&self, hex: Hex) -> Option<u32> {
        self.costs.get(&hex).copied()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.costs.contains_key(&hex)
    }

    /// `(hex, cost)` pairs sorted by hex
    pub fn targets(&self) -> Vec<(Hex, u32)> {
        let mut out: Vec<_> = self.costs.iter().map(|(&h, &c)| (h, c)).collect();
        out.sort_unstable();
        out
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Attack range of the piece at `origin`, or None if the tile holds no piece.
///
/// Pieces do not block line of attack; every tile of the layout is traversed.
pub fn attack_range(board: &Board, origin: Hex) -> Option<AttackRange> {
    let piece = board.piece(origin)?;
    Some(attack_range_of(board, origin, piece))
}

pub(crate) fn attack_range_of(board: &Board, origin: Hex, piece: &Piece) -> AttackRange {
    let by_heading = search(board, origin, piece.facing, piece.attack_distance(), |_, _| {
        Step::Traverse
    });

    let mut costs: FxHashMap<Hex, u32> = FxHashMap::default();
    for ((hex, _), cost) in by_heading {
        costs
            .entry(hex)
            .and_modify(|c| *c = (*c).min(cost))
            .or_insert(cost);
    }

    tracing::debug!(
        "attack range from {}: {} hexes (distance {})",
        origin,
        costs.len(),
        piece.attack_distance()
    );

    AttackRange { origin, costs }
}
