//! Hex grid geometry with axial and cube coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Cube hex coordinates (x + y + z == 0)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cube {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cube {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn to_axial(self) -> Hex {
        debug_assert_eq!(self.x + self.y + self.z, 0, "cube coordinate off the plane");
        Hex::new(self.x, self.z)
    }

    pub fn dot(self, other: Cube) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third implicit axial component
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    pub fn to_cube(self) -> Cube {
        Cube::new(self.q, self.s(), self.r)
    }

    /// Neighbor one step away in `direction`
    pub fn neighbor(self, direction: Direction) -> Hex {
        self.offset(direction, 1)
    }

    /// Hex `steps` away along `direction`
    pub fn offset(self, direction: Direction, steps: i32) -> Hex {
        let (dq, dr) = direction.axial();
        Hex::new(self.q + dq * steps, self.r + dr * steps)
    }

    /// Distance between two hexes
    pub fn distance_to(self, other: Hex) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        (dq + dr + ds) / 2
    }

    /// All hexes at exactly `radius` steps, walking clockwise from the W corner.
    /// Radius 0 yields only the center.
    pub fn ring(self, radius: u32) -> Vec<Hex> {
        if radius == 0 {
            return vec![self];
        }

        let radius = radius as i32;
        let mut ring = Vec::with_capacity(6 * radius as usize);
        let mut current = self.offset(Direction::W, radius);
        for direction in Direction::ALL {
            for _ in 0..radius {
                ring.push(current);
                current = current.neighbor(direction);
            }
        }
        ring
    }

    /// All hexes within `radius` steps, center first, ring by ring
    pub fn disk(self, radius: u32) -> Vec<Hex> {
        (0..=radius).flat_map(|r| self.ring(r)).collect()
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// The six facings, in cyclic (clockwise) order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    NE,
    E,
    SE,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Position in the cyclic order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector in cube space
    pub fn unit(self) -> Cube {
        match self {
            Direction::NE => Cube::new(1, 0, -1),
            Direction::E => Cube::new(1, -1, 0),
            Direction::SE => Cube::new(0, -1, 1),
            Direction::SW => Cube::new(-1, 0, 1),
            Direction::W => Cube::new(-1, 1, 0),
            Direction::NW => Cube::new(0, 1, -1),
        }
    }

    /// Unit vector in axial space (dq, dr)
    pub fn axial(self) -> (i32, i32) {
        let unit = self.unit();
        (unit.x, unit.z)
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 3) % 6]
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }

    /// Turning penalty between two facings: 0 same, 1 adjacent, 2 skip-one, 3 opposite.
    ///
    /// Classified from the dot product of the cube unit vectors, which is
    /// always one of 2, 1, -1, -2 for two of the six directions.
    pub fn turn_cost(self, other: Direction) -> u32 {
        match self.unit().dot(other.unit()) {
            2 => 0,
            1 => 1,
            -1 => 2,
            -2 => 3,
            dot => panic!(
                "turn cost between {} and {} has impossible dot product {}",
                self, other, dot
            ),
        }
    }
}

/// Turning penalty between two facings (see [`Direction::turn_cost`])
pub fn direction_turn_cost(a: Direction, b: Direction) -> u32 {
    a.turn_cost(b)
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized facing name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {0:?}, expected one of NE, E, SE, SW, W, NW")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}
