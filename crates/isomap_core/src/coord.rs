//! Grid coordinates and the 8-way compass

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A cell position on the map grid. Signed so that offsets and
/// out-of-map neighbours can be expressed without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between two cells
    pub fn distance(self, other: CellCoord) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The neighbouring cell in the given direction
    pub fn step(self, direction: Direction) -> CellCoord {
        self + direction.offset()
    }

    /// The 4 edge-adjacent neighbours (N, E, S, W)
    pub fn cardinal_neighbors(self) -> [CellCoord; 4] {
        Direction::CARDINALS.map(|d| self.step(d))
    }

    /// All 8 neighbours in compass order starting at north
    pub fn neighbors(self) -> [CellCoord; 8] {
        Direction::ALL.map(|d| self.step(d))
    }
}

impl Add for CellCoord {
    type Output = CellCoord;

    fn add(self, rhs: CellCoord) -> CellCoord {
        CellCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CellCoord {
    type Output = CellCoord;

    fn sub(self, rhs: CellCoord) -> CellCoord {
        CellCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass direction, clockwise from north.
///
/// Index layout used by direction masks and ramp rules:
///   7|0|1
///   6|X|2
///   5|4|3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONALS: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % 8]
    }

    /// Unit grid offset. North is towards negative y.
    pub const fn offset(self) -> CellCoord {
        match self {
            Direction::North => CellCoord::new(0, -1),
            Direction::NorthEast => CellCoord::new(1, -1),
            Direction::East => CellCoord::new(1, 0),
            Direction::SouthEast => CellCoord::new(1, 1),
            Direction::South => CellCoord::new(0, 1),
            Direction::SouthWest => CellCoord::new(-1, 1),
            Direction::West => CellCoord::new(-1, 0),
            Direction::NorthWest => CellCoord::new(-1, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        Self::from_index(self.index() + 4)
    }

    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// The two cardinals sharing a corner with a diagonal, clockwise order.
    /// Cardinals return themselves twice.
    pub const fn flanks(self) -> (Direction, Direction) {
        if self.is_diagonal() {
            (
                Self::from_index(self.index() + 7),
                Self::from_index(self.index() + 1),
            )
        } else {
            (self, self)
        }
    }
}

/// Set of compass directions packed into 8 bits (bit i = `Direction::ALL[i]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionMask(pub u8);

impl DirectionMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0xFF);

    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | (1 << direction.index()))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every direction replaced by its opposite
    pub const fn reversed(self) -> Self {
        Self(self.0.rotate_left(4))
    }

    pub const fn intersect(self, other: DirectionMask) -> Self {
        Self(self.0 & other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionMask {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(DirectionMask::NONE, DirectionMask::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_pair_up() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let sum = d.offset() + d.opposite().offset();
            assert_eq!(sum, CellCoord::ZERO);
        }
    }

    #[test]
    fn test_diagonal_flanks() {
        assert_eq!(
            Direction::NorthEast.flanks(),
            (Direction::North, Direction::East)
        );
        assert_eq!(
            Direction::NorthWest.flanks(),
            (Direction::West, Direction::North)
        );
        let (a, b) = Direction::SouthWest.flanks();
        assert_eq!(a.offset() + b.offset(), Direction::SouthWest.offset());
    }

    #[test]
    fn test_mask_reversal_maps_each_bit_to_opposite() {
        let mask: DirectionMask = [Direction::North, Direction::East].into_iter().collect();
        let reversed = mask.reversed();
        assert!(reversed.contains(Direction::South));
        assert!(reversed.contains(Direction::West));
        assert!(!reversed.contains(Direction::North));
        assert_eq!(reversed.reversed(), mask);
    }

    #[test]
    fn test_distance() {
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(3, 4);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(b), 0.0);
    }
}
