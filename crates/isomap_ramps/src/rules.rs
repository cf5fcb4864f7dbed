//! Ramp rule table
//!
//! Each rule pairs a ramp shape with a height comparison for each of the 8
//! compass neighbours. Rules are evaluated top to bottom and the first match
//! wins, so specific shapes precede the generic ones and the table ends in a
//! catch-all. The order is part of the behaviour and is pinned by tests.
//!
//! A neighbour outside the map never counts as raised. It satisfies every
//! comparison except [`HeightComparison::Higher`] and
//! [`HeightComparison::MuchHigher`], so the map border alone never slopes a cell.

use isomap_core::Direction;
use serde::{Deserialize, Serialize};

/// Relation of a neighbour's height to the centre cell's height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightComparison {
    Equal,
    /// Exactly one level higher
    Higher,
    /// Two or more levels higher
    MuchHigher,
    HigherOrEqual,
    /// Exactly one level lower
    Lower,
    /// Two or more levels lower
    MuchLower,
    LowerOrEqual,
    Irrelevant,
}

impl HeightComparison {
    /// Test `neighbor_height - cell_height`
    pub fn satisfied_by(self, delta: i32) -> bool {
        match self {
            HeightComparison::Equal => delta == 0,
            HeightComparison::Higher => delta == 1,
            HeightComparison::MuchHigher => delta >= 2,
            HeightComparison::HigherOrEqual => delta >= 0,
            HeightComparison::Lower => delta == -1,
            HeightComparison::MuchLower => delta <= -2,
            HeightComparison::LowerOrEqual => delta <= 0,
            HeightComparison::Irrelevant => true,
        }
    }

    /// Test a neighbour that lies outside the map
    pub fn satisfied_off_map(self) -> bool {
        !matches!(self, HeightComparison::Higher | HeightComparison::MuchHigher)
    }
}

/// The ramp pieces of a ramp tileset. The direction names the raised side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RampShape {
    /// One cardinal side raised by a level
    Edge(Direction),
    /// Two adjacent cardinal sides raised; the direction is the diagonal between them
    InnerCorner(Direction),
    /// Inner corner whose shared vertex rises two levels
    Steep(Direction),
    /// Two opposite corners raised; the direction is one end of the diagonal
    Double(Direction),
}

impl RampShape {
    /// Every shape in tileset order
    pub const ALL: [RampShape; 14] = [
        RampShape::Edge(Direction::North),
        RampShape::Edge(Direction::East),
        RampShape::Edge(Direction::South),
        RampShape::Edge(Direction::West),
        RampShape::InnerCorner(Direction::NorthEast),
        RampShape::InnerCorner(Direction::SouthEast),
        RampShape::InnerCorner(Direction::SouthWest),
        RampShape::InnerCorner(Direction::NorthWest),
        RampShape::Steep(Direction::NorthEast),
        RampShape::Steep(Direction::SouthEast),
        RampShape::Steep(Direction::SouthWest),
        RampShape::Steep(Direction::NorthWest),
        RampShape::Double(Direction::NorthEast),
        RampShape::Double(Direction::NorthWest),
    ];

    /// Offset of this shape's tile inside a ramp tileset
    pub fn ordinal(self) -> u32 {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i as u32)
            .unwrap_or(0)
    }

    pub fn from_ordinal(ordinal: u32) -> Option<RampShape> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

/// One entry of the ramp table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampRule {
    /// `None` means flat ground
    pub shape: Option<RampShape>,
    /// Comparisons indexed by `Direction::index`
    pub pattern: [HeightComparison; 8],
    /// Applied to the cell's height when the rule wins
    pub height_delta: i8,
}

impl RampRule {
    /// `neighbors` holds each neighbour's height, `None` outside the map.
    /// Out-of-map neighbours satisfy everything but a raised comparison.
    pub fn matches(&self, height: u8, neighbors: &[Option<u8>; 8]) -> bool {
        self.pattern
            .iter()
            .zip(neighbors.iter())
            .all(|(cmp, neighbor)| match neighbor {
                Some(n) => cmp.satisfied_by(*n as i32 - height as i32),
                None => cmp.satisfied_off_map(),
            })
    }
}

/// First rule in `rules` matching the neighbourhood
pub fn find_rule<'r>(
    rules: &'r [RampRule],
    height: u8,
    neighbors: &[Option<u8>; 8],
) -> Option<&'r RampRule> {
    rules.iter().find(|r| r.matches(height, neighbors))
}

const EQ: HeightComparison = HeightComparison::Equal;
const HI: HeightComparison = HeightComparison::Higher;
const MH: HeightComparison = HeightComparison::MuchHigher;
const LE: HeightComparison = HeightComparison::LowerOrEqual;
const IR: HeightComparison = HeightComparison::Irrelevant;

const fn ramp(shape: RampShape, pattern: [HeightComparison; 8]) -> RampRule {
    RampRule {
        shape: Some(shape),
        pattern,
        height_delta: 0,
    }
}

const fn fill(pattern: [HeightComparison; 8]) -> RampRule {
    RampRule {
        shape: None,
        pattern,
        height_delta: 1,
    }
}

// Pattern columns:    N   NE  E   SE  S   SW  W   NW
/// The ramp table for stepped terrain
pub const RAMP_RULES: [RampRule; 22] = [
    // Nothing around is higher
    RampRule {
        shape: None,
        pattern: [LE; 8],
        height_delta: 0,
    },
    // Steep ramps: the diagonal between two raised sides is two levels up
    ramp(RampShape::Steep(Direction::NorthEast), [HI, MH, HI, IR, LE, IR, LE, IR]),
    ramp(RampShape::Steep(Direction::SouthEast), [LE, IR, HI, MH, HI, IR, LE, IR]),
    ramp(RampShape::Steep(Direction::SouthWest), [LE, IR, LE, IR, HI, MH, HI, IR]),
    ramp(RampShape::Steep(Direction::NorthWest), [HI, IR, LE, IR, LE, IR, HI, MH]),
    // Inner corners
    ramp(RampShape::InnerCorner(Direction::NorthEast), [HI, IR, HI, IR, LE, IR, LE, IR]),
    ramp(RampShape::InnerCorner(Direction::SouthEast), [LE, IR, HI, IR, HI, IR, LE, IR]),
    ramp(RampShape::InnerCorner(Direction::SouthWest), [LE, IR, LE, IR, HI, IR, HI, IR]),
    ramp(RampShape::InnerCorner(Direction::NorthWest), [HI, IR, LE, IR, LE, IR, HI, IR]),
    // Edge ramps
    ramp(RampShape::Edge(Direction::North), [HI, IR, LE, IR, LE, IR, LE, IR]),
    ramp(RampShape::Edge(Direction::East), [LE, IR, HI, IR, LE, IR, LE, IR]),
    ramp(RampShape::Edge(Direction::South), [LE, IR, LE, IR, HI, IR, LE, IR]),
    ramp(RampShape::Edge(Direction::West), [LE, IR, LE, IR, LE, IR, HI, IR]),
    // One-cell valleys have no ramp piece; fill them
    fill([HI, IR, IR, IR, HI, IR, IR, IR]),
    fill([IR, IR, HI, IR, IR, IR, HI, IR]),
    // Double ramps: two opposite corners raised with level sides
    ramp(RampShape::Double(Direction::NorthEast), [EQ, HI, EQ, LE, EQ, HI, EQ, LE]),
    ramp(RampShape::Double(Direction::NorthWest), [EQ, LE, EQ, HI, EQ, LE, EQ, HI]),
    // Odd-angle doubles where one side already dips
    ramp(RampShape::Double(Direction::NorthEast), [LE, HI, LE, LE, LE, HI, LE, LE]),
    ramp(RampShape::Double(Direction::NorthWest), [LE, LE, LE, HI, LE, LE, LE, HI]),
    // Doubles where all four corners are raised behave like a valley
    fill([LE, HI, LE, HI, LE, HI, LE, HI]),
    // A lone raised diagonal keeps the cell flat
    RampRule {
        shape: None,
        pattern: [LE, IR, LE, IR, LE, IR, LE, IR],
        height_delta: 0,
    },
    // Catch-all
    RampRule {
        shape: None,
        pattern: [IR; 8],
        height_delta: 0,
    },
];
