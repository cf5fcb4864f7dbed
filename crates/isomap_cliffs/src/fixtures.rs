//! Catalog entries shared by the unit tests

use crate::{CliffSide, CliffTileDescriptor, ConnectionPoint};
use isomap_core::{CellCoord, Direction};

pub fn point(index: u8, offset: (i32, i32), directions: &[Direction]) -> ConnectionPoint {
    ConnectionPoint {
        index,
        offset: offset.into(),
        mask: directions.iter().copied().collect(),
        required: vec![],
        forbidden: vec![],
        side: CliffSide::Front,
    }
}

/// Two-cell piece running west to east
pub fn straight(index: u32) -> CliffTileDescriptor {
    CliffTileDescriptor {
        index,
        tileset: "Cliffs".to_string(),
        variants: vec![0, 1],
        connection_points: vec![
            point(0, (0, 0), &[Direction::West]),
            point(1, (1, 0), &[Direction::East]),
        ],
        footprint: vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
        priority: 0,
        distance_modifier: 0.0,
    }
}

/// Two-cell piece running north to south
pub fn vertical(index: u32) -> CliffTileDescriptor {
    CliffTileDescriptor {
        index,
        tileset: "Cliffs".to_string(),
        variants: vec![2],
        connection_points: vec![
            point(0, (0, 0), &[Direction::North]),
            point(1, (0, 1), &[Direction::South]),
        ],
        footprint: vec![CellCoord::new(0, 0), CellCoord::new(0, 1)],
        priority: 0,
        distance_modifier: 0.0,
    }
}

/// Single-cell piece that turns from westward travel to southward travel
pub fn corner(index: u32) -> CliffTileDescriptor {
    CliffTileDescriptor {
        index,
        tileset: "Cliffs".to_string(),
        variants: vec![3],
        connection_points: vec![
            point(0, (0, 0), &[Direction::West]),
            point(1, (0, 0), &[Direction::South]),
        ],
        footprint: vec![CellCoord::new(0, 0)],
        priority: 0,
        distance_modifier: 0.0,
    }
}

