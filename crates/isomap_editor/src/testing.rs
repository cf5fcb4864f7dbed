//! Test helpers for `isomap_editor` commands.
//!
//! `TestMap` owns everything an [`EditContext`] borrows, so a test can build a
//! map once and hand out a fresh context for every perform, undo or redo.
#![allow(dead_code)]

use crate::context::EditContext;
use crate::refresh::RecordingNotifier;
use isomap_cliffs::{CliffCatalog, CliffTileDescriptor, ConnectionPoint, CliffSide};
use isomap_core::{CellCoord, Direction, Grid, GridAccess, ObjectTable, TilesetResolver, TilesetTable};
use isomap_ramps::{RampShape, RampTilesets};

/// Owned map state for command tests
pub struct TestMap {
    pub grid: Grid,
    pub tilesets: TilesetTable,
    pub objects: ObjectTable,
    pub ramps: RampTilesets,
    pub notifier: RecordingNotifier,
}

impl TestMap {
    /// Flat map of clear ground with the standard tilesets
    pub fn flat(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height, 0),
            tilesets: standard_tilesets(),
            objects: ObjectTable::new(),
            ramps: RampTilesets::default(),
            notifier: RecordingNotifier::new(),
        }
    }

    /// Flat map where every cell starts at `height`
    pub fn plateau(width: u32, height: u32, level: u8) -> Self {
        let mut map = Self::flat(width, height);
        let coords: Vec<CellCoord> = map.grid.cells().map(|c| c.coord).collect();
        for coord in coords {
            map.grid.set_height(coord, level);
        }
        map
    }

    pub fn ctx(&mut self) -> EditContext<'_> {
        EditContext::new(
            &mut self.grid,
            &self.tilesets,
            &mut self.objects,
            &self.ramps,
            &mut self.notifier,
        )
    }

    pub fn tile(&self, x: i32, y: i32) -> u32 {
        self.grid.cell(CellCoord::new(x, y)).map(|c| c.tile).unwrap_or(u32::MAX)
    }

    pub fn height(&self, x: i32, y: i32) -> u8 {
        self.grid.height(CellCoord::new(x, y)).unwrap_or(u8::MAX)
    }

    /// Global tile index of a ramp shape in the default ramp tileset
    pub fn ramp_tile(&self, shape: RampShape) -> Option<u32> {
        self.tilesets
            .range("Ramps")
            .and_then(|r| r.global(shape.ordinal()))
    }

    /// Global tile index of a cliff tileset's local tile
    pub fn cliff_tile(&self, local: u32) -> Option<u32> {
        self.tilesets.range("Cliffs").and_then(|r| r.global(local))
    }
}

/// Clear ground, the default ramp set and a small cliff tileset
pub fn standard_tilesets() -> TilesetTable {
    TilesetTable::new()
        .with("Clear", 1)
        .with("Ramps", 14)
        .with("Cliffs", 8)
}

fn point(index: u8, offset: (i32, i32), direction: Direction) -> ConnectionPoint {
    ConnectionPoint {
        index,
        offset: offset.into(),
        mask: [direction].into_iter().collect(),
        required: vec![],
        forbidden: vec![],
        side: CliffSide::Front,
    }
}

/// Two-cell west-east cliff piece using one local tile of the "Cliffs" tileset
pub fn straight_piece(index: u32, variant: u32) -> CliffTileDescriptor {
    CliffTileDescriptor {
        index,
        tileset: "Cliffs".to_string(),
        variants: vec![variant],
        connection_points: vec![
            point(0, (0, 0), Direction::West),
            point(1, (1, 0), Direction::East),
        ],
        footprint: vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
        priority: 0,
        distance_modifier: 0.0,
    }
}

/// Catalog with a west-east piece (variants 0 and 1) and a north-south piece (variant 2)
pub fn cliff_catalog() -> CliffCatalog {
    let mut straight = straight_piece(1, 0);
    straight.variants.push(1);
    let vertical = CliffTileDescriptor {
        index: 2,
        tileset: "Cliffs".to_string(),
        variants: vec![2],
        connection_points: vec![
            point(0, (0, 0), Direction::North),
            point(1, (0, 1), Direction::South),
        ],
        footprint: vec![CellCoord::new(0, 0), CellCoord::new(0, 1)],
        priority: 0,
        distance_modifier: 0.0,
    };
    catalog_of(vec![straight, vertical])
}

pub fn catalog_of(descriptors: Vec<CliffTileDescriptor>) -> CliffCatalog {
    match CliffCatalog::from_descriptors(descriptors) {
        Ok(catalog) => catalog,
        Err(err) => panic!("test catalog is invalid: {err}"),
    }
}
