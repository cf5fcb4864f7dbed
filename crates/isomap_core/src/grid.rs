//! Cell storage and the grid accessor contract

use crate::coord::CellCoord;
use serde::{Deserialize, Serialize};

/// Highest height level on a standard map
pub const DEFAULT_MAX_HEIGHT: u8 = 14;

/// The per-cell state that edits change and undo restores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellState {
    /// Global tile index
    pub tile: u32,
    /// Sub-tile index within a multi-cell tile
    pub sub_tile: u8,
    /// Height level
    pub height: u8,
}

/// One grid position with its tile identity and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub coord: CellCoord,
    pub tile: u32,
    pub sub_tile: u8,
    pub height: u8,
}

impl Cell {
    pub fn state(&self) -> CellState {
        CellState {
            tile: self.tile,
            sub_tile: self.sub_tile,
            height: self.height,
        }
    }
}

/// Read/write access to map cells.
///
/// Out-of-bounds coordinates are never an error: `cell` returns `None` and the
/// setters do nothing, so brushes and searches near the map edge simply clip.
pub trait GridAccess {
    /// The cell at `coord`, or `None` outside the map
    fn cell(&self, coord: CellCoord) -> Option<Cell>;
    fn set_tile(&mut self, coord: CellCoord, tile: u32, sub_tile: u8);
    fn set_height(&mut self, coord: CellCoord, height: u8);
    fn max_height(&self) -> u8;
    /// Width and height in cells
    fn size(&self) -> (u32, u32);

    fn contains(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some()
    }

    fn height(&self, coord: CellCoord) -> Option<u8> {
        self.cell(coord).map(|c| c.height)
    }

    /// Overwrite tile, sub-tile and height at once
    fn set_state(&mut self, coord: CellCoord, state: CellState) {
        self.set_tile(coord, state.tile, state.sub_tile);
        self.set_height(coord, state.height);
    }
}

/// Row-major cell arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    max_height: u8,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a flat grid where every cell shows `tile` at height 0
    pub fn new(width: u32, height: u32, tile: u32) -> Self {
        Self::with_max_height(width, height, tile, DEFAULT_MAX_HEIGHT)
    }

    pub fn with_max_height(width: u32, height: u32, tile: u32, max_height: u8) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            max_height,
            cells: vec![
                CellState {
                    tile,
                    sub_tile: 0,
                    height: 0,
                };
                size
            ],
        }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.x < 0
            || coord.y < 0
            || coord.x >= self.width as i32
            || coord.y >= self.height as i32
        {
            return None;
        }
        Some(coord.y as usize * self.width as usize + coord.x as usize)
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().enumerate().map(|(i, state)| {
            let x = (i % self.width as usize) as i32;
            let y = (i / self.width as usize) as i32;
            Cell {
                coord: CellCoord::new(x, y),
                tile: state.tile,
                sub_tile: state.sub_tile,
                height: state.height,
            }
        })
    }

    /// Raw state of a cell, if in bounds
    pub fn state(&self, coord: CellCoord) -> Option<CellState> {
        self.index(coord).and_then(|i| self.cells.get(i)).copied()
    }
}

impl GridAccess for Grid {
    fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.state(coord).map(|state| Cell {
            coord,
            tile: state.tile,
            sub_tile: state.sub_tile,
            height: state.height,
        })
    }

    fn set_tile(&mut self, coord: CellCoord, tile: u32, sub_tile: u8) {
        if let Some(cell) = self.index(coord).and_then(|i| self.cells.get_mut(i)) {
            cell.tile = tile;
            cell.sub_tile = sub_tile;
        }
    }

    fn set_height(&mut self, coord: CellCoord, height: u8) {
        let max = self.max_height;
        if let Some(cell) = self.index(coord).and_then(|i| self.cells.get_mut(i)) {
            cell.height = height.min(max);
        }
    }

    fn max_height(&self) -> u8 {
        self.max_height
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
