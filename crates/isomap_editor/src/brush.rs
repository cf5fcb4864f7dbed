//! Rectangular edit brush

use isomap_core::CellCoord;
use serde::{Deserialize, Serialize};

/// An N×M block of cells centred on the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Brush {
    pub width: u32,
    pub height: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self::square(1)
    }
}

impl Brush {
    /// Sizes below 1 are raised to 1
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Cells under the brush in row-major order. Even sizes reach one cell
    /// further toward negative coordinates. Nothing is clipped to the map.
    pub fn cells(&self, center: CellCoord) -> Vec<CellCoord> {
        let left = center.x - (self.width / 2) as i32;
        let top = center.y - (self.height / 2) as i32;
        let mut cells = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in top..top + self.height as i32 {
            for x in left..left + self.width as i32 {
                cells.push(CellCoord::new(x, y));
            }
        }
        cells
    }

    /// Distance from the centre to the farthest brushed cell
    pub fn reach(&self) -> u32 {
        self.width.max(self.height) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_brush() {
        let cells = Brush::default().cells(CellCoord::new(4, 4));
        assert_eq!(cells, vec![CellCoord::new(4, 4)]);
    }

    #[test]
    fn test_odd_brush_is_centred() {
        let cells = Brush::square(3).cells(CellCoord::new(5, 5));
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&CellCoord::new(4, 4)));
        assert_eq!(cells.last(), Some(&CellCoord::new(6, 6)));
    }

    #[test]
    fn test_even_brush_extends_toward_negative() {
        let cells = Brush::new(2, 4).cells(CellCoord::new(0, 0));
        assert_eq!(cells.len(), 8);
        assert_eq!(cells.first(), Some(&CellCoord::new(-1, -2)));
        assert_eq!(cells.last(), Some(&CellCoord::new(0, 1)));
    }

    #[test]
    fn test_zero_size_becomes_one() {
        assert_eq!(Brush::new(0, 0), Brush::square(1));
    }

    #[test]
    fn test_long_brush_covers_every_cell() {
        let cells = Brush::new(1, 100_000).cells(CellCoord::new(0, 0));
        assert_eq!(cells.len(), 100_000);
        assert_eq!(cells.first(), Some(&CellCoord::new(0, -50_000)));
    }
}
