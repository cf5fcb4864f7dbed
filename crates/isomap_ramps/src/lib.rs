//! Stepped terrain for isometric maps
//!
//! Cells carry an integer height level. Edits move some heights; this crate
//! repairs the surroundings so adjacent cells differ by at most one level and
//! every slope can be drawn with a ramp tile, then picks those ramp tiles.
//!
//! # Example
//!
//! ```rust,ignore
//! use isomap_core::{CellCoord, Grid, GridAccess, TilesetTable};
//! use isomap_ramps::{settle_terrain, RampClassifier, RampTilesets};
//!
//! let tiles = TilesetTable::new().with("Clear", 1).with("Ramps", 14);
//! let config = RampTilesets::default();
//! let classifier = RampClassifier::new(&tiles, &config);
//!
//! let mut grid = Grid::new(32, 32, 0);
//! let hill = CellCoord::new(10, 10);
//! grid.set_height(hill, 3);
//! settle_terrain(&mut grid, &classifier, &[hill], &[]);
//! ```

pub mod classify;
pub mod propagate;
pub mod rules;
pub mod settle;

pub use classify::{ClassifyReport, LatRamps, RampClassifier, RampTilesets};
pub use propagate::{
    heights_settled, propagate, propagate_flatten, EditDirection, ElevationPropagator, HeightFixer,
    PropagationReport,
};
pub use rules::{find_rule, HeightComparison, RampRule, RampShape, RAMP_RULES};
pub use settle::{settle_terrain, SettleReport};
