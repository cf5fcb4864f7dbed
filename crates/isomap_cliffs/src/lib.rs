//! Cliff chains for isometric maps
//!
//! Cliffs are multi-cell tile pieces with two connection points. This crate
//! loads and validates the piece catalog, searches for a chain of pieces
//! linking two or more cells, and stamps a found chain onto the grid.
//!
//! # Example
//!
//! ```rust,ignore
//! use isomap_cliffs::{stamp_path, CliffCatalog, CliffPathSearch, CliffSide, SearchLimits};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let catalog = CliffCatalog::load(Path::new("cliffs.json"))?;
//! let tiles = catalog.resolve(&tilesets)?;
//!
//! let path = CliffPathSearch::new(&catalog, &grid, SearchLimits::default())
//!     .find_path(&[start, end], CliffSide::Front);
//! let mut rng = SmallRng::seed_from_u64(7);
//! stamp_path(&mut grid, &catalog, &tiles, &path, &mut rng);
//! ```

mod catalog;
#[cfg(test)]
mod fixtures;
mod search;
mod stamp;
mod validate;

pub use catalog::*;
pub use search::*;
pub use stamp::*;
pub use validate::*;

use isomap_core::CellCoord;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or resolving a cliff catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cliff tile {index}: expected connection points 0 and 1, found {found:?}")]
    ConnectionPoints { index: u32, found: Vec<u8> },
    #[error("cliff tile {index}: connection point {point} has an empty direction mask")]
    EmptyMask { index: u32, point: u8 },
    #[error("cliff tile {index}: empty footprint")]
    EmptyFootprint { index: u32 },
    #[error("cliff tile {index}: footprint repeats offset {offset}")]
    DuplicateFootprint { index: u32, offset: CellCoord },
    #[error("cliff tile {index}: no tile variants")]
    NoVariants { index: u32 },
    #[error("cliff tile {index}: variant {variant} is listed twice")]
    DuplicateVariant { index: u32, variant: u32 },
    #[error("cliff tile {index}: distance modifier must be finite")]
    InvalidDistanceModifier { index: u32 },
    #[error("cliff tile index {index} is used by more than one entry")]
    DuplicateIndex { index: u32 },
    #[error("cliff tile {index}: neighbour constraint names unknown tile {other}")]
    UnknownNeighbor { index: u32, other: u32 },
    #[error("cliff tile {index}: tile {other} is both required and forbidden")]
    ConflictingConstraint { index: u32, other: u32 },
    #[error("cliff tile {index}: unknown tileset '{tileset}'")]
    UnknownTileset { index: u32, tileset: String },
    #[error("cliff tile {index}: variant {variant} is outside tileset '{tileset}' ({count} tiles)")]
    VariantOutOfRange {
        index: u32,
        variant: u32,
        tileset: String,
        count: u32,
    },
}

impl CliffCatalog {
    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save a catalog to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
