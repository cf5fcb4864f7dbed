//! isomap - terrain geometry for isometric RTS map editors
//!
//! This crate re-exports the isomap engines under one name:
//! - [`core`] - grid, compass, tilesets and objects
//! - [`ramps`] - height propagation and ramp tile selection
//! - [`cliffs`] - cliff catalogs, chain search and stamping
//! - [`editor`] - undoable edit commands and engine settings (`editor` feature)

pub use isomap_cliffs as cliffs;
pub use isomap_core as core;
pub use isomap_ramps as ramps;

#[cfg(feature = "editor")]
pub use isomap_editor as editor;

/// Commonly used types
pub mod prelude {
    pub use isomap_cliffs::{CliffCatalog, CliffPath, CliffPathSearch, CliffSide, SearchLimits};
    pub use isomap_core::{CellCoord, Direction, Grid, GridAccess, TilesetResolver, TilesetTable};
    pub use isomap_ramps::{settle_terrain, RampClassifier, RampTilesets};

    #[cfg(feature = "editor")]
    pub use isomap_editor::{Brush, CommandHistory, EditContext, EngineConfig, MutationCommand};
}
