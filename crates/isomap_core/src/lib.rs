//! Core data structures for isomap
//!
//! This crate provides the fundamental types shared by the terrain engines:
//! - `CellCoord`, `Direction`, `DirectionMask` - grid coordinates and the 8-way compass
//! - `Cell`, `CellState` - one grid position with tile identity and height
//! - `GridAccess`, `Grid` - the accessor contract and the in-memory cell arena
//! - `TilesetResolver`, `TilesetTable` - symbolic tileset names to global tile indices
//! - `MapObject`, `ObjectTable` - placeable objects held in per-kind side tables

mod coord;
mod grid;
mod object;
mod tileset;

pub use coord::{CellCoord, Direction, DirectionMask};
pub use grid::{Cell, CellState, Grid, GridAccess, DEFAULT_MAX_HEIGHT};
pub use object::{MapObject, ObjectKind, ObjectTable};
pub use tileset::{TileRange, TilesetResolver, TilesetTable};
