//! isomap_editor - reversible terrain edits for isomap
//!
//! This crate wraps the terrain engines in undoable commands:
//! - Raise, lower and flatten under a brush, with ramp repair around the edit
//! - Cliff drawing through waypoints
//! - Object placement and removal
//! - Bounded undo/redo history
//! - Engine settings loaded from TOML
//!
//! Commands never hold on to the map. Each perform or undo receives an
//! [`EditContext`] with exclusive access to the grid, the object table and the
//! host's redraw notifier.
//!
//! # Usage
//!
//! ```rust,ignore
//! use isomap_editor::commands::{ElevationCommand, ElevationMode};
//! use isomap_editor::{Brush, EditContext, EngineConfig, NullNotifier};
//!
//! let config = EngineConfig::load(Path::new("isomap.toml"))?;
//! let mut grid = config.new_grid(64, 64, 0);
//! let mut history = config.history();
//! let ramps = config.ramp_tilesets();
//!
//! let mut notifier = NullNotifier;
//! let mut ctx = EditContext::new(&mut grid, &tilesets, &mut objects, &ramps, &mut notifier);
//! let raise = ElevationCommand::new(cursor, Brush::square(3), ElevationMode::Raise);
//! history.execute(Box::new(raise), &mut ctx);
//! history.undo(&mut ctx);
//! ```

pub mod brush;
pub mod commands;
pub mod config;
pub mod context;
pub mod refresh;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
pub(crate) mod testing;

pub use brush::Brush;
pub use commands::{CommandHistory, MutationCommand};
pub use config::{ConfigError, EngineConfig};
pub use context::EditContext;
pub use refresh::{NullNotifier, RecordingNotifier, RefreshArea, RefreshNotifier};

// Re-export the engine crates
pub use isomap_cliffs;
pub use isomap_core;
pub use isomap_ramps;
