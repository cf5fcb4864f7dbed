//! Undo/redo command system

mod cliff;
mod command;
mod elevation;
mod objects;
mod ramp_repair;

pub use cliff::CliffCommand;
pub use command::{
    CellSnapshot, CommandHistory, MutationCommand, SnapshotRecorder, DEFAULT_MAX_DEPTH,
};
pub use elevation::{ElevationCommand, ElevationMode};
pub use objects::{PlaceObjectCommand, RemoveObjectsCommand};
pub use ramp_repair::RampRepairCommand;
