//! Command pattern for undo/redo

use crate::context::EditContext;
use isomap_core::{Cell, CellCoord, CellState, GridAccess};
use std::collections::HashSet;

/// Default number of commands kept for undo
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// A reversible map edit
pub trait MutationCommand: Send + Sync {
    /// Apply the edit (do/redo). Redo starts from a fresh capture.
    fn perform(&mut self, ctx: &mut EditContext<'_>);
    /// Put back exactly what `perform` changed
    fn undo(&self, ctx: &mut EditContext<'_>);
    /// Get a description of the command
    fn description(&self) -> &str;
    /// Whether the last `perform` changed anything
    fn has_effect(&self) -> bool;
}

/// Prior state of every cell an edit touched, in first-touch order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSnapshot {
    entries: Vec<(CellCoord, CellState)>,
}

impl CellSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.entries.iter().map(|(coord, _)| *coord)
    }

    pub fn prior(&self, coord: CellCoord) -> Option<CellState> {
        self.entries
            .iter()
            .find(|(c, _)| *c == coord)
            .map(|(_, state)| *state)
    }

    /// Drop entries whose cell ended up unchanged
    pub fn retain_changed<G: GridAccess + ?Sized>(&mut self, grid: &G) {
        self.entries
            .retain(|(coord, prior)| grid.cell(*coord).map(|c| c.state()) != Some(*prior));
    }

    /// Write every captured state back, last touch first
    pub fn restore<G: GridAccess + ?Sized>(&self, grid: &mut G) {
        for (coord, state) in self.entries.iter().rev() {
            grid.set_state(*coord, *state);
        }
    }
}

/// Grid wrapper that captures each cell's state the first time it is written
pub struct SnapshotRecorder<'g, G: GridAccess + ?Sized> {
    grid: &'g mut G,
    snapshot: CellSnapshot,
    seen: HashSet<CellCoord>,
}

impl<'g, G: GridAccess + ?Sized> SnapshotRecorder<'g, G> {
    pub fn new(grid: &'g mut G) -> Self {
        Self {
            grid,
            snapshot: CellSnapshot::default(),
            seen: HashSet::new(),
        }
    }

    fn capture(&mut self, coord: CellCoord) {
        if self.seen.contains(&coord) {
            return;
        }
        if let Some(cell) = self.grid.cell(coord) {
            self.seen.insert(coord);
            self.snapshot.entries.push((coord, cell.state()));
        }
    }

    /// Finish recording. Entries for cells that ended up unchanged are dropped.
    pub fn finish(self) -> CellSnapshot {
        let mut snapshot = self.snapshot;
        snapshot.retain_changed(&*self.grid);
        snapshot
    }
}

impl<G: GridAccess + ?Sized> GridAccess for SnapshotRecorder<'_, G> {
    fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.grid.cell(coord)
    }

    fn set_tile(&mut self, coord: CellCoord, tile: u32, sub_tile: u8) {
        self.capture(coord);
        self.grid.set_tile(coord, tile, sub_tile);
    }

    fn set_height(&mut self, coord: CellCoord, height: u8) {
        self.capture(coord);
        self.grid.set_height(coord, height);
    }

    fn max_height(&self) -> u8 {
        self.grid.max_height()
    }

    fn size(&self) -> (u32, u32) {
        self.grid.size()
    }
}

/// Stores command history for undo/redo
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct CommandHistory {
    /// Stack of commands that have been executed
    undo_stack: Vec<Box<dyn MutationCommand>>,
    /// Stack of commands that have been undone
    redo_stack: Vec<Box<dyn MutationCommand>>,
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `max_depth` undo steps (at least one)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Perform a command and add it to history. Commands that changed nothing
    /// are dropped; returns whether the command was kept.
    pub fn execute(&mut self, mut command: Box<dyn MutationCommand>, ctx: &mut EditContext<'_>) -> bool {
        command.perform(ctx);
        if !command.has_effect() {
            log::debug!("'{}' changed nothing; not recorded", command.description());
            return false;
        }
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.max_depth {
            let overflow = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..overflow);
        }
        self.redo_stack.clear(); // Clear redo stack on new command
        true
    }

    /// Undo the last command
    pub fn undo(&mut self, ctx: &mut EditContext<'_>) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        command.undo(ctx);
        self.redo_stack.push(command);
        true
    }

    /// Redo the last undone command
    pub fn redo(&mut self, ctx: &mut EditContext<'_>) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        command.perform(ctx);
        self.undo_stack.push(command);
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of command to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get description of command to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestMap;
    use isomap_core::Grid;

    /// Sets one cell's tile; does nothing when `tile` is already there
    struct PaintCommand {
        coord: CellCoord,
        tile: u32,
        snapshot: CellSnapshot,
    }

    impl PaintCommand {
        fn boxed(x: i32, y: i32, tile: u32) -> Box<dyn MutationCommand> {
            Box::new(Self {
                coord: CellCoord::new(x, y),
                tile,
                snapshot: CellSnapshot::default(),
            })
        }
    }

    impl MutationCommand for PaintCommand {
        fn perform(&mut self, ctx: &mut EditContext<'_>) {
            let mut recorder = SnapshotRecorder::new(&mut *ctx.grid);
            recorder.set_tile(self.coord, self.tile, 0);
            self.snapshot = recorder.finish();
        }

        fn undo(&self, ctx: &mut EditContext<'_>) {
            self.snapshot.restore(&mut *ctx.grid);
        }

        fn description(&self) -> &str {
            "Paint"
        }

        fn has_effect(&self) -> bool {
            !self.snapshot.is_empty()
        }
    }

    #[test]
    fn test_recorder_keeps_first_touch() {
        let mut grid = Grid::new(3, 3, 0);
        let a = CellCoord::new(1, 1);
        let mut recorder = SnapshotRecorder::new(&mut grid);
        recorder.set_height(a, 2);
        recorder.set_height(a, 4);
        recorder.set_tile(a, 9, 1);
        recorder.set_tile(CellCoord::new(7, 7), 9, 0);
        let snapshot = recorder.finish();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.prior(a), Some(CellState::default()));

        snapshot.restore(&mut grid);
        assert_eq!(grid, Grid::new(3, 3, 0));
    }

    #[test]
    fn test_unchanged_cells_are_dropped() {
        let mut grid = Grid::new(2, 2, 5);
        let mut recorder = SnapshotRecorder::new(&mut grid);
        recorder.set_tile(CellCoord::new(0, 0), 5, 0);
        recorder.set_height(CellCoord::new(1, 0), 1);
        recorder.set_height(CellCoord::new(1, 0), 0);
        assert!(recorder.finish().is_empty());
    }

    #[test]
    fn test_history_undo_redo() {
        let mut map = TestMap::flat(4, 4);
        let mut history = CommandHistory::new();

        assert!(history.execute(PaintCommand::boxed(1, 1, 3), &mut map.ctx()));
        assert_eq!(map.tile(1, 1), 3);
        assert_eq!(history.undo_description(), Some("Paint"));

        assert!(history.undo(&mut map.ctx()));
        assert_eq!(map.tile(1, 1), 0);
        assert!(history.can_redo());

        assert!(history.redo(&mut map.ctx()));
        assert_eq!(map.tile(1, 1), 3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_skips_commands_without_effect() {
        let mut map = TestMap::flat(4, 4);
        let mut history = CommandHistory::new();

        assert!(!history.execute(PaintCommand::boxed(1, 1, 0), &mut map.ctx()));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut map = TestMap::flat(4, 4);
        let mut history = CommandHistory::new();

        history.execute(PaintCommand::boxed(0, 0, 1), &mut map.ctx());
        history.undo(&mut map.ctx());
        history.execute(PaintCommand::boxed(0, 1, 2), &mut map.ctx());

        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_history_depth_is_bounded() {
        let mut map = TestMap::flat(4, 4);
        let mut history = CommandHistory::with_max_depth(2);

        for tile in 1..=3 {
            history.execute(PaintCommand::boxed(0, 0, tile), &mut map.ctx());
        }
        assert_eq!(history.undo_len(), 2);

        history.undo(&mut map.ctx());
        history.undo(&mut map.ctx());
        assert!(!history.undo(&mut map.ctx()));
        // The first paint fell off the stack, so its tile stays
        assert_eq!(map.tile(0, 0), 1);
    }
}
