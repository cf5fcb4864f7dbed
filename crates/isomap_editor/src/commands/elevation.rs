//! Raise, lower and flatten terrain under a brush

use super::command::{CellSnapshot, MutationCommand, SnapshotRecorder};
use crate::brush::Brush;
use crate::context::EditContext;
use crate::refresh::RefreshArea;
use isomap_core::{CellCoord, GridAccess};
use isomap_ramps::{settle_terrain, RampClassifier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElevationMode {
    Raise,
    Lower,
    /// Level every brushed cell to the height under the cursor
    Flatten,
}

/// One brush stroke of height editing, with ramp repair around it
pub struct ElevationCommand {
    center: CellCoord,
    brush: Brush,
    mode: ElevationMode,
    /// Levels to move per stroke for raise and lower
    amount: u8,
    /// Flatten level, taken from the cursor cell on the first perform
    level: Option<u8>,
    snapshot: CellSnapshot,
    description: String,
}

impl ElevationCommand {
    pub fn new(center: CellCoord, brush: Brush, mode: ElevationMode) -> Self {
        let description = match mode {
            ElevationMode::Raise => "Raise Terrain",
            ElevationMode::Lower => "Lower Terrain",
            ElevationMode::Flatten => "Flatten Terrain",
        };
        Self {
            center,
            brush,
            mode,
            amount: 1,
            level: None,
            snapshot: CellSnapshot::default(),
            description: description.to_string(),
        }
    }

    /// Raise or lower by `amount` levels instead of one
    pub fn with_amount(mut self, amount: u8) -> Self {
        self.amount = amount.max(1);
        self
    }

    /// Flatten to a fixed level instead of the cursor cell's height
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn snapshot(&self) -> &CellSnapshot {
        &self.snapshot
    }
}

impl MutationCommand for ElevationCommand {
    fn perform(&mut self, ctx: &mut EditContext<'_>) {
        let mut recorder = SnapshotRecorder::new(&mut *ctx.grid);
        let max = recorder.max_height();

        let level = match self.mode {
            ElevationMode::Flatten => {
                let Some(level) = self.level.or_else(|| recorder.height(self.center)) else {
                    self.snapshot = CellSnapshot::default();
                    return;
                };
                self.level = Some(level);
                level.min(max)
            }
            ElevationMode::Raise | ElevationMode::Lower => 0,
        };

        let mut raised = Vec::new();
        let mut lowered = Vec::new();
        for coord in self.brush.cells(self.center) {
            let Some(height) = recorder.height(coord) else {
                continue;
            };
            let target = match self.mode {
                ElevationMode::Raise => height.saturating_add(self.amount).min(max),
                ElevationMode::Lower => height.saturating_sub(self.amount),
                ElevationMode::Flatten => level,
            };
            if target > height {
                raised.push(coord);
            } else if target < height {
                lowered.push(coord);
            } else {
                continue;
            }
            recorder.set_height(coord, target);
        }

        let classifier = RampClassifier::new(ctx.tilesets, ctx.ramps);
        let report = settle_terrain(&mut recorder, &classifier, &raised, &lowered);
        self.snapshot = recorder.finish();

        log::debug!(
            "{} at {}: {} brushed, {} touched, {} cells changed",
            self.description,
            self.center,
            raised.len() + lowered.len(),
            report.touched().len(),
            self.snapshot.len()
        );

        if !self.snapshot.is_empty() {
            ctx.refresh(RefreshArea::covering(self.center, self.snapshot.cells()));
        }
    }

    fn undo(&self, ctx: &mut EditContext<'_>) {
        self.snapshot.restore(&mut *ctx.grid);
        if !self.snapshot.is_empty() {
            ctx.refresh(RefreshArea::covering(self.center, self.snapshot.cells()));
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn has_effect(&self) -> bool {
        !self.snapshot.is_empty()
    }
}
