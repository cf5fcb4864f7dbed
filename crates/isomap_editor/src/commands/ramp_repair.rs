//! Re-run ramp classification under a brush without editing heights

use super::command::{CellSnapshot, MutationCommand, SnapshotRecorder};
use crate::brush::Brush;
use crate::context::EditContext;
use crate::refresh::RefreshArea;
use isomap_core::{CellCoord, GridAccess};
use isomap_ramps::{settle_terrain, RampClassifier};

#[derive(Debug, Clone, Copy)]
enum RepairScope {
    Brush { center: CellCoord, brush: Brush },
    WholeMap,
}

/// Fixes ramp tiles that were painted over or imported wrong
pub struct RampRepairCommand {
    scope: RepairScope,
    snapshot: CellSnapshot,
}

impl RampRepairCommand {
    pub fn new(center: CellCoord, brush: Brush) -> Self {
        Self {
            scope: RepairScope::Brush { center, brush },
            snapshot: CellSnapshot::default(),
        }
    }

    /// Repair every cell, e.g. after loading a map whose ramps were never classified
    pub fn whole_map() -> Self {
        Self {
            scope: RepairScope::WholeMap,
            snapshot: CellSnapshot::default(),
        }
    }

    fn cells<G: GridAccess + ?Sized>(&self, grid: &G) -> Vec<CellCoord> {
        match self.scope {
            RepairScope::Brush { center, brush } => brush.cells(center),
            RepairScope::WholeMap => {
                let (width, height) = grid.size();
                (0..height as i32)
                    .flat_map(|y| (0..width as i32).map(move |x| CellCoord::new(x, y)))
                    .collect()
            }
        }
    }

    fn refresh_area(&self) -> RefreshArea {
        match self.scope {
            RepairScope::Brush { center, .. } => {
                RefreshArea::covering(center, self.snapshot.cells())
            }
            RepairScope::WholeMap => RefreshArea::WholeMap,
        }
    }
}

impl MutationCommand for RampRepairCommand {
    fn perform(&mut self, ctx: &mut EditContext<'_>) {
        let cells = self.cells(&*ctx.grid);
        let mut recorder = SnapshotRecorder::new(&mut *ctx.grid);
        let classifier = RampClassifier::new(ctx.tilesets, ctx.ramps);

        let report = classifier.classify(&mut recorder, cells);
        // Fill rules may have raised cells; let their surroundings follow
        if !report.raised.is_empty() {
            settle_terrain(&mut recorder, &classifier, &report.raised, &[]);
        }
        self.snapshot = recorder.finish();

        log::debug!("ramp repair ({:?}): {} cells changed", self.scope, self.snapshot.len());
        if !self.snapshot.is_empty() {
            ctx.refresh(self.refresh_area());
        }
    }

    fn undo(&self, ctx: &mut EditContext<'_>) {
        self.snapshot.restore(&mut *ctx.grid);
        if !self.snapshot.is_empty() {
            ctx.refresh(self.refresh_area());
        }
    }

    fn description(&self) -> &str {
        "Repair Ramps"
    }

    fn has_effect(&self) -> bool {
        !self.snapshot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestMap;
    use isomap_core::{Direction, GridAccess};
    use isomap_ramps::RampShape;

    #[test]
    fn test_repair_restores_ramp_tiles() {
        let mut map = TestMap::flat(5, 5);
        // Heights edited without classification, e.g. by an import
        map.grid.set_height(CellCoord::new(2, 2), 1);
        let before = map.grid.clone();

        let mut command = RampRepairCommand::new(CellCoord::new(2, 2), Brush::square(3));
        command.perform(&mut map.ctx());

        assert!(command.has_effect());
        assert_eq!(
            Some(map.tile(3, 2)),
            map.ramp_tile(RampShape::Edge(Direction::West))
        );
        assert_eq!(map.height(2, 2), 1);

        command.undo(&mut map.ctx());
        assert_eq!(map.grid, before);
    }

    #[test]
    fn test_repair_on_correct_map_does_nothing() {
        let mut map = TestMap::flat(4, 4);
        let mut command = RampRepairCommand::new(CellCoord::new(1, 1), Brush::square(3));
        command.perform(&mut map.ctx());
        assert!(!command.has_effect());
    }

    #[test]
    fn test_repair_fills_one_cell_valley() {
        let mut map = TestMap::flat(3, 5);
        for x in 0..3 {
            map.grid.set_height(CellCoord::new(x, 1), 1);
            map.grid.set_height(CellCoord::new(x, 3), 1);
        }
        let before = map.grid.clone();

        let mut command = RampRepairCommand::new(CellCoord::new(1, 2), Brush::default());
        command.perform(&mut map.ctx());
        assert_eq!(map.height(1, 2), 1);

        command.undo(&mut map.ctx());
        assert_eq!(map.grid, before);
    }

    #[test]
    fn test_whole_map_repair_refreshes_everything() {
        let mut map = TestMap::flat(6, 6);
        map.grid.set_height(CellCoord::new(0, 3), 1);
        map.grid.set_height(CellCoord::new(5, 1), 1);
        let before = map.grid.clone();

        let mut command = RampRepairCommand::whole_map();
        command.perform(&mut map.ctx());

        assert!(command.has_effect());
        assert_eq!(Some(map.tile(1, 3)), map.ramp_tile(RampShape::Edge(Direction::West)));
        assert_eq!(Some(map.tile(4, 1)), map.ramp_tile(RampShape::Edge(Direction::East)));
        assert_eq!(map.notifier.last(), Some(RefreshArea::WholeMap));

        command.undo(&mut map.ctx());
        assert_eq!(map.grid, before);
        assert_eq!(map.notifier.areas, vec![RefreshArea::WholeMap; 2]);
    }

    #[test]
    fn test_whole_map_repair_of_clean_map_is_silent() {
        let mut map = TestMap::flat(6, 6);
        let mut command = RampRepairCommand::whole_map();
        command.perform(&mut map.ctx());
        assert!(!command.has_effect());
        assert!(map.notifier.areas.is_empty());
    }
}
