//! Draw a chain of cliff pieces through waypoints

use super::command::{CellSnapshot, MutationCommand, SnapshotRecorder};
use crate::context::EditContext;
use crate::refresh::RefreshArea;
use isomap_cliffs::{stamp_path, CliffCatalog, CliffPath, CliffPathSearch, CliffSide, SearchLimits};
use isomap_core::{CellCoord, MapObject, ObjectKind};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use uuid::Uuid;

pub struct CliffCommand {
    waypoints: Vec<CellCoord>,
    side: CliffSide,
    catalog: Arc<CliffCatalog>,
    seed: u64,
    limits: SearchLimits,
    /// Chain found on the first perform; redo stamps the same chain
    path: Option<CliffPath>,
    snapshot: CellSnapshot,
    /// Objects the restamp cleared, in removal order
    removed: Vec<(Uuid, CellCoord, MapObject)>,
}

impl CliffCommand {
    pub fn new(waypoints: Vec<CellCoord>, side: CliffSide, catalog: Arc<CliffCatalog>, seed: u64) -> Self {
        Self {
            waypoints,
            side,
            catalog,
            seed,
            limits: SearchLimits::default(),
            path: None,
            snapshot: CellSnapshot::default(),
            removed: Vec::new(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// The chain placed by the last perform
    pub fn path(&self) -> Option<&CliffPath> {
        self.path.as_ref()
    }

    fn refresh_area(&self) -> RefreshArea {
        let center = self.waypoints.first().copied().unwrap_or(CellCoord::ZERO);
        RefreshArea::covering(
            center,
            self.snapshot
                .cells()
                .chain(self.removed.iter().map(|(_, coord, _)| *coord))
                .collect::<Vec<_>>(),
        )
    }
}

impl MutationCommand for CliffCommand {
    fn perform(&mut self, ctx: &mut EditContext<'_>) {
        self.snapshot = CellSnapshot::default();
        self.removed.clear();

        let tiles = match self.catalog.resolve(ctx.tilesets) {
            Ok(tiles) => tiles,
            Err(err) => {
                log::warn!("cannot draw cliff: {err}");
                return;
            }
        };

        let path = match self.path.clone() {
            Some(path) => path,
            None => {
                let path = CliffPathSearch::new(&self.catalog, &*ctx.grid, self.limits)
                    .find_path(&self.waypoints, self.side);
                self.path = Some(path.clone());
                path
            }
        };
        if path.is_empty() {
            log::debug!("no cliff piece fits between {:?}", self.waypoints);
            return;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut recorder = SnapshotRecorder::new(&mut *ctx.grid);
        let stamped = stamp_path(&mut recorder, &self.catalog, &tiles, &path, &mut rng);
        self.snapshot = recorder.finish();

        // Decals and overlays do not survive a new tile underneath
        for coord in &stamped {
            for kind in ObjectKind::ALL.into_iter().filter(|k| k.cleared_by_restamp()) {
                for id in ctx.objects.ids_at(*coord, kind).to_vec() {
                    if let Some((at, object)) = ctx.objects.remove(id) {
                        self.removed.push((id, at, object));
                    }
                }
            }
        }

        log::debug!(
            "cliff with {} pieces ({}), {} cells changed, {} objects cleared",
            path.len(),
            if path.reached { "reached" } else { "partial" },
            self.snapshot.len(),
            self.removed.len()
        );
        if self.has_effect() {
            ctx.refresh(self.refresh_area());
        }
    }

    fn undo(&self, ctx: &mut EditContext<'_>) {
        self.snapshot.restore(&mut *ctx.grid);
        for (id, coord, object) in self.removed.iter().rev() {
            if !ctx.objects.place_with_id(*id, *coord, object.clone()) {
                log::warn!("could not restore {:?} at {}", object.kind(), coord);
            }
        }
        if self.has_effect() {
            ctx.refresh(self.refresh_area());
        }
    }

    fn description(&self) -> &str {
        "Draw Cliff"
    }

    fn has_effect(&self) -> bool {
        !self.snapshot.is_empty() || !self.removed.is_empty()
    }
}
