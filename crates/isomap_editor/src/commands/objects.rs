//! Object placement and removal commands

use super::command::MutationCommand;
use crate::brush::Brush;
use crate::context::EditContext;
use crate::refresh::RefreshArea;
use isomap_core::{CellCoord, MapObject, ObjectKind};
use uuid::Uuid;

/// Command for placing one object on a cell
pub struct PlaceObjectCommand {
    coord: CellCoord,
    object: MapObject,
    /// Id given on the first perform; redo reuses it
    id: Option<Uuid>,
    placed: bool,
}

impl PlaceObjectCommand {
    pub fn new(coord: CellCoord, object: MapObject) -> Self {
        Self {
            coord,
            object,
            id: None,
            placed: false,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }
}

impl MutationCommand for PlaceObjectCommand {
    fn perform(&mut self, ctx: &mut EditContext<'_>) {
        if !ctx.grid.contains(self.coord) {
            self.placed = false;
            return;
        }
        self.placed = match self.id {
            Some(id) => ctx.objects.place_with_id(id, self.coord, self.object.clone()),
            None => match ctx.objects.place(self.coord, self.object.clone()) {
                Some(id) => {
                    self.id = Some(id);
                    true
                }
                None => false,
            },
        };
        if self.placed {
            ctx.refresh(RefreshArea::Around {
                center: self.coord,
                radius: 1,
            });
        } else {
            log::debug!("cannot place {:?} at {}", self.object.kind(), self.coord);
        }
    }

    fn undo(&self, ctx: &mut EditContext<'_>) {
        if !self.placed {
            return;
        }
        if let Some(id) = self.id {
            ctx.objects.remove(id);
            ctx.refresh(RefreshArea::Around {
                center: self.coord,
                radius: 1,
            });
        }
    }

    fn description(&self) -> &str {
        "Place Object"
    }

    fn has_effect(&self) -> bool {
        self.placed
    }
}

/// Command for clearing objects under a brush, optionally of one kind only
pub struct RemoveObjectsCommand {
    center: CellCoord,
    brush: Brush,
    kind: Option<ObjectKind>,
    removed: Vec<(Uuid, CellCoord, MapObject)>,
}

impl RemoveObjectsCommand {
    pub fn new(center: CellCoord, brush: Brush, kind: Option<ObjectKind>) -> Self {
        Self {
            center,
            brush,
            kind,
            removed: Vec::new(),
        }
    }

    pub fn removed(&self) -> &[(Uuid, CellCoord, MapObject)] {
        &self.removed
    }

    fn refresh_area(&self) -> RefreshArea {
        RefreshArea::Around {
            center: self.center,
            radius: self.brush.reach() + 1,
        }
    }
}

impl MutationCommand for RemoveObjectsCommand {
    fn perform(&mut self, ctx: &mut EditContext<'_>) {
        self.removed.clear();
        for coord in self.brush.cells(self.center) {
            let ids = match self.kind {
                Some(kind) => ctx.objects.ids_at(coord, kind).to_vec(),
                None => ctx.objects.all_at(coord),
            };
            for id in ids {
                if let Some((at, object)) = ctx.objects.remove(id) {
                    self.removed.push((id, at, object));
                }
            }
        }
        if !self.removed.is_empty() {
            ctx.refresh(self.refresh_area());
        }
    }

    fn undo(&self, ctx: &mut EditContext<'_>) {
        for (id, coord, object) in self.removed.iter().rev() {
            if !ctx.objects.place_with_id(*id, *coord, object.clone()) {
                log::warn!("could not restore {:?} at {}", object.kind(), coord);
            }
        }
        if !self.removed.is_empty() {
            ctx.refresh(self.refresh_area());
        }
    }

    fn description(&self) -> &str {
        "Remove Objects"
    }

    fn has_effect(&self) -> bool {
        !self.removed.is_empty()
    }
}
