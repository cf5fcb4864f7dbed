//! Placeable map objects stored beside the cell arena
//!
//! Cells never hold references to the objects standing on them. Objects live in
//! an arena keyed by id, and each object kind keeps a side table from cell
//! coordinate to the ids placed there. Undo can therefore restore cells and
//! objects independently without leaving dangling references.

use crate::coord::CellCoord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The object kinds that take part in placement and removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MapObject {
    /// Walls, ore, bridges and other overlay pieces
    Overlay { overlay_type: String, frame: u8 },
    /// Decorative ground decal
    Smudge { smudge_type: String },
    /// Trees, rocks and other static terrain objects
    TerrainObject { type_name: String },
    /// Numbered script waypoint
    Waypoint { number: u32 },
}

/// Discriminant of [`MapObject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Overlay,
    Smudge,
    TerrainObject,
    Waypoint,
}

impl MapObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            MapObject::Overlay { .. } => ObjectKind::Overlay,
            MapObject::Smudge { .. } => ObjectKind::Smudge,
            MapObject::TerrainObject { .. } => ObjectKind::TerrainObject,
            MapObject::Waypoint { .. } => ObjectKind::Waypoint,
        }
    }
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Overlay,
        ObjectKind::Smudge,
        ObjectKind::TerrainObject,
        ObjectKind::Waypoint,
    ];

    /// How many objects of this kind one cell can hold
    pub fn max_per_cell(self) -> usize {
        match self {
            ObjectKind::Overlay
            | ObjectKind::Smudge
            | ObjectKind::TerrainObject
            | ObjectKind::Waypoint => 1,
        }
    }

    /// Whether terrain edits that restamp a cell's tile also clear objects of this kind
    pub fn cleared_by_restamp(self) -> bool {
        match self {
            ObjectKind::Smudge | ObjectKind::Overlay => true,
            ObjectKind::TerrainObject | ObjectKind::Waypoint => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PlacedObject {
    coord: CellCoord,
    object: MapObject,
}

/// Object arena plus per-kind side tables
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    objects: HashMap<Uuid, PlacedObject>,
    by_cell: HashMap<ObjectKind, HashMap<CellCoord, Vec<Uuid>>>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether `object` may be placed at `coord`
    pub fn can_place(&self, coord: CellCoord, object: &MapObject) -> bool {
        let kind = object.kind();
        let occupied = self.ids_at(coord, kind).len();
        if occupied >= kind.max_per_cell() {
            return false;
        }
        match object {
            // Waypoint numbers are unique across the map
            MapObject::Waypoint { number } => !self.objects.values().any(|p| {
                matches!(p.object, MapObject::Waypoint { number: n } if n == *number)
            }),
            MapObject::Overlay { .. } | MapObject::Smudge { .. } | MapObject::TerrainObject { .. } => {
                true
            }
        }
    }

    /// Place an object under a fresh id. Returns `None` if the cell cannot hold it.
    pub fn place(&mut self, coord: CellCoord, object: MapObject) -> Option<Uuid> {
        let id = Uuid::new_v4();
        self.place_with_id(id, coord, object).then_some(id)
    }

    /// Place an object under a known id (used when undo puts a removed object back)
    pub fn place_with_id(&mut self, id: Uuid, coord: CellCoord, object: MapObject) -> bool {
        if self.objects.contains_key(&id) || !self.can_place(coord, &object) {
            return false;
        }
        self.by_cell
            .entry(object.kind())
            .or_default()
            .entry(coord)
            .or_default()
            .push(id);
        self.objects.insert(id, PlacedObject { coord, object });
        true
    }

    /// Remove an object by id, returning where it stood and what it was
    pub fn remove(&mut self, id: Uuid) -> Option<(CellCoord, MapObject)> {
        let placed = self.objects.remove(&id)?;
        if let Some(table) = self.by_cell.get_mut(&placed.object.kind()) {
            if let Some(ids) = table.get_mut(&placed.coord) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    table.remove(&placed.coord);
                }
            }
        }
        Some((placed.coord, placed.object))
    }

    pub fn get(&self, id: Uuid) -> Option<(CellCoord, &MapObject)> {
        self.objects.get(&id).map(|p| (p.coord, &p.object))
    }

    /// Ids of one kind at a cell
    pub fn ids_at(&self, coord: CellCoord, kind: ObjectKind) -> &[Uuid] {
        self.by_cell
            .get(&kind)
            .and_then(|t| t.get(&coord))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ids of every kind at a cell
    pub fn all_at(&self, coord: CellCoord) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .by_cell
            .values()
            .filter_map(|t| t.get(&coord))
            .flatten()
            .copied()
            .collect();
        ids.sort();
        ids
    }
}
