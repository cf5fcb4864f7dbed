//! Cliff tile catalog types

use crate::validate::{validate_descriptor, validate_references};
use crate::CatalogError;
use isomap_core::{CellCoord, DirectionMask, TilesetResolver};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which face of the cliff a chain is drawn along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CliffSide {
    #[default]
    Front,
    Back,
}

/// One end of a cliff piece, where the chain enters or leaves it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    /// 0 or 1
    pub index: u8,
    /// Position relative to the tile's placement coordinate
    pub offset: CellCoord,
    /// Directions the chain may continue toward from this point
    pub mask: DirectionMask,
    /// Catalog indices the neighbouring tile must be one of (empty = any)
    #[serde(default)]
    pub required: Vec<u32>,
    /// Catalog indices the neighbouring tile must not be
    #[serde(default)]
    pub forbidden: Vec<u32>,
    #[serde(default)]
    pub side: CliffSide,
}

impl ConnectionPoint {
    /// Whether this point may attach to a tile with catalog index `neighbor`
    pub fn accepts_neighbor(&self, neighbor: u32) -> bool {
        (self.required.is_empty() || self.required.contains(&neighbor))
            && !self.forbidden.contains(&neighbor)
    }
}

/// Serialized form of a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliffTileDescriptor {
    /// Unique catalog index
    pub index: u32,
    /// Tileset the variants are taken from
    pub tileset: String,
    /// Interchangeable tileset-local tile indices
    pub variants: Vec<u32>,
    pub connection_points: Vec<ConnectionPoint>,
    /// Cells covered by the piece; position in the list is the stamped sub-tile
    pub footprint: Vec<CellCoord>,
    /// Tie-breaker between equally good candidates (lower wins)
    #[serde(default)]
    pub priority: i32,
    /// Added to the search cost of every placement of this piece
    #[serde(default)]
    pub distance_modifier: f64,
}

/// Validated catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct CliffTile {
    pub index: u32,
    pub tileset: String,
    pub variants: Vec<u32>,
    /// Connection points, ordered by their index
    pub points: [ConnectionPoint; 2],
    pub footprint: Vec<CellCoord>,
    pub priority: i32,
    pub distance_modifier: f64,
}

impl CliffTile {
    /// The connection point opposite `point`
    pub fn other_point(&self, point: u8) -> &ConnectionPoint {
        &self.points[if point == 0 { 1 } else { 0 }]
    }

    pub fn point(&self, point: u8) -> &ConnectionPoint {
        &self.points[usize::from(point.min(1))]
    }

    /// Absolute footprint cells for a placement
    pub fn cells_at(&self, placement: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        self.footprint.iter().map(move |offset| placement + *offset)
    }
}

impl TryFrom<CliffTileDescriptor> for CliffTile {
    type Error = CatalogError;

    fn try_from(descriptor: CliffTileDescriptor) -> Result<Self, Self::Error> {
        validate_descriptor(&descriptor)?;

        let mut points = descriptor.connection_points;
        points.sort_by_key(|p| p.index);
        let points: [ConnectionPoint; 2] =
            points
                .try_into()
                .map_err(|points: Vec<ConnectionPoint>| CatalogError::ConnectionPoints {
                    index: descriptor.index,
                    found: points.iter().map(|p| p.index).collect(),
                })?;

        Ok(Self {
            index: descriptor.index,
            tileset: descriptor.tileset,
            variants: descriptor.variants,
            points,
            footprint: descriptor.footprint,
            priority: descriptor.priority,
            distance_modifier: descriptor.distance_modifier,
        })
    }
}

impl From<&CliffTile> for CliffTileDescriptor {
    fn from(tile: &CliffTile) -> Self {
        Self {
            index: tile.index,
            tileset: tile.tileset.clone(),
            variants: tile.variants.clone(),
            connection_points: tile.points.to_vec(),
            footprint: tile.footprint.clone(),
            priority: tile.priority,
            distance_modifier: tile.distance_modifier,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    tiles: Vec<CliffTileDescriptor>,
}

/// The set of cliff pieces available to the search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliffCatalog {
    tiles: Vec<CliffTile>,
    by_index: HashMap<u32, usize>,
}

impl CliffCatalog {
    /// Validate descriptors and build the catalog. Fails on the first bad entry.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = CliffTileDescriptor>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for descriptor in descriptors {
            let tile = CliffTile::try_from(descriptor)?;
            if catalog.by_index.contains_key(&tile.index) {
                return Err(CatalogError::DuplicateIndex { index: tile.index });
            }
            catalog.by_index.insert(tile.index, catalog.tiles.len());
            catalog.tiles.push(tile);
        }
        validate_references(&catalog)?;
        Ok(catalog)
    }

    /// Parse a `{ "tiles": [...] }` JSON document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let catalog = Self::from_descriptors(file.tiles)?;
        log::info!("loaded cliff catalog with {} tiles", catalog.len());
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            tiles: self.tiles.iter().map(CliffTileDescriptor::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn tiles(&self) -> &[CliffTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up a tile by catalog index
    pub fn get(&self, index: u32) -> Option<&CliffTile> {
        self.by_index.get(&index).map(|i| &self.tiles[*i])
    }

    /// Resolve every variant to a global tile index
    pub fn resolve<R: TilesetResolver + ?Sized>(
        &self,
        resolver: &R,
    ) -> Result<ResolvedTiles, CatalogError> {
        let mut globals = HashMap::new();
        for tile in &self.tiles {
            let range = resolver
                .range(&tile.tileset)
                .ok_or_else(|| CatalogError::UnknownTileset {
                    index: tile.index,
                    tileset: tile.tileset.clone(),
                })?;
            let resolved = tile
                .variants
                .iter()
                .map(|variant| {
                    range
                        .global(*variant)
                        .ok_or_else(|| CatalogError::VariantOutOfRange {
                            index: tile.index,
                            variant: *variant,
                            tileset: tile.tileset.clone(),
                            count: range.count,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            globals.insert(tile.index, resolved);
        }
        Ok(ResolvedTiles { globals })
    }
}

/// Global tile indices for every catalog variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTiles {
    globals: HashMap<u32, Vec<u32>>,
}

impl ResolvedTiles {
    /// Global indices of a tile's variants, in catalog order
    pub fn variants(&self, index: u32) -> &[u32] {
        self.globals.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::straight;
    use isomap_core::TilesetTable;

    #[test]
    fn test_points_are_ordered_by_index() {
        let mut descriptor = straight(1);
        descriptor.connection_points.reverse();
        let tile = CliffTile::try_from(descriptor).unwrap();
        assert_eq!(tile.points[0].index, 0);
        assert_eq!(tile.other_point(0).index, 1);
        assert_eq!(tile.other_point(1).index, 0);
    }

    #[test]
    fn test_lookup_by_index() {
        let catalog = CliffCatalog::from_descriptors([straight(7), straight(3)]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(3).map(|t| t.index), Some(3));
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_neighbor_constraints() {
        let mut point = straight(1).connection_points.remove(0);
        assert!(point.accepts_neighbor(9));
        point.required = vec![2, 3];
        assert!(point.accepts_neighbor(2));
        assert!(!point.accepts_neighbor(9));
        point.required.clear();
        point.forbidden = vec![9];
        assert!(!point.accepts_neighbor(9));
    }

    #[test]
    fn test_resolve_to_global_indices() {
        let table = TilesetTable::new().with("Clear", 4).with("Cliffs", 10);
        let catalog = CliffCatalog::from_descriptors([straight(1)]).unwrap();
        let resolved = catalog.resolve(&table).unwrap();
        assert_eq!(resolved.variants(1), &[4, 5]);
        assert!(resolved.variants(2).is_empty());
    }

    #[test]
    fn test_json_round_trip_keeps_catalog() {
        let catalog = CliffCatalog::from_descriptors([straight(1), straight(2)]).unwrap();
        let json = catalog.to_json().unwrap();
        let reloaded = CliffCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded, catalog);
    }
}
