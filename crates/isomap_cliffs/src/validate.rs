//! Catalog validation logic

use crate::{CatalogError, CliffCatalog, CliffTileDescriptor};
use std::collections::HashSet;

/// Check one entry on its own
pub fn validate_descriptor(descriptor: &CliffTileDescriptor) -> Result<(), CatalogError> {
    let index = descriptor.index;

    let mut point_indices: Vec<u8> = descriptor.connection_points.iter().map(|p| p.index).collect();
    point_indices.sort_unstable();
    if point_indices != [0, 1] {
        return Err(CatalogError::ConnectionPoints {
            index,
            found: descriptor.connection_points.iter().map(|p| p.index).collect(),
        });
    }

    for point in &descriptor.connection_points {
        if point.mask.is_empty() {
            return Err(CatalogError::EmptyMask {
                index,
                point: point.index,
            });
        }
        if let Some(other) = point.required.iter().find(|r| point.forbidden.contains(*r)) {
            return Err(CatalogError::ConflictingConstraint {
                index,
                other: *other,
            });
        }
    }

    if descriptor.footprint.is_empty() {
        return Err(CatalogError::EmptyFootprint { index });
    }
    let mut seen = HashSet::new();
    if let Some(offset) = descriptor.footprint.iter().find(|o| !seen.insert(**o)) {
        return Err(CatalogError::DuplicateFootprint {
            index,
            offset: *offset,
        });
    }

    if descriptor.variants.is_empty() {
        return Err(CatalogError::NoVariants { index });
    }
    let mut seen = HashSet::new();
    if let Some(variant) = descriptor.variants.iter().find(|v| !seen.insert(**v)) {
        return Err(CatalogError::DuplicateVariant {
            index,
            variant: *variant,
        });
    }

    if !descriptor.distance_modifier.is_finite() {
        return Err(CatalogError::InvalidDistanceModifier { index });
    }

    Ok(())
}

/// Check that neighbour constraints only name tiles in the catalog
pub fn validate_references(catalog: &CliffCatalog) -> Result<(), CatalogError> {
    for tile in catalog.tiles() {
        for point in &tile.points {
            let unknown = point
                .required
                .iter()
                .chain(point.forbidden.iter())
                .find(|other| catalog.get(**other).is_none());
            if let Some(other) = unknown {
                return Err(CatalogError::UnknownNeighbor {
                    index: tile.index,
                    other: *other,
                });
            }
        }
    }
    Ok(())
}
