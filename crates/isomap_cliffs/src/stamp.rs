//! Writing a found chain onto the grid

use crate::catalog::{CliffCatalog, ResolvedTiles};
use crate::search::CliffPath;
use isomap_core::{CellCoord, GridAccess};
use rand::Rng;

/// Pick a variant index for a piece with `count` variants, avoiding
/// `previous` when there is a choice
pub fn choose_variant<R: Rng + ?Sized>(rng: &mut R, count: usize, previous: Option<usize>) -> usize {
    match (count, previous) {
        (0 | 1, _) => 0,
        (_, Some(previous)) if previous < count => {
            let pick = rng.gen_range(0..count - 1);
            if pick >= previous {
                pick + 1
            } else {
                pick
            }
        }
        _ => rng.gen_range(0..count),
    }
}

/// Stamp `path` from its destination back to its origin. Each footprint cell
/// gets the chosen variant's global tile and its footprint position as the
/// sub-tile. Returns the in-map cells that were written.
pub fn stamp_path<G, R>(
    grid: &mut G,
    catalog: &CliffCatalog,
    tiles: &ResolvedTiles,
    path: &CliffPath,
    rng: &mut R,
) -> Vec<CellCoord>
where
    G: GridAccess + ?Sized,
    R: Rng + ?Sized,
{
    let mut stamped = Vec::new();
    let mut previous: Option<(u32, usize)> = None;

    for placed in path.placements.iter().rev() {
        let Some(tile) = catalog.get(placed.tile) else {
            log::warn!("cliff tile {} is not in the catalog; skipping", placed.tile);
            continue;
        };
        let variants = tiles.variants(placed.tile);
        if variants.is_empty() {
            log::warn!("cliff tile {} has no resolved variants; skipping", placed.tile);
            continue;
        }

        let repeat = previous
            .filter(|(index, _)| *index == placed.tile)
            .map(|(_, variant)| variant);
        let variant = choose_variant(rng, variants.len(), repeat);
        let global = variants[variant];
        previous = Some((placed.tile, variant));

        for (sub_tile, coord) in tile.cells_at(placed.placement).enumerate() {
            if !grid.contains(coord) {
                continue;
            }
            grid.set_tile(coord, global, sub_tile as u8);
            stamped.push(coord);
        }
    }

    log::debug!(
        "stamped {} cliff pieces over {} cells",
        path.placements.len(),
        stamped.len()
    );
    stamped
}
