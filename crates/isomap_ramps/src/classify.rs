//! Ramp tile classification
//!
//! Matches every touched cell's height neighbourhood against the ramp rules and
//! writes the matching ramp tile. Rules that ask for a height change raise the
//! cell and requeue its neighbourhood, so classification can itself move
//! terrain; [`settle_terrain`](crate::settle_terrain) feeds those changes back
//! through propagation.

use crate::rules::{find_rule, RampRule, RampShape, RAMP_RULES};
use isomap_core::{Cell, CellCoord, GridAccess, TilesetResolver};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// How many times one cell may change height during a single classification
/// before the rule table is assumed to oscillate
pub const MAX_HEIGHT_CHANGES_PER_CELL: u32 = 16;

/// A LAT ground tileset paired with its own ramp set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatRamps {
    /// Ground tileset painted on flat cells
    pub ground: String,
    /// Ramp tileset used when the ground slopes
    pub ramps: String,
}

/// Tileset names the classifier writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampTilesets {
    /// Default ramp tileset
    pub ramps: String,
    /// Default flat ground
    pub clear: String,
    /// Ground tilesets with dedicated ramps
    pub lat: Vec<LatRamps>,
}

impl Default for RampTilesets {
    fn default() -> Self {
        Self {
            ramps: "Ramps".to_string(),
            clear: "Clear".to_string(),
            lat: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Family<'a> {
    ground: &'a str,
    ramps: &'a str,
}

impl RampTilesets {
    /// Ground/ramp pair for a cell currently showing `tile`
    fn family_for<R: TilesetResolver + ?Sized>(&self, resolver: &R, tile: u32) -> Family<'_> {
        let owner = resolver.tileset_of(tile);
        self.lat
            .iter()
            .find(|pair| owner == Some(pair.ground.as_str()) || owner == Some(pair.ramps.as_str()))
            .map(|pair| Family {
                ground: &pair.ground,
                ramps: &pair.ramps,
            })
            .unwrap_or(Family {
                ground: &self.clear,
                ramps: &self.ramps,
            })
    }

    /// Whether `tile` belongs to any ramp tileset
    pub fn is_ramp_tile<R: TilesetResolver + ?Sized>(&self, resolver: &R, tile: u32) -> bool {
        resolver.contains(&self.ramps, tile)
            || self.lat.iter().any(|pair| resolver.contains(&pair.ramps, tile))
    }
}

/// Cells changed by one classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifyReport {
    /// Cells whose tile or sub-tile was rewritten
    pub retiled: Vec<CellCoord>,
    /// Cells a fill rule raised
    pub raised: Vec<CellCoord>,
}

impl ClassifyReport {
    pub fn is_empty(&self) -> bool {
        self.retiled.is_empty() && self.raised.is_empty()
    }

    pub fn merge(&mut self, other: ClassifyReport) {
        push_unique(&mut self.retiled, other.retiled);
        push_unique(&mut self.raised, other.raised);
    }
}

fn enqueue(queue: &mut VecDeque<CellCoord>, queued: &mut HashSet<CellCoord>, coord: CellCoord) {
    if queued.insert(coord) {
        queue.push_back(coord);
    }
}

fn push_unique(into: &mut Vec<CellCoord>, from: Vec<CellCoord>) {
    let mut seen: HashSet<CellCoord> = into.iter().copied().collect();
    into.extend(from.into_iter().filter(|c| seen.insert(*c)));
}

/// Heights of the 8 neighbours in compass order, `None` outside the map
pub fn neighborhood<G: GridAccess + ?Sized>(grid: &G, coord: CellCoord) -> [Option<u8>; 8] {
    coord.neighbors().map(|n| grid.height(n))
}

/// Picks ramp tiles for cells from their height neighbourhood
pub struct RampClassifier<'a, R: TilesetResolver + ?Sized> {
    rules: &'a [RampRule],
    resolver: &'a R,
    tilesets: &'a RampTilesets,
}

impl<'a, R: TilesetResolver + ?Sized> RampClassifier<'a, R> {
    /// Classifier using the standard rule table
    pub fn new(resolver: &'a R, tilesets: &'a RampTilesets) -> Self {
        Self::with_rules(&RAMP_RULES, resolver, tilesets)
    }

    pub fn with_rules(rules: &'a [RampRule], resolver: &'a R, tilesets: &'a RampTilesets) -> Self {
        Self {
            rules,
            resolver,
            tilesets,
        }
    }

    pub fn tilesets(&self) -> &RampTilesets {
        self.tilesets
    }

    /// The rule matching a cell, without writing anything
    pub fn rule_at<G: GridAccess + ?Sized>(&self, grid: &G, coord: CellCoord) -> Option<&'a RampRule> {
        let height = grid.height(coord)?;
        find_rule(self.rules, height, &neighborhood(grid, coord))
    }

    /// Classify `cells` and their immediate neighbours
    pub fn classify<G: GridAccess + ?Sized>(
        &self,
        grid: &mut G,
        cells: impl IntoIterator<Item = CellCoord>,
    ) -> ClassifyReport {
        let mut report = ClassifyReport::default();
        let mut queue = VecDeque::new();
        let mut queued = HashSet::new();
        let mut height_changes: HashMap<CellCoord, u32> = HashMap::new();

        for coord in cells {
            enqueue(&mut queue, &mut queued, coord);
            for n in coord.neighbors() {
                enqueue(&mut queue, &mut queued, n);
            }
        }

        while let Some(coord) = queue.pop_front() {
            queued.remove(&coord);
            let Some(cell) = grid.cell(coord) else {
                continue;
            };
            let Some(rule) = find_rule(self.rules, cell.height, &neighborhood(&*grid, coord)) else {
                continue;
            };

            if rule.height_delta != 0 {
                let changes = height_changes.entry(coord).or_insert(0);
                *changes += 1;
                if *changes > MAX_HEIGHT_CHANGES_PER_CELL {
                    log::warn!(
                        "ramp rules keep moving cell {} (height {}); leaving it",
                        coord,
                        cell.height
                    );
                } else {
                    let target = (cell.height as i32 + rule.height_delta as i32)
                        .clamp(0, grid.max_height() as i32) as u8;
                    if target != cell.height {
                        grid.set_height(coord, target);
                        push_unique(&mut report.raised, vec![coord]);
                        enqueue(&mut queue, &mut queued, coord);
                        for n in coord.neighbors() {
                            enqueue(&mut queue, &mut queued, n);
                        }
                        continue;
                    }
                }
            }

            self.apply_tile(grid, cell, rule.shape, &mut report);
        }

        log::debug!(
            "classified ramps: {} retiled, {} raised",
            report.retiled.len(),
            report.raised.len()
        );
        report
    }

    fn apply_tile<G: GridAccess + ?Sized>(
        &self,
        grid: &mut G,
        cell: Cell,
        shape: Option<RampShape>,
        report: &mut ClassifyReport,
    ) {
        let family = self.tilesets.family_for(self.resolver, cell.tile);

        let tile = match shape {
            Some(shape) => {
                let tile = self
                    .resolver
                    .range(family.ramps)
                    .and_then(|range| range.global(shape.ordinal()));
                let Some(tile) = tile else {
                    log::warn!("tileset '{}' has no tile for {:?}", family.ramps, shape);
                    return;
                };
                tile
            }
            // Flat cells keep whatever the user painted unless they still show a ramp
            None if self.tilesets.is_ramp_tile(self.resolver, cell.tile) => {
                let Some(range) = self.resolver.range(family.ground) else {
                    log::warn!("ground tileset '{}' is missing", family.ground);
                    return;
                };
                range.start
            }
            None => return,
        };

        if cell.tile != tile || cell.sub_tile != 0 {
            grid.set_tile(cell.coord, tile, 0);
            if !report.retiled.contains(&cell.coord) {
                report.retiled.push(cell.coord);
            }
        }
    }
}
