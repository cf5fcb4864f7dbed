//! Cliff chain search
//!
//! A weighted best-first search over partial chains. Each node is one placed
//! piece plus the connection point the chain leaves it through; children attach
//! another piece to that exit. Nodes keep their whole occupied set so footprints
//! within one chain never overlap. The search is greedy and deadline bounded:
//! when the destination cannot be reached in time, the chain that got closest
//! wins.

use crate::catalog::{CliffCatalog, CliffSide};
use isomap_core::{CellCoord, DirectionMask, GridAccess};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

/// Weight of the travelled distance in the search cost
pub const G_WEIGHT: f64 = 0.7;

/// Bounds on one search segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Give up once this long has passed without getting closer
    pub deadline: Duration,
    /// Hard cap on node expansions per segment
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(10),
            max_expansions: 100_000,
        }
    }
}

/// Why a segment stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Reached,
    Deadline,
    ExpansionCap,
    Exhausted,
}

/// One piece of a found chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedCliff {
    /// Catalog index of the piece
    pub tile: u32,
    /// Where the piece's origin lands
    pub placement: CellCoord,
    /// Connection point the chain enters through
    pub entry: u8,
    /// Absolute cell of the connection point the chain leaves through
    pub exit: CellCoord,
}

/// A chain of pieces in origin to destination order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliffPath {
    pub placements: Vec<PlacedCliff>,
    /// Whether every waypoint was reached exactly
    pub reached: bool,
}

impl CliffPath {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Exit cell of the last piece
    pub fn end(&self) -> Option<CellCoord> {
        self.placements.last().map(|p| p.exit)
    }

    /// Every cell covered by the chain, in placement order
    pub fn cells(&self, catalog: &CliffCatalog) -> Vec<CellCoord> {
        self.placements
            .iter()
            .filter_map(|p| catalog.get(p.tile).map(|tile| (p, tile)))
            .flat_map(|(p, tile)| tile.cells_at(p.placement).collect::<Vec<_>>())
            .collect()
    }
}

#[derive(Debug, Clone)]
struct SearchNode {
    /// Position of the piece in the catalog's tile list; `None` for a start node
    tile: Option<usize>,
    placement: CellCoord,
    entry: u8,
    exit: CellCoord,
    exit_mask: DirectionMask,
    side: CliffSide,
    occupied: HashSet<CellCoord>,
    parent: Option<usize>,
    g: f64,
    h: f64,
    f: f64,
}

/// Open set entry ordered so that `BinaryHeap` pops the lowest
/// (f, priority, insertion order) first
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    priority: i32,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Searches for cliff chains on one grid with one catalog
pub struct CliffPathSearch<'a, G: GridAccess + ?Sized> {
    catalog: &'a CliffCatalog,
    grid: &'a G,
    limits: SearchLimits,
    nodes: Vec<SearchNode>,
    seq: u64,
}

impl<'a, G: GridAccess + ?Sized> CliffPathSearch<'a, G> {
    pub fn new(catalog: &'a CliffCatalog, grid: &'a G, limits: SearchLimits) -> Self {
        Self {
            catalog,
            grid,
            limits,
            nodes: Vec::new(),
            seq: 0,
        }
    }

    /// Chain through every waypoint in order, starting on `side` of the cliff.
    ///
    /// Each leg is searched on its own. A later leg restarts from the last
    /// piece's parent so that piece can be re-planned toward the new waypoint.
    pub fn find_path(&mut self, waypoints: &[CellCoord], side: CliffSide) -> CliffPath {
        self.nodes.clear();
        self.seq = 0;

        let Some((first, rest)) = waypoints.split_first() else {
            return CliffPath::default();
        };
        if rest.is_empty() {
            return CliffPath::default();
        }

        self.nodes.push(SearchNode {
            tile: None,
            placement: *first,
            entry: 0,
            exit: *first,
            exit_mask: DirectionMask::ALL,
            side,
            occupied: HashSet::new(),
            parent: None,
            g: 0.0,
            h: 0.0,
            f: 0.0,
        });

        let mut current = 0;
        let mut end = 0;
        let mut reached = true;
        for (leg, destination) in rest.iter().enumerate() {
            if leg > 0 {
                current = match self.nodes[end].parent {
                    Some(parent) if self.nodes[parent].tile.is_some() => parent,
                    _ => end,
                };
            }
            let (found, outcome) = self.search_segment(current, *destination);
            log::debug!(
                "cliff leg {} to {}: {:?} after {} nodes",
                leg + 1,
                destination,
                outcome,
                self.nodes.len()
            );
            reached &= outcome == SearchOutcome::Reached;
            end = found;
        }

        CliffPath {
            placements: self.chain(end),
            reached,
        }
    }

    fn search_segment(&mut self, from: usize, destination: CellCoord) -> (usize, SearchOutcome) {
        {
            let start = &mut self.nodes[from];
            start.h = start.exit.distance(destination);
            start.f = G_WEIGHT * start.g + start.h;
        }

        let mut open = BinaryHeap::new();
        open.push(self.open_entry(from));

        let mut best = from;
        let mut best_h = self.nodes[from].h;
        let mut last_improvement = Instant::now();
        let mut expansions = 0;

        let outcome = loop {
            if best_h == 0.0 {
                break SearchOutcome::Reached;
            }
            let Some(entry) = open.pop() else {
                break SearchOutcome::Exhausted;
            };

            if self.nodes[entry.node].h < best_h {
                best = entry.node;
                best_h = self.nodes[entry.node].h;
                last_improvement = Instant::now();
                if best_h == 0.0 {
                    break SearchOutcome::Reached;
                }
            }
            if last_improvement.elapsed() >= self.limits.deadline {
                break SearchOutcome::Deadline;
            }
            if expansions >= self.limits.max_expansions {
                break SearchOutcome::ExpansionCap;
            }
            expansions += 1;

            for child in self.successors(entry.node, destination) {
                self.nodes.push(child);
                let index = self.nodes.len() - 1;
                open.push(self.open_entry(index));
            }
        };

        (best, outcome)
    }

    fn open_entry(&mut self, node: usize) -> OpenEntry {
        self.seq += 1;
        let priority = self.nodes[node]
            .tile
            .map(|t| self.catalog.tiles()[t].priority)
            .unwrap_or(0);
        OpenEntry {
            f: self.nodes[node].f,
            priority,
            seq: self.seq,
            node,
        }
    }

    /// Every piece that can attach to `node`'s exit
    fn successors(&self, node: usize, destination: CellCoord) -> Vec<SearchNode> {
        let current = &self.nodes[node];
        let previous = current.tile.map(|t| self.catalog.tiles()[t].index);
        let mut children = Vec::new();

        for (tile_pos, tile) in self.catalog.tiles().iter().enumerate() {
            for entry in &tile.points {
                if entry.side != current.side {
                    continue;
                }
                if let Some(previous) = previous {
                    if !entry.accepts_neighbor(previous) {
                        continue;
                    }
                }

                // A start node has no piece yet; the entry sits on the start cell
                let placements: Vec<CellCoord> = match current.tile {
                    None => vec![current.exit - entry.offset],
                    Some(_) => current
                        .exit_mask
                        .reversed()
                        .intersect(entry.mask)
                        .iter()
                        .map(|d| current.exit + d.opposite().offset() - entry.offset)
                        .collect(),
                };

                for placement in placements {
                    let fits = tile
                        .cells_at(placement)
                        .all(|c| self.grid.contains(c) && !current.occupied.contains(&c));
                    if !fits {
                        continue;
                    }

                    let exit_point = tile.other_point(entry.index);
                    let exit = placement + exit_point.offset;
                    let g = current.g + current.exit.distance(exit);
                    let h = exit.distance(destination);
                    let mut occupied = current.occupied.clone();
                    occupied.extend(tile.cells_at(placement));

                    children.push(SearchNode {
                        tile: Some(tile_pos),
                        placement,
                        entry: entry.index,
                        exit,
                        exit_mask: exit_point.mask,
                        side: exit_point.side,
                        occupied,
                        parent: Some(node),
                        g,
                        h,
                        f: G_WEIGHT * g + h + tile.distance_modifier,
                    });
                }
            }
        }

        children
    }

    /// Pieces from the root to `end`, origin first
    fn chain(&self, end: usize) -> Vec<PlacedCliff> {
        let mut placements = Vec::new();
        let mut cursor = Some(end);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if let Some(tile_pos) = node.tile {
                placements.push(PlacedCliff {
                    tile: self.catalog.tiles()[tile_pos].index,
                    placement: node.placement,
                    entry: node.entry,
                    exit: node.exit,
                });
            }
            cursor = node.parent;
        }
        placements.reverse();
        placements
    }
}
