//! Height propagation
//!
//! After a brush changes some heights, neighbouring cells may sit more than one
//! level away from each other. The propagator walks outward from the edit with
//! a FIFO worklist and moves cells until every pair of edge-adjacent cells is at
//! most one level apart, then runs the height fixers: small pattern checks for
//! neighbourhoods that no ramp piece can render. Both passes repeat until
//! nothing changes. Raising only ever raises and lowering only ever lowers, so
//! the height range bounds the number of steps.

use isomap_core::{CellCoord, Direction, GridAccess};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Which way the edit moved the seed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditDirection {
    Raise,
    Lower,
}

/// Neighbourhood patterns the ramp tiles cannot express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightFixer {
    /// Both ends of a straight line through the cell are higher
    StraightPinch,
    /// A higher side next to a higher diagonal that no side supports
    DiagonalPinch,
    /// A diagonal too far above the cell for a steep ramp
    SteepOverflow,
}

/// Cells changed by a propagation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationReport {
    /// Seeds and every mutated cell, in first-touch order
    pub dirty: Vec<CellCoord>,
    /// Fixers applied, keyed by the cell they were detected on
    pub fixes: Vec<(CellCoord, HeightFixer)>,
}

impl PropagationReport {
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Append another report, keeping `dirty` free of duplicates
    pub fn merge(&mut self, other: PropagationReport) {
        let mut seen: HashSet<CellCoord> = self.dirty.iter().copied().collect();
        for coord in other.dirty {
            if seen.insert(coord) {
                self.dirty.push(coord);
            }
        }
        self.fixes.extend(other.fixes);
    }
}

struct Pinch {
    fixer: HeightFixer,
    /// The higher neighbours responsible for the pinch
    offenders: Vec<CellCoord>,
}

/// Restores the height invariant around a set of edited cells
pub struct ElevationPropagator<'g, G: GridAccess + ?Sized> {
    grid: &'g mut G,
    direction: EditDirection,
    queue: VecDeque<CellCoord>,
    queued: HashSet<CellCoord>,
    dirty: Vec<CellCoord>,
    dirty_set: HashSet<CellCoord>,
    fixes: Vec<(CellCoord, HeightFixer)>,
}

impl<'g, G: GridAccess + ?Sized> ElevationPropagator<'g, G> {
    pub fn new(grid: &'g mut G, direction: EditDirection) -> Self {
        Self {
            grid,
            direction,
            queue: VecDeque::new(),
            queued: HashSet::new(),
            dirty: Vec::new(),
            dirty_set: HashSet::new(),
            fixes: Vec::new(),
        }
    }

    /// Register cells whose height was just changed by the edit
    pub fn seed(&mut self, cells: impl IntoIterator<Item = CellCoord>) {
        for coord in cells {
            if !self.grid.contains(coord) {
                continue;
            }
            self.mark_dirty(coord);
            self.enqueue_cardinals(coord);
        }
    }

    /// Propagate to a fixed point
    pub fn run(mut self) -> PropagationReport {
        let seeds = self.dirty.len();
        loop {
            self.settle();
            if !self.apply_fixers() {
                break;
            }
        }

        log::debug!(
            "{:?} propagation: {} seeds, {} cells dirty, {} fixes",
            self.direction,
            seeds,
            self.dirty.len(),
            self.fixes.len()
        );

        PropagationReport {
            dirty: self.dirty,
            fixes: self.fixes,
        }
    }

    fn mark_dirty(&mut self, coord: CellCoord) {
        if self.dirty_set.insert(coord) {
            self.dirty.push(coord);
        }
    }

    fn enqueue_cardinals(&mut self, coord: CellCoord) {
        for neighbor in coord.cardinal_neighbors() {
            if self.grid.contains(neighbor) && self.queued.insert(neighbor) {
                self.queue.push_back(neighbor);
            }
        }
    }

    fn set_height(&mut self, coord: CellCoord, height: u8) {
        self.grid.set_height(coord, height);
        self.mark_dirty(coord);
        self.enqueue_cardinals(coord);
    }

    /// Cardinal pass: pull each queued cell to within one level of its neighbours
    fn settle(&mut self) {
        while let Some(coord) = self.queue.pop_front() {
            self.queued.remove(&coord);
            let Some(height) = self.grid.height(coord) else {
                continue;
            };
            let height = height as i32;
            let neighbors = coord
                .cardinal_neighbors()
                .into_iter()
                .filter_map(|n| self.grid.height(n))
                .map(i32::from);

            let target = match self.direction {
                EditDirection::Raise => match neighbors.max() {
                    Some(highest) if highest > height + 1 => highest - 1,
                    _ => continue,
                },
                EditDirection::Lower => match neighbors.min() {
                    Some(lowest) if lowest < height - 1 => lowest + 1,
                    _ => continue,
                },
            };
            self.set_height(coord, target as u8);
        }
    }

    /// One sweep of the height fixers over the dirty region. Returns whether any
    /// height changed.
    fn apply_fixers(&mut self) -> bool {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();
        for coord in &self.dirty {
            for c in std::iter::once(*coord).chain(coord.neighbors()) {
                if seen.insert(c) {
                    candidates.push(c);
                }
            }
        }

        // Cells moved in this sweep leave their neighbourhood unsettled until
        // the next cardinal pass; candidates next to them wait for the next sweep.
        let mut moved: HashSet<CellCoord> = HashSet::new();

        for coord in candidates {
            if moved.contains(&coord) || coord.neighbors().iter().any(|n| moved.contains(n)) {
                continue;
            }
            let Some(height) = self.grid.height(coord) else {
                continue;
            };
            let Some(pinch) = detect_pinch(&*self.grid, coord) else {
                continue;
            };

            let mut changed = false;
            match self.direction {
                EditDirection::Raise => {
                    if height < self.grid.max_height() {
                        self.set_height(coord, height + 1);
                        moved.insert(coord);
                        changed = true;
                    }
                }
                EditDirection::Lower => {
                    for offender in pinch.offenders {
                        if let Some(h) = self.grid.height(offender).filter(|h| *h > 0) {
                            self.set_height(offender, h - 1);
                            moved.insert(offender);
                            changed = true;
                        }
                    }
                }
            }

            if changed {
                log::trace!("{:?} at {} ({:?})", pinch.fixer, coord, self.direction);
                self.fixes.push((coord, pinch.fixer));
            }
        }

        !moved.is_empty()
    }
}

/// Find the first fixer pattern matching the cell's neighbourhood
fn detect_pinch<G: GridAccess + ?Sized>(grid: &G, coord: CellCoord) -> Option<Pinch> {
    let height = grid.height(coord)? as i32;
    let delta = |d: Direction| grid.height(coord.step(d)).map(|h| h as i32 - height);
    let higher = |d: Direction| delta(d).map_or(false, |x| x >= 1);

    let mut offenders = Vec::new();
    for (a, b) in [
        (Direction::North, Direction::South),
        (Direction::East, Direction::West),
    ] {
        if higher(a) && higher(b) {
            offenders.push(coord.step(a));
            offenders.push(coord.step(b));
        }
    }
    if !offenders.is_empty() {
        return Some(Pinch {
            fixer: HeightFixer::StraightPinch,
            offenders,
        });
    }

    if Direction::CARDINALS.into_iter().any(higher) {
        for d in Direction::DIAGONALS {
            let (left, right) = d.flanks();
            if higher(d) && !higher(left) && !higher(right) {
                offenders.push(coord.step(d));
            }
        }
        if !offenders.is_empty() {
            return Some(Pinch {
                fixer: HeightFixer::DiagonalPinch,
                offenders,
            });
        }
    }

    for d in Direction::DIAGONALS {
        let Some(rise) = delta(d) else {
            continue;
        };
        let (left, right) = d.flanks();
        let steep_ramp = delta(left) == Some(1) && delta(right) == Some(1);
        if rise >= 3 || (rise >= 2 && !steep_ramp) {
            offenders.push(coord.step(d));
        }
    }
    if !offenders.is_empty() {
        return Some(Pinch {
            fixer: HeightFixer::SteepOverflow,
            offenders,
        });
    }

    None
}

/// Propagate one edit direction from `seeds`
pub fn propagate<G: GridAccess + ?Sized>(
    grid: &mut G,
    seeds: &[CellCoord],
    direction: EditDirection,
) -> PropagationReport {
    if seeds.is_empty() {
        return PropagationReport::default();
    }
    let mut propagator = ElevationPropagator::new(grid, direction);
    propagator.seed(seeds.iter().copied());
    propagator.run()
}

/// Propagate a flatten edit: cells that went up raise their surroundings,
/// then cells that went down lower theirs
pub fn propagate_flatten<G: GridAccess + ?Sized>(
    grid: &mut G,
    raised: &[CellCoord],
    lowered: &[CellCoord],
) -> PropagationReport {
    let mut report = propagate(grid, raised, EditDirection::Raise);
    report.merge(propagate(grid, lowered, EditDirection::Lower));
    report
}

/// Whether every pair of edge-adjacent cells is at most one level apart
pub fn heights_settled<G: GridAccess + ?Sized>(
    grid: &G,
    cells: impl IntoIterator<Item = CellCoord>,
) -> bool {
    cells.into_iter().all(|coord| {
        let Some(height) = grid.height(coord) else {
            return true;
        };
        coord
            .cardinal_neighbors()
            .iter()
            .filter_map(|n| grid.height(*n))
            .all(|n| (n as i32 - height as i32).abs() <= 1)
    })
}
