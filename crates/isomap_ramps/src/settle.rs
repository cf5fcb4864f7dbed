//! Propagation and classification run together until the terrain stops moving

use crate::classify::{ClassifyReport, RampClassifier};
use crate::propagate::{propagate, propagate_flatten, EditDirection, PropagationReport};
use isomap_core::{CellCoord, GridAccess, TilesetResolver};

/// Upper bound on propagate/classify rounds for one edit
pub const MAX_SETTLE_ROUNDS: usize = 8;

/// Everything one settle touched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettleReport {
    pub propagation: PropagationReport,
    pub classification: ClassifyReport,
    pub rounds: usize,
}

impl SettleReport {
    /// Every cell whose height or tile may have changed
    pub fn touched(&self) -> Vec<CellCoord> {
        let mut cells = self.propagation.dirty.clone();
        for coord in self
            .classification
            .retiled
            .iter()
            .chain(self.classification.raised.iter())
        {
            if !cells.contains(coord) {
                cells.push(*coord);
            }
        }
        cells
    }
}

/// Propagate an edit's height changes and retile the affected area.
///
/// `raised` and `lowered` are the cells the edit itself moved up and down.
/// Cells the ramp rules raise are fed back through raise propagation, and the
/// loop stops once a classification pass raises nothing.
pub fn settle_terrain<G, R>(
    grid: &mut G,
    classifier: &RampClassifier<'_, R>,
    raised: &[CellCoord],
    lowered: &[CellCoord],
) -> SettleReport
where
    G: GridAccess + ?Sized,
    R: TilesetResolver + ?Sized,
{
    let mut propagation = propagate_flatten(grid, raised, lowered);
    let mut classification = classifier.classify(grid, propagation.dirty.iter().copied());
    let mut pending = classification.raised.clone();
    let mut rounds = 1;

    while !pending.is_empty() {
        if rounds >= MAX_SETTLE_ROUNDS {
            log::warn!(
                "terrain still moving after {} rounds; {} cells left unsettled",
                rounds,
                pending.len()
            );
            break;
        }
        let extra = propagate(grid, &pending, EditDirection::Raise);
        let more = classifier.classify(grid, extra.dirty.iter().copied());
        pending = more.raised.clone();
        propagation.merge(extra);
        classification.merge(more);
        rounds += 1;
    }

    SettleReport {
        propagation,
        classification,
        rounds,
    }
}
