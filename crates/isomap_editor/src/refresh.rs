//! Redraw notifications sent after edits

use isomap_core::CellCoord;

/// The part of the map a host should redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshArea {
    /// Every cell within `radius` steps (Chebyshev) of `center`
    Around { center: CellCoord, radius: u32 },
    /// Sent by whole-map edits, see [`crate::commands::RampRepairCommand::whole_map`]
    WholeMap,
}

impl RefreshArea {
    /// Smallest `Around` area centred on `center` that includes every cell in
    /// `cells`, plus one ring for neighbours whose ramps depend on them
    pub fn covering(center: CellCoord, cells: impl IntoIterator<Item = CellCoord>) -> Self {
        let radius = cells
            .into_iter()
            .map(|c| (c.x - center.x).unsigned_abs().max((c.y - center.y).unsigned_abs()))
            .max()
            .unwrap_or(0);
        RefreshArea::Around {
            center,
            radius: radius + 1,
        }
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        match self {
            RefreshArea::Around { center, radius } => {
                (coord.x - center.x).unsigned_abs() <= *radius
                    && (coord.y - center.y).unsigned_abs() <= *radius
            }
            RefreshArea::WholeMap => true,
        }
    }
}

/// Receives redraw requests; fire and forget
pub trait RefreshNotifier {
    fn refresh(&mut self, area: RefreshArea);
}

/// Drops every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl RefreshNotifier for NullNotifier {
    fn refresh(&mut self, _area: RefreshArea) {}
}

/// Keeps every notification, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub areas: Vec<RefreshArea>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<RefreshArea> {
        self.areas.last().copied()
    }
}

impl RefreshNotifier for RecordingNotifier {
    fn refresh(&mut self, area: RefreshArea) {
        self.areas.push(area);
    }
}
