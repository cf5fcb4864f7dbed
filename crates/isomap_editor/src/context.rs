//! Everything a command may touch while it runs

use crate::refresh::{RefreshArea, RefreshNotifier};
use isomap_core::{GridAccess, ObjectTable, TilesetResolver};
use isomap_ramps::RampTilesets;

/// Exclusive access to the map for the duration of one perform or undo
pub struct EditContext<'a> {
    pub grid: &'a mut dyn GridAccess,
    pub tilesets: &'a dyn TilesetResolver,
    pub objects: &'a mut ObjectTable,
    pub ramps: &'a RampTilesets,
    pub notifier: &'a mut dyn RefreshNotifier,
}

impl<'a> EditContext<'a> {
    pub fn new(
        grid: &'a mut dyn GridAccess,
        tilesets: &'a dyn TilesetResolver,
        objects: &'a mut ObjectTable,
        ramps: &'a RampTilesets,
        notifier: &'a mut dyn RefreshNotifier,
    ) -> Self {
        Self {
            grid,
            tilesets,
            objects,
            ramps,
            notifier,
        }
    }

    pub fn refresh(&mut self, area: RefreshArea) {
        self.notifier.refresh(area);
    }
}
