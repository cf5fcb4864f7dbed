//! Tileset resolution: symbolic tileset names to contiguous global tile index ranges

use serde::{Deserialize, Serialize};

/// A contiguous run of global tile indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    /// First global index in the tileset
    pub start: u32,
    /// Number of tiles in the tileset
    pub count: u32,
}

impl TileRange {
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index - self.start < self.count
    }

    /// Global index of the `local`-th tile, if the tileset has that many
    pub fn global(&self, local: u32) -> Option<u32> {
        (local < self.count).then(|| self.start + local)
    }

    /// End of the range (exclusive)
    pub fn end(&self) -> u32 {
        self.start + self.count
    }
}

/// Looks up tilesets by name and answers membership queries
pub trait TilesetResolver {
    fn range(&self, name: &str) -> Option<TileRange>;

    /// Name of the tileset that owns a global tile index
    fn tileset_of(&self, index: u32) -> Option<&str>;

    /// Does global index `index` belong to tileset `name`
    fn contains(&self, name: &str, index: u32) -> bool {
        self.range(name).map(|r| r.contains(index)).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TilesetEntry {
    name: String,
    range: TileRange,
}

/// Ordered tileset table. Tilesets are laid out back to back in insertion
/// order, the way the game's tileset configuration numbers them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilesetTable {
    entries: Vec<TilesetEntry>,
}

impl TilesetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tileset; returns its range
    pub fn push(&mut self, name: impl Into<String>, count: u32) -> TileRange {
        let start = self.entries.last().map(|e| e.range.end()).unwrap_or(0);
        let range = TileRange { start, count };
        self.entries.push(TilesetEntry {
            name: name.into(),
            range,
        });
        range
    }

    /// Builder-style variant of [`push`](Self::push)
    pub fn with(mut self, name: impl Into<String>, count: u32) -> Self {
        self.push(name, count);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of global tile indices
    pub fn tile_count(&self) -> u32 {
        self.entries.last().map(|e| e.range.end()).unwrap_or(0)
    }
}

impl TilesetResolver for TilesetTable {
    fn range(&self, name: &str) -> Option<TileRange> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.range)
    }

    fn tileset_of(&self, index: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.range.contains(index))
            .map(|e| e.name.as_str())
    }
}
