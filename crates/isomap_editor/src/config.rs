//! Engine settings stored as TOML
//!
//! Every section and field falls back to its default, so a config file only
//! needs the values it changes:
//!
//! ```toml
//! [elevation]
//! max_height = 10
//!
//! [cliffs]
//! deadline_ms = 25
//! ```

use crate::commands::{CliffCommand, CommandHistory};
use isomap_cliffs::{CliffCatalog, CliffSide, SearchLimits};
use isomap_core::{CellCoord, Grid, DEFAULT_MAX_HEIGHT};
use isomap_ramps::{LatRamps, RampTilesets};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or saving engine settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSettings {
    /// Highest height level a cell may reach
    pub max_height: u8,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampSettings {
    pub ramp_tileset: String,
    pub clear_tileset: String,
    pub lat: Vec<LatRamps>,
}

impl Default for RampSettings {
    fn default() -> Self {
        let defaults = RampTilesets::default();
        Self {
            ramp_tileset: defaults.ramps,
            clear_tileset: defaults.clear,
            lat: defaults.lat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliffSettings {
    /// Milliseconds a search may go without getting closer
    pub deadline_ms: u64,
    pub max_expansions: usize,
    /// Seed for variant selection
    pub seed: u64,
}

impl Default for CliffSettings {
    fn default() -> Self {
        let limits = SearchLimits::default();
        Self {
            deadline_ms: limits.deadline.as_millis() as u64,
            max_expansions: limits.max_expansions,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: crate::commands::DEFAULT_MAX_DEPTH,
        }
    }
}

/// All tunable engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
#[serde(default)]
pub struct EngineConfig {
    pub elevation: ElevationSettings,
    pub ramps: RampSettings,
    pub cliffs: CliffSettings,
    pub history: HistorySettings,
}

impl EngineConfig {
    /// Parse and validate settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded engine settings from {}", path.display());
        Ok(config)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elevation.max_height == 0 {
            return Err(ConfigError::Invalid(
                "elevation.max_height must be at least 1".to_string(),
            ));
        }
        if self.ramps.ramp_tileset.is_empty() || self.ramps.clear_tileset.is_empty() {
            return Err(ConfigError::Invalid(
                "ramp and clear tileset names must not be empty".to_string(),
            ));
        }
        if let Some(lat) = self
            .ramps
            .lat
            .iter()
            .find(|l| l.ground.is_empty() || l.ramps.is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "LAT entry '{}' -> '{}' has an empty tileset name",
                lat.ground, lat.ramps
            )));
        }
        if self.cliffs.deadline_ms == 0 || self.cliffs.max_expansions == 0 {
            return Err(ConfigError::Invalid(
                "cliff search limits must be positive".to_string(),
            ));
        }
        if self.history.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "history.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            deadline: Duration::from_millis(self.cliffs.deadline_ms),
            max_expansions: self.cliffs.max_expansions,
        }
    }

    pub fn ramp_tilesets(&self) -> RampTilesets {
        RampTilesets {
            ramps: self.ramps.ramp_tileset.clone(),
            clear: self.ramps.clear_tileset.clone(),
            lat: self.ramps.lat.clone(),
        }
    }

    /// Empty grid honouring the configured height limit
    pub fn new_grid(&self, width: u32, height: u32, tile: u32) -> Grid {
        Grid::with_max_height(width, height, tile, self.elevation.max_height)
    }

    pub fn history(&self) -> CommandHistory {
        CommandHistory::with_max_depth(self.history.max_depth)
    }

    /// Cliff command using the configured seed and search limits
    pub fn cliff_command(
        &self,
        waypoints: Vec<CellCoord>,
        side: CliffSide,
        catalog: Arc<CliffCatalog>,
    ) -> CliffCommand {
        CliffCommand::new(waypoints, side, catalog, self.cliffs.seed)
            .with_limits(self.search_limits())
    }
}
