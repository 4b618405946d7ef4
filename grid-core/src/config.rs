//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::{GridError, GridResult};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: f32 = 300.0;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: f32 = 200.0;

/// Largest number of columns or rows a grid can have.
pub const MAX_TRACKS: u32 = 512;

/// How a pointer offset is mapped to a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Divide the canvas into equal columns and rows and index into them.
    #[default]
    Index,
    /// Pick the division whose rendered box center is closest to the pointer.
    NearestCenter,
}

/// Which neighbor a merge absorbs when several lie further along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborRule {
    /// The first candidate in store order.
    #[default]
    FirstInStoreOrder,
    /// The candidate with the smallest coordinate along the axis.
    Nearest,
}

/// Configuration for an [`Editor`](crate::Editor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Placement resolution strategy for drops.
    pub strategy: ResolutionStrategy,
    /// Neighbor selection for merges.
    pub neighbor_rule: NeighborRule,
    /// Pointer pixels per unit of row height while dragging a row handle.
    pub row_resize_scale: f32,
    /// Height of a row without an override.
    pub default_row_height: f32,
    /// Smallest height a row can be dragged to.
    pub min_row_height: f32,
    /// Width of a newly created canvas.
    pub default_width: f32,
    /// Height of a newly created canvas.
    pub default_height: f32,
    /// Largest column or row count a division count request may ask for.
    pub max_tracks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: ResolutionStrategy::Index,
            neighbor_rule: NeighborRule::FirstInStoreOrder,
            row_resize_scale: 10.0,
            default_row_height: 10.0,
            min_row_height: 1.0,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            max_tracks: MAX_TRACKS,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> GridResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every numeric setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> GridResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.row_resize_scale) {
            return Err(invalid("row_resize_scale", self.row_resize_scale));
        }
        if !positive(self.min_row_height) {
            return Err(invalid("min_row_height", self.min_row_height));
        }
        if !self.default_row_height.is_finite() || self.default_row_height < self.min_row_height {
            return Err(invalid("default_row_height", self.default_row_height));
        }
        if !positive(self.default_width) {
            return Err(invalid("default_width", self.default_width));
        }
        if !positive(self.default_height) {
            return Err(invalid("default_height", self.default_height));
        }
        if self.max_tracks == 0 || self.max_tracks > MAX_TRACKS {
            return Err(GridError::InvalidConfig(format!(
                "max_tracks must be between 1 and {MAX_TRACKS}, got {}",
                self.max_tracks
            )));
        }
        Ok(())
    }

    /// Set the resolution strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ResolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the merge neighbor rule.
    #[must_use]
    pub fn with_neighbor_rule(mut self, rule: NeighborRule) -> Self {
        self.neighbor_rule = rule;
        self
    }
}

fn invalid(field: &str, value: f32) -> GridError {
    GridError::InvalidConfig(format!("{field} is out of range: {value}"))
}
