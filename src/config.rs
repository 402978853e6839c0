//! Mesh configuration.
//!
//! All settings are fixed once a simulation is built. The struct
//! deserializes from a partial camelCase object so a JS host can override
//! only what it cares about.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for mesh construction and per-frame dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeshConfig {
    /// Subdivisions per axis; the mesh has (grid_count + 1)^2 nodes (default: 100).
    pub grid_count: i32,
    /// Extent along X (default: 800.0).
    pub width: f32,
    /// Extent along Y (default: 800.0).
    pub height: f32,
    /// Velocity kept after each step, in (0, 1] (default: 0.5).
    pub friction: f32,
    /// Force-to-acceleration scale (default: 0.35).
    pub force_multiplier: f32,
    /// Knife radius around the pointer (default: 10.0).
    pub knife_range: f32,
    /// Maximum velocity magnitude (default: 10.0).
    pub speed_limit: f32,
    /// Idle time before cuts start reverting, in milliseconds (default: 3000).
    pub idle_threshold_ms: f64,
    /// Side length of the square drawn per visible node (default: 0.1).
    pub node_size: f32,
    /// Key values that request an undo while held (default: " ", "u", "U").
    pub undo_keys: Vec<String>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            grid_count: 100,
            width: 800.0,
            height: 800.0,
            friction: 0.5,
            force_multiplier: 0.35,
            knife_range: 10.0,
            speed_limit: 10.0,
            idle_threshold_ms: 3000.0,
            node_size: 0.1,
            undo_keys: vec![" ".to_owned(), "u".to_owned(), "U".to_owned()],
        }
    }
}

impl MeshConfig {
    /// Config for a `grid_count` mesh over `width` x `height`, other settings default.
    pub fn with_grid(grid_count: i32, width: f32, height: f32) -> Self {
        Self {
            grid_count,
            width,
            height,
            ..Self::default()
        }
    }

    /// Check every setting, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_count <= 0 {
            return Err(ConfigError::InvalidGridCount(self.grid_count));
        }
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(ConfigError::InvalidExtent {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::InvalidFriction(self.friction));
        }
        if !(self.force_multiplier.is_finite() && self.force_multiplier >= 0.0) {
            return Err(ConfigError::InvalidForceMultiplier(self.force_multiplier));
        }
        if !(self.knife_range.is_finite() && self.knife_range >= 0.0) {
            return Err(ConfigError::InvalidKnifeRange(self.knife_range));
        }
        if !(self.speed_limit.is_finite() && self.speed_limit > 0.0) {
            return Err(ConfigError::InvalidSpeedLimit(self.speed_limit));
        }
        if !(self.idle_threshold_ms.is_finite() && self.idle_threshold_ms >= 0.0) {
            return Err(ConfigError::InvalidIdleThreshold(self.idle_threshold_ms));
        }
        if !(self.node_size.is_finite() && self.node_size >= 0.0) {
            return Err(ConfigError::InvalidNodeSize(self.node_size));
        }
        Ok(())
    }

    /// Link-building distance threshold, `width / grid_count`.
    pub fn link_threshold(&self) -> f32 {
        self.width / self.grid_count as f32
    }

    /// Check if a key value is one of the configured undo keys.
    pub fn is_undo_key(&self, key: &str) -> bool {
        self.undo_keys.iter().any(|k| k == key)
    }
}
