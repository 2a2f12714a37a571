//! Viewer presets
//!
//! The parameters a viewer binds to its shortcuts, loadable from JSON so a
//! host can ship its own presets.

use serde::{Deserialize, Serialize};
use std::path::Path;
use texmesh_algorithms::{NormalOptions, SmoothingOptions};
use texmesh_core::{Error, Result};
use texmesh_simplification::{GridClusteringOptions, OctreeClusteringOptions, DEFAULT_MAX_DEPTH, MAX_OCTREE_DEPTH};

/// Shortcut parameters of an interactive viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Smoothing strengths, one per shortcut
    pub smoothing_alphas: Vec<f32>,
    pub cotangent_weights: bool,
    pub angle_weighted_normals: bool,
    pub grid_resolution: usize,
    pub leaf_capacity: usize,
    pub max_depth: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            smoothing_alphas: vec![0.1, 0.5, 1.0],
            cotangent_weights: true,
            angle_weighted_normals: true,
            grid_resolution: 32,
            leaf_capacity: 10,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON preset. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidData(format!("invalid viewer config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidData(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidData(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(alpha) = self.smoothing_alphas.iter().find(|a| !a.is_finite()) {
            return Err(Error::InvalidParameter(format!("smoothing alpha {} is not finite", alpha)));
        }
        if self.grid_resolution == 0 {
            return Err(Error::InvalidParameter("grid resolution must be at least 1".to_string()));
        }
        if self.leaf_capacity == 0 {
            return Err(Error::InvalidParameter("leaf capacity must be at least 1".to_string()));
        }
        if self.max_depth > MAX_OCTREE_DEPTH {
            return Err(Error::InvalidParameter(format!(
                "max depth {} exceeds {}",
                self.max_depth, MAX_OCTREE_DEPTH
            )));
        }
        Ok(())
    }

    pub fn normal_options(&self) -> NormalOptions {
        NormalOptions {
            angle_weighted: self.angle_weighted_normals,
        }
    }

    /// Smoothing options for shortcut `preset`, `None` past the last alpha.
    pub fn smoothing(&self, preset: usize) -> Option<SmoothingOptions> {
        self.smoothing_alphas.get(preset).map(|&alpha| {
            SmoothingOptions::new(alpha, self.cotangent_weights).with_normals(self.normal_options())
        })
    }

    pub fn grid(&self) -> GridClusteringOptions {
        GridClusteringOptions::new(self.grid_resolution)
    }

    pub fn octree(&self) -> OctreeClusteringOptions {
        OctreeClusteringOptions::new(self.leaf_capacity).with_max_depth(self.max_depth)
    }
}
