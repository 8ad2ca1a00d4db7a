//! Tunable parameters for palette extraction and color detection.
//!
//! Loaded from JSON or built from defaults:
//!
//! ```no_run
//! use image_colors_wasm::Config;
//! use std::path::Path;
//!
//! let config = Config::from_json_file(Path::new("colors.json"))?;
//! # Ok::<(), image_colors_wasm::ColorError>(())
//! ```
//!
//! Missing fields fall back to [`Config::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ColorError, Result};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub clustering: ClusteringConfig,
    pub cache: CacheConfig,
    pub classifier: ClassifierConfig,
    pub image: ImageConfig,
}

/// k-means parameters shared by both palette models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Iteration cap for a single k-means run
    pub max_iter: usize,
    /// Centroid movement below which a run counts as converged
    pub converge: f32,
    /// Seed of the first run; later runs use seed + i
    pub seed: u64,
    /// Independent runs, best score wins
    pub runs: usize,
    /// Cluster count of the automatic model before hue reduction
    pub auto_clusters: usize,
    /// Smallest palette the fixed-k model accepts
    pub min_k: usize,
    /// Largest palette the fixed-k model accepts
    pub max_k: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_iter: 20,
            converge: 1e-4,
            seed: 0,
            runs: 1,
            auto_clusters: 24,
            min_k: 2,
            max_k: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Palettes remembered before the least recently used one is evicted
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub neighbors: usize,
    pub training_data: PathBuf,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            neighbors: 4,
            training_data: PathBuf::from("data/training.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Longest side images are shrunk to before clustering; `None` keeps the original size
    pub thumbnail: Option<u32>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            thumbnail: Some(500),
        }
    }
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ColorError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| ColorError::io(path, e))
    }
}
