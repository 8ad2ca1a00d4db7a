//! Palette extraction by k-means over RGB pixels.
//!
//! Two models are offered:
//!
//! * [`PaletteModel::FixedK`] clusters into exactly `k` colors and returns
//!   the centroids.
//! * [`PaletteModel::Auto`] clusters into a fixed, larger number of colors
//!   (24 by default), then keeps one representative per hue family via
//!   [`reduce_palette`](crate::reduce::reduce_palette).
//!
//! Results are remembered in a bounded LRU cache keyed by the pixel content
//! and the model, so re-rendering the same image does not re-cluster.

use image::{Rgb, RgbImage};
use kmeans_colors::{Kmeans, get_kmeans};
use lru::LruCache;
use palette::Srgb;
use rayon::prelude::*;
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use tracing::{debug, trace};

use crate::config::{CacheConfig, ClusteringConfig};
use crate::convert::{Centroid, hsv_to_rgb, rgb_to_hsv};
use crate::error::{ColorError, Result};
use crate::hex::to_hex;
use crate::reduce::reduce_palette;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteModel {
    /// Caller-chosen number of clusters.
    FixedK(usize),
    /// Fixed cluster pass followed by hue-family reduction.
    Auto,
}

/// Ordered palette colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub colors: Vec<Srgb<u8>>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn hex(&self) -> Vec<String> {
        self.colors.iter().copied().map(to_hex).collect()
    }

    /// Render the palette as a strip of `tile`×`tile` squares, left to right.
    pub fn swatch(&self, tile: u32) -> RgbImage {
        let tile = tile.max(1);
        let width = tile * self.colors.len() as u32;
        RgbImage::from_fn(width, tile, |x, _| {
            let c = self.colors[(x / tile) as usize];
            Rgb([c.red, c.green, c.blue])
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    digest: u64,
    len: usize,
    model: PaletteModel,
}

impl CacheKey {
    fn new(pixels: &[Srgb<u8>], model: PaletteModel) -> Self {
        let mut hasher = DefaultHasher::new();
        for p in pixels {
            [p.red, p.green, p.blue].hash(&mut hasher);
        }
        Self {
            digest: hasher.finish(),
            len: pixels.len(),
            model,
        }
    }
}

/// Palette extraction service with a content-addressed result cache.
///
/// Clustering may run its independent restarts in parallel, but every call
/// blocks until the palette is ready. Safe to share between threads.
pub struct PaletteExtractor {
    config: ClusteringConfig,
    cache: Option<Mutex<LruCache<CacheKey, Palette>>>,
}

impl PaletteExtractor {
    /// A cache capacity of zero disables caching.
    pub fn new(config: ClusteringConfig, cache: &CacheConfig) -> Self {
        Self {
            config,
            cache: NonZeroUsize::new(cache.capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Model 1: exactly `k` colors, in clustering order.
    pub fn extract_fixed_k(&self, pixels: &[Srgb<u8>], k: usize) -> Result<Palette> {
        self.extract(pixels, PaletteModel::FixedK(k))
    }

    /// Model 2: one color per hue family present among the cluster centers.
    pub fn extract_auto(&self, pixels: &[Srgb<u8>]) -> Result<Palette> {
        self.extract(pixels, PaletteModel::Auto)
    }

    pub fn extract(&self, pixels: &[Srgb<u8>], model: PaletteModel) -> Result<Palette> {
        if let PaletteModel::FixedK(k) = model {
            if k < self.config.min_k || k > self.config.max_k {
                return Err(ColorError::InvalidClusterCount {
                    k,
                    min: self.config.min_k,
                    max: self.config.max_k,
                });
            }
        }

        let key = CacheKey::new(pixels, model);
        if let Some(hit) = self.cached(&key) {
            debug!(?model, pixels = pixels.len(), "palette cache hit");
            return Ok(hit);
        }

        let palette = match model {
            PaletteModel::FixedK(k) => {
                let centroids = self.cluster(pixels, k)?;
                Palette {
                    colors: centroids.into_iter().map(Centroid::round).collect(),
                }
            }
            PaletteModel::Auto => {
                let centroids = self.cluster(pixels, self.config.auto_clusters)?;
                let reduced = reduce_palette(&rgb_to_hsv(&centroids));
                trace!(
                    clusters = centroids.len(),
                    families = reduced.len(),
                    "reduced cluster centers to hue families"
                );
                Palette {
                    colors: hsv_to_rgb(&reduced),
                }
            }
        };

        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .put(key, palette.clone());
        }
        Ok(palette)
    }

    fn cached(&self, key: &CacheKey) -> Option<Palette> {
        let cache = self.cache.as_ref()?;
        cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Run k-means and return exactly `k` centroids on the 0-255 scale.
    fn cluster(&self, pixels: &[Srgb<u8>], k: usize) -> Result<Vec<Centroid>> {
        if pixels.is_empty() {
            return Err(ColorError::EmptyInput);
        }
        let distinct = count_distinct(pixels, k);
        if distinct < k {
            return Err(ColorError::InsufficientColors {
                requested: k,
                distinct,
            });
        }

        let buf: Vec<Srgb<f32>> = pixels.iter().map(|p| p.into_format()).collect();
        let cfg = &self.config;
        let best: Option<Kmeans<Srgb<f32>>> = (0..cfg.runs.max(1) as u64)
            .into_par_iter()
            .map(|run| get_kmeans(k, cfg.max_iter, cfg.converge, false, &buf, cfg.seed + run))
            .min_by(|a, b| a.score.total_cmp(&b.score));
        let best = best.ok_or_else(|| ColorError::ClusteringFailed {
            reason: "no clustering run completed".to_string(),
        })?;

        if !best.score.is_finite() {
            return Err(ColorError::ClusteringFailed {
                reason: format!("non-finite score {}", best.score),
            });
        }
        if best.centroids.len() != k {
            return Err(ColorError::ClusteringFailed {
                reason: format!("expected {k} centroids, got {}", best.centroids.len()),
            });
        }
        debug!(k, pixels = pixels.len(), score = best.score, "k-means finished");

        Ok(best
            .centroids
            .iter()
            .map(|c| Centroid::new(c.red * 255.0, c.green * 255.0, c.blue * 255.0))
            .collect())
    }
}

/// Distinct colors in `pixels`, counting no further than `limit`.
fn count_distinct(pixels: &[Srgb<u8>], limit: usize) -> usize {
    let mut seen = HashSet::with_capacity(limit);
    for p in pixels {
        seen.insert([p.red, p.green, p.blue]);
        if seen.len() >= limit {
            break;
        }
    }
    seen.len()
}
