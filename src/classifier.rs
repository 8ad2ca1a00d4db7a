//! Nearest-neighbor color naming.
//!
//! A [`ColorClassifier`] is fitted once from labeled RGB samples and is
//! immutable afterwards; build it at startup and share it (e.g. in an `Arc`).
//! There is no untrained state, so classifying before training cannot happen.

use kd_tree::{KdPoint, KdTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::{ColorError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Black,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Violet,
    White,
}

impl ColorLabel {
    pub const ALL: [ColorLabel; 8] = [
        ColorLabel::Black,
        ColorLabel::Blue,
        ColorLabel::Green,
        ColorLabel::Yellow,
        ColorLabel::Orange,
        ColorLabel::Red,
        ColorLabel::Violet,
        ColorLabel::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorLabel::Black => "black",
            ColorLabel::Blue => "blue",
            ColorLabel::Green => "green",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Orange => "orange",
            ColorLabel::Red => "red",
            ColorLabel::Violet => "violet",
            ColorLabel::White => "white",
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ColorLabel::ALL
            .into_iter()
            .find(|label| label.name() == s)
            .ok_or_else(|| format!("unknown label {s:?}"))
    }
}

/// One labeled point in RGB space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingSample {
    pub rgb: [f64; 3],
    pub label: ColorLabel,
}

impl TrainingSample {
    pub fn new(red: f64, green: f64, blue: f64, label: ColorLabel) -> Self {
        Self {
            rgb: [red, green, blue],
            label,
        }
    }
}

impl KdPoint for TrainingSample {
    type Scalar = f64;
    type Dim = typenum::U3;

    fn at(&self, i: usize) -> f64 {
        self.rgb[i]
    }
}

/// Parse `R,G,B,label` rows. Blank lines are skipped; anything else must have
/// exactly four fields with numeric color components.
pub fn parse_training_csv(data: &str) -> Result<Vec<TrainingSample>> {
    let mut samples = Vec::new();
    for (index, raw) in data.lines().enumerate() {
        let line = index + 1;
        let row = raw.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        let [r, g, b, label] = fields.as_slice() else {
            return Err(ColorError::training_row(
                line,
                row,
                format!("expected 4 fields, found {}", fields.len()),
            ));
        };

        let mut rgb = [0.0; 3];
        for (slot, field) in rgb.iter_mut().zip([r, g, b]) {
            *slot = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ColorError::training_row(line, row, format!("{field:?} is not a number")))?;
        }
        let label = label
            .parse::<ColorLabel>()
            .map_err(|reason| ColorError::training_row(line, row, reason))?;

        samples.push(TrainingSample { rgb, label });
    }
    Ok(samples)
}

/// k-nearest-neighbor classifier over RGB space with Euclidean distance.
pub struct ColorClassifier {
    tree: KdTree<TrainingSample>,
    neighbors: usize,
    samples: usize,
}

impl ColorClassifier {
    /// Fit the model. `neighbors` must be at least 1 and at least that many
    /// samples are required.
    pub fn train(samples: Vec<TrainingSample>, neighbors: usize) -> Result<Self> {
        if neighbors == 0 {
            return Err(ColorError::InvalidNeighborCount { neighbors });
        }
        if samples.len() < neighbors {
            return Err(ColorError::TooFewSamples {
                found: samples.len(),
                required: neighbors,
            });
        }
        let count = samples.len();
        let tree = KdTree::build_by_ordered_float(samples);
        info!(samples = count, neighbors, "trained color classifier");
        Ok(Self {
            tree,
            neighbors,
            samples: count,
        })
    }

    pub fn from_csv_str(data: &str, neighbors: usize) -> Result<Self> {
        Self::train(parse_training_csv(data)?, neighbors)
    }

    pub fn from_csv_path(path: &Path, neighbors: usize) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| ColorError::io(path, e))?;
        Self::from_csv_str(&data, neighbors)
    }

    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Majority label among the nearest samples.
    ///
    /// Equal vote counts go to the label whose neighbors are closer in total,
    /// then to the label of the nearer neighbor.
    pub fn classify(&self, feature: [f64; 3]) -> ColorLabel {
        let mut nearest = self.tree.nearests(&feature, self.neighbors);
        nearest.sort_by(|a, b| a.squared_distance.total_cmp(&b.squared_distance));

        // (label, votes, summed distance), in order of first appearance
        let mut tally: Vec<(ColorLabel, usize, f64)> = Vec::with_capacity(self.neighbors);
        for found in &nearest {
            let distance = found.squared_distance.sqrt();
            match tally.iter_mut().find(|(label, ..)| *label == found.item.label) {
                Some((_, votes, total)) => {
                    *votes += 1;
                    *total += distance;
                }
                None => tally.push((found.item.label, 1, distance)),
            }
        }

        let mut best = tally[0];
        for &entry in &tally[1..] {
            if entry.1 > best.1 || (entry.1 == best.1 && entry.2 < best.2) {
                best = entry;
            }
        }
        best.0
    }

    pub fn classify_rgb(&self, rgb: [u8; 3]) -> ColorLabel {
        self.classify(rgb.map(f64::from))
    }
}
