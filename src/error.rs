//! Error types shared by every color routine in the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = ColorError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ColorError {
    /// The image bytes could not be decoded.
    #[error("unable to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Clustering was asked to run over zero pixels.
    #[error("no pixels to cluster")]
    EmptyInput,

    /// Caller asked for a cluster count outside the supported range.
    #[error("cluster count {k} is outside {min}..={max}")]
    InvalidClusterCount { k: usize, min: usize, max: usize },

    /// The image holds fewer distinct colors than requested clusters.
    #[error("requested {requested} clusters but the image only has {distinct} distinct colors")]
    InsufficientColors { requested: usize, distinct: usize },

    /// k-means produced something unusable (wrong centroid count, NaN score).
    #[error("clustering failed: {reason}")]
    ClusteringFailed { reason: String },

    /// A training row could not be parsed.
    #[error("training data line {line}: {reason} ({row:?})")]
    TrainingRow {
        line: usize,
        row: String,
        reason: String,
    },

    /// The neighbor model needs at least one neighbor to vote.
    #[error("neighbor count must be at least 1, got {neighbors}")]
    InvalidNeighborCount { neighbors: usize },

    /// Not enough training samples to fit the neighbor model.
    #[error("training set has {found} samples, at least {required} are needed")]
    TooFewSamples { found: usize, required: usize },

    /// Frame buffer does not match its declared dimensions.
    #[error("frame of {width}x{height} needs {expected} bytes, got {actual}")]
    FrameShape {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A hex color string was malformed.
    #[error("invalid hex color {input:?}")]
    InvalidHex { input: String },

    /// An integer channel value was outside 0..=255.
    #[error("channel value {value} is outside 0..=255")]
    ChannelOutOfRange { value: i64 },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl ColorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn training_row(line: usize, row: &str, reason: impl Into<String>) -> Self {
        Self::TrainingRow {
            line,
            row: row.to_string(),
            reason: reason.into(),
        }
    }
}
