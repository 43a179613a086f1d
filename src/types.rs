//! Core types and structures for the hole filler

use ndarray::Array2;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reserved matrix value marking an unknown (hole) pixel
pub const SENTINEL: f32 = -1.0;

/// Boundary subset size used by the fast recoverer when none is given
pub const DEFAULT_SAMPLE_SIZE: usize = 30;

/// Integer pixel coordinate.
///
/// Equality and hashing are structural: two pixels with the same row and
/// column are the same pixel, which is what boundary deduplication relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub row: usize,
    pub col: usize,
}

impl Pixel {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Euclidean distance to another pixel
    pub fn distance(&self, other: &Pixel) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Pixel adjacency rule used to decide which known pixels touch the hole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Up, down, left, right
    Four,
    /// Four-connectivity plus the diagonals
    Eight,
}

impl FromStr for Connectivity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "4" => Ok(Connectivity::Four),
            "8" => Ok(Connectivity::Eight),
            other => Err(Error::Config(format!(
                "unknown connectivity '{}', expected 4 or 8",
                other
            ))),
        }
    }
}

/// Which recovery algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMethod {
    /// Full weighted average over the whole boundary, O(n^1.5)
    Exact,
    /// Weighted average over a random boundary subset, O(n)
    Fast,
    /// Normalized convolution over a crop window, O(n log n)
    Conv,
}

impl FillMethod {
    pub fn name(&self) -> &'static str {
        match self {
            FillMethod::Exact => "exact",
            FillMethod::Fast => "fast",
            FillMethod::Conv => "conv",
        }
    }
}

impl FromStr for FillMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(FillMethod::Exact),
            "fast" => Ok(FillMethod::Fast),
            "conv" | "convolution" => Ok(FillMethod::Conv),
            other => Err(Error::Config(format!(
                "unknown method '{}', expected exact, fast or conv",
                other
            ))),
        }
    }
}

/// Processing configuration
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Adjacency rule for boundary extraction
    pub connectivity: Connectivity,
    /// Recovery algorithm
    pub method: FillMethod,
    /// Distance exponent of the default weight function
    pub z: i32,
    /// Regularizing offset of the default weight function
    pub epsilon: f64,
    /// Boundary subset size for the fast method
    pub sample_size: usize,
    /// Random seed for the fast method. Runs without a seed are not reproducible.
    pub seed: Option<u64>,
    /// Show progress output
    pub show_progress: bool,
    /// Enable detailed timing information
    pub benchmark: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Eight,
            method: FillMethod::Exact,
            z: 3,
            epsilon: 0.01,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
            show_progress: true,
            benchmark: false,
        }
    }
}

/// Result of one recovery call
#[derive(Debug, Clone)]
pub struct Restoration {
    /// Same-shaped matrix with hole pixels replaced by recovered values
    pub image: Array2<f32>,
    /// Hole pixels that received no value and still hold the sentinel
    pub unresolved: Vec<Pixel>,
}

impl Restoration {
    /// Wrap a matrix that needed no recovery
    pub fn unchanged(image: &Array2<f32>) -> Self {
        Self {
            image: image.clone(),
            unresolved: Vec::new(),
        }
    }

    /// True when every hole pixel was assigned a value
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Hole filler error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Dimension mismatch: image is {image:?}, mask is {mask:?}")]
    DimensionMismatch {
        image: (usize, usize),
        mask: (usize, usize),
    },

    #[error("Hole of {hole_pixels} pixels has no known boundary to extrapolate from")]
    EmptyBoundary { hole_pixels: usize },

    #[error("Cannot sample {requested} boundary pixels, boundary has only {available}")]
    SampleSize { requested: usize, available: usize },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
