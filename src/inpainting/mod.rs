//! Hole recovery algorithms
//!
//! All three compute the same boundary-weighted average and differ in cost:
//! exact over the full boundary, stochastic over a random subset, and
//! convolution over a tabulated kernel.

pub mod convolution;
pub mod exact;
pub mod stochastic;

pub use convolution::{recover_convolution, CropWindow};
pub use exact::{recover_exact, weighted_average};
pub use stochastic::{recover_stochastic, sample_boundary};
