//! Approximate recovery from a random boundary subset
//!
//! One subset of fixed size is drawn without replacement before the
//! per-pixel loop and shared by every hole pixel, so the cost per pixel no
//! longer grows with the boundary. The random generator is threaded in by
//! the caller; an unseeded generator gives different results on every run.

use super::exact::weighted_average;
use crate::parallel::recover_pixels;
use crate::types::{Error, Pixel, Restoration, Result};
use crate::weight::WeightFunction;
use ndarray::Array2;
use rand::Rng;

/// Draw `sample_size` distinct boundary pixels uniformly at random
pub fn sample_boundary<R: Rng + ?Sized>(
    boundary: &[Pixel],
    sample_size: usize,
    rng: &mut R,
) -> Result<Vec<Pixel>> {
    if sample_size == 0 {
        return Err(Error::Config(
            "boundary sample size must be at least 1".to_string(),
        ));
    }
    if sample_size > boundary.len() {
        return Err(Error::SampleSize {
            requested: sample_size,
            available: boundary.len(),
        });
    }

    Ok(rand::seq::index::sample(rng, boundary.len(), sample_size)
        .into_iter()
        .map(|i| boundary[i])
        .collect())
}

/// Fill every hole pixel with the weighted average over a shared random
/// subset of the boundary.
///
/// Complexity: O(|hole| * sample_size).
pub fn recover_stochastic<W: WeightFunction + ?Sized, R: Rng + ?Sized>(
    image: &Array2<f32>,
    hole: &[Pixel],
    boundary: &[Pixel],
    weight: &W,
    sample_size: usize,
    rng: &mut R,
) -> Result<Restoration> {
    let subset = sample_boundary(boundary, sample_size, rng)?;
    log::debug!(
        "sampled {} of {} boundary pixels",
        subset.len(),
        boundary.len()
    );

    Ok(recover_pixels(image, hole, |p| {
        weighted_average(p, &subset, image, weight)
    }))
}
