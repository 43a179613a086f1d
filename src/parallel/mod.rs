//! Parallel per-pixel recovery loop shared by all recoverers

use crate::types::{Pixel, Restoration};
use ndarray::Array2;
use rayon::prelude::*;

/// Evaluate `recover` for every hole pixel in parallel and write the results
/// into a copy of `image`.
///
/// Each call only reads shared state and each result lands in its own cell,
/// so workers never contend. Pixels for which `recover` returns `None` keep
/// their sentinel and are reported in [`Restoration::unresolved`].
pub fn recover_pixels<F>(image: &Array2<f32>, hole: &[Pixel], recover: F) -> Restoration
where
    F: Fn(Pixel) -> Option<f32> + Sync,
{
    let values: Vec<(Pixel, Option<f32>)> = hole.par_iter().map(|&p| (p, recover(p))).collect();

    let mut restored = image.clone();
    let mut unresolved = Vec::new();

    for (p, value) in values {
        match value {
            Some(v) => restored[(p.row, p.col)] = v,
            None => unresolved.push(p),
        }
    }

    if !unresolved.is_empty() {
        log::warn!(
            "{} of {} hole pixels had zero accumulated weight and were left unfilled",
            unresolved.len(),
            hole.len()
        );
    }

    Restoration {
        image: restored,
        unresolved,
    }
}
