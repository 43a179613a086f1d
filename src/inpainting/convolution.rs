//! Normalized-convolution recovery
//!
//! When the weight function depends only on the offset between two pixels,
//! the weighted sum over the boundary at every location is a convolution of
//! the boundary values with a tabulated kernel, and the weight sum is the
//! same convolution applied to a boundary indicator. Both are computed with
//! 2D FFTs over a square crop window around the boundary, then divided.
//!
//! The crop window starts from a heuristic (side = half the boundary size,
//! upper-left corner offset by half a side from the boundary's center of
//! mass). The heuristic gives no coverage guarantee for elongated or
//! non-convex holes, so when it misses any hole or boundary pixel the window
//! is grown to cover them before the convolution runs. Growing costs
//! memory: the FFT buffers are `(2 * side - 1)^2` complex values each, so
//! small holes scattered across a large image make this path far more
//! expensive than exact recovery.

use super::exact::weighted_average;
use crate::parallel::recover_pixels;
use crate::types::{Pixel, Restoration};
use crate::weight::WeightFunction;
use ndarray::{Array2, Axis};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Below this fraction of the peak kernel value an FFT weight sum is
/// dominated by round-off and the pixel is computed directly instead
const ROUND_OFF_FLOOR: f64 = 1e-9;

/// Expanded windows this many times wider than the heuristic one get a
/// memory warning
const EXPANSION_WARN_RATIO: usize = 4;

/// Square region of image coordinates. The origin may be negative or the
/// window may run past the image; it only positions the local buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub top: isize,
    pub left: isize,
    pub side: usize,
}

impl CropWindow {
    /// Window derived from the boundary's center of mass and size alone
    pub fn heuristic(boundary: &[Pixel]) -> Self {
        let count = boundary.len().max(1);
        let (row_sum, col_sum) = boundary
            .iter()
            .fold((0usize, 0usize), |(r, c), p| (r + p.row, c + p.col));
        let center_row = (row_sum / count) as isize;
        let center_col = (col_sum / count) as isize;

        let side = (boundary.len() / 2).max(1);
        let half = (side / 2) as isize;

        Self {
            top: center_row - half,
            left: center_col - half,
            side,
        }
    }

    /// Heuristic window, grown when needed so that every hole and boundary
    /// pixel falls inside it
    pub fn covering(boundary: &[Pixel], hole: &[Pixel]) -> Self {
        let window = Self::heuristic(boundary);
        if hole.iter().chain(boundary).all(|&p| window.contains(p)) {
            return window;
        }

        let (mut min_row, mut min_col) = (isize::MAX, isize::MAX);
        let (mut max_row, mut max_col) = (isize::MIN, isize::MIN);
        for p in hole.iter().chain(boundary) {
            min_row = min_row.min(p.row as isize);
            min_col = min_col.min(p.col as isize);
            max_row = max_row.max(p.row as isize);
            max_col = max_col.max(p.col as isize);
        }

        let extent = (max_row - min_row).max(max_col - min_col) as usize + 1;
        let grown = Self {
            top: min_row,
            left: min_col,
            side: extent.max(window.side),
        };

        log::warn!(
            "crop window of side {} at ({}, {}) does not cover the hole, expanded to side {} at ({}, {})",
            window.side,
            window.top,
            window.left,
            grown.side,
            grown.top,
            grown.left
        );
        if grown.side > EXPANSION_WARN_RATIO * window.side {
            log::warn!(
                "expanded crop window needs about {} MiB of FFT buffers; exact recovery may be cheaper",
                grown.buffer_bytes() / (1024 * 1024)
            );
        }
        grown
    }

    /// Approximate memory held by the three FFT buffers for this window
    pub fn buffer_bytes(&self) -> usize {
        let size = 2 * self.side - 1;
        3 * size * size * std::mem::size_of::<Complex<f64>>()
    }

    pub fn contains(&self, p: Pixel) -> bool {
        self.local(p).is_some()
    }

    /// Window-local (row, col) of an image pixel
    pub fn local(&self, p: Pixel) -> Option<(usize, usize)> {
        let row = p.row as isize - self.top;
        let col = p.col as isize - self.left;
        let side = self.side as isize;
        (row >= 0 && row < side && col >= 0 && col < side).then(|| (row as usize, col as usize))
    }
}

/// Tabulate `w(center, center + d)` for every displacement `d` that can
/// occur between two pixels of a window of the given side.
///
/// The result is `(2 * side - 1)` square with the zero displacement at its center.
pub fn build_kernel<W: WeightFunction + ?Sized>(weight: &W, side: usize) -> Array2<f64> {
    let size = 2 * side - 1;
    let center = Pixel::new(side - 1, side - 1);
    Array2::from_shape_fn((size, size), |(r, c)| weight.weight(center, Pixel::new(r, c)))
}

/// Fill the hole by normalized convolution over a crop window.
///
/// Matches [`super::exact::recover_exact`] up to FFT round-off when the
/// weight function is translation invariant. Complexity: O(w^2 log w) for
/// window side w.
pub fn recover_convolution<W: WeightFunction + ?Sized>(
    image: &Array2<f32>,
    hole: &[Pixel],
    boundary: &[Pixel],
    weight: &W,
) -> Restoration {
    if hole.is_empty() {
        return Restoration::unchanged(image);
    }
    if boundary.is_empty() {
        return recover_pixels(image, hole, |_| None);
    }

    let window = CropWindow::covering(boundary, hole);
    let side = window.side;
    let size = 2 * side - 1;
    let offset = side - 1;
    log::debug!(
        "crop window side {} at ({}, {}), kernel {}x{}",
        side,
        window.top,
        window.left,
        size,
        size
    );

    let kernel = build_kernel(weight, side);
    let kernel_peak = kernel.iter().cloned().fold(0.0f64, f64::max);

    // Value and indicator matrices, zero-padded to the kernel size
    let mut values = Array2::from_elem((size, size), Complex::new(0.0, 0.0));
    let mut indicator = Array2::from_elem((size, size), Complex::new(0.0, 0.0));
    for &b in boundary {
        if let Some((r, c)) = window.local(b) {
            values[(r, c)] = Complex::new(image[(b.row, b.col)] as f64, 0.0);
            indicator[(r, c)] = Complex::new(1.0, 0.0);
        }
    }

    // Flip the kernel so that convolution evaluates w(p, b) at offset b - p
    let last = size - 1;
    let mut flipped = Array2::from_shape_fn((size, size), |(r, c)| {
        Complex::new(kernel[(last - r, last - c)], 0.0)
    });

    let mut planner = FftPlanner::new();
    let forward = planner.plan_fft_forward(size);
    let inverse = planner.plan_fft_inverse(size);

    fft2(&mut values, forward.as_ref());
    fft2(&mut indicator, forward.as_ref());
    fft2(&mut flipped, forward.as_ref());

    values *= &flipped;
    indicator *= &flipped;

    fft2(&mut values, inverse.as_ref());
    fft2(&mut indicator, inverse.as_ref());

    // rustfft leaves the inverse unnormalized; the scale cancels in the
    // ratio but the round-off floor is absolute
    let scale = (size * size) as f64;
    let floor = ROUND_OFF_FLOOR * kernel_peak;

    // Tiny weight sums fall back to the direct sum, which only gives up
    // when the weights are exactly zero
    recover_pixels(image, hole, |p| {
        let (r, c) = window.local(p)?;
        let at = (r + offset, c + offset);
        let numerator = values[at].re / scale;
        let denominator = indicator[at].re / scale;
        if denominator > floor {
            Some((numerator / denominator) as f32)
        } else {
            weighted_average(p, boundary, image, weight)
        }
    })
}

/// In-place 2D FFT: transform every row, then every column
fn fft2(data: &mut Array2<Complex<f64>>, fft: &dyn Fft<f64>) {
    let mut scratch = vec![Complex::new(0.0, 0.0); data.nrows().max(data.ncols())];

    for axis in [Axis(1), Axis(0)] {
        for mut lane in data.lanes_mut(axis) {
            let buf = &mut scratch[..lane.len()];
            for (dst, src) in buf.iter_mut().zip(lane.iter()) {
                *dst = *src;
            }
            fft.process(buf);
            for (dst, src) in lane.iter_mut().zip(buf.iter()) {
                *dst = *src;
            }
        }
    }
}
