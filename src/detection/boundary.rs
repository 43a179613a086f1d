//! Hole location and boundary extraction under 4- or 8-connectivity

use crate::types::{Connectivity, Pixel, SENTINEL};
use ndarray::ArrayView2;
use std::collections::HashSet;

const FOUR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const EIGHT_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Collect every pixel holding the sentinel, in row-major order
pub fn locate_hole(image: ArrayView2<f32>) -> Vec<Pixel> {
    let hole: Vec<Pixel> = image
        .indexed_iter()
        .filter(|(_, &v)| v == SENTINEL)
        .map(|((row, col), _)| Pixel::new(row, col))
        .collect();

    log::debug!("hole size n = {}", hole.len());
    hole
}

/// Neighbours of `pixel` under `connectivity` that lie inside a `dims` (rows, cols) grid.
///
/// Out-of-bounds coordinates are dropped here and never reach the caller.
pub fn neighborhood(
    pixel: Pixel,
    dims: (usize, usize),
    connectivity: Connectivity,
) -> impl Iterator<Item = Pixel> {
    let offsets: &'static [(isize, isize)] = match connectivity {
        Connectivity::Four => &FOUR_OFFSETS,
        Connectivity::Eight => &EIGHT_OFFSETS,
    };
    let (height, width) = dims;

    offsets.iter().filter_map(move |&(dr, dc)| {
        let row = pixel.row.wrapping_add_signed(dr);
        let col = pixel.col.wrapping_add_signed(dc);
        (row < height && col < width).then(|| Pixel::new(row, col))
    })
}

/// Known pixels adjacent to at least one hole pixel.
///
/// Duplicates collapse through value-based set membership. The result is
/// sorted so that seeded sampling picks the same subset in every process.
pub fn find_boundary(
    hole: &[Pixel],
    dims: (usize, usize),
    connectivity: Connectivity,
) -> Vec<Pixel> {
    let hole_set: HashSet<Pixel> = hole.iter().copied().collect();
    let mut boundary = HashSet::new();

    for &p in hole {
        for neighbor in neighborhood(p, dims, connectivity) {
            if !hole_set.contains(&neighbor) {
                boundary.insert(neighbor);
            }
        }
    }

    let mut boundary: Vec<Pixel> = boundary.into_iter().collect();
    boundary.sort_unstable();

    log::debug!("boundary size m = {}", boundary.len());
    boundary
}
