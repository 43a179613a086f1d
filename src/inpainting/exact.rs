//! Exact weighted-average recovery over the full boundary

use crate::parallel::recover_pixels;
use crate::types::{Pixel, Restoration};
use crate::weight::WeightFunction;
use ndarray::Array2;

/// Weighted average of `boundary` values as seen from `pixel`.
///
/// Returns `None` when the weights sum to exactly zero.
pub fn weighted_average<W: WeightFunction + ?Sized>(
    pixel: Pixel,
    boundary: &[Pixel],
    image: &Array2<f32>,
    weight: &W,
) -> Option<f32> {
    let mut sum_value = 0.0f64;
    let mut sum_weight = 0.0f64;

    for &b in boundary {
        let w = weight.weight(pixel, b);
        sum_value += w * image[(b.row, b.col)] as f64;
        sum_weight += w;
    }

    if sum_weight > 0.0 {
        Some((sum_value / sum_weight) as f32)
    } else {
        None
    }
}

/// Fill every hole pixel with the weighted average over the whole boundary.
///
/// Complexity: O(|hole| * |boundary|), O(n^1.5) for a compact hole.
pub fn recover_exact<W: WeightFunction + ?Sized>(
    image: &Array2<f32>,
    hole: &[Pixel],
    boundary: &[Pixel],
    weight: &W,
) -> Restoration {
    recover_pixels(image, hole, |p| weighted_average(p, boundary, image, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{find_boundary, locate_hole};
    use crate::types::{Connectivity, SENTINEL};
    use crate::weight::{DistanceWeight, UniformWeight};

    fn gradient_with_hole() -> Array2<f32> {
        let mut image = Array2::from_shape_fn((9, 9), |(r, c)| (r * 9 + c) as f32 / 81.0);
        for r in 3..6 {
            for c in 3..6 {
                image[(r, c)] = SENTINEL;
            }
        }
        image
    }

    #[test]
    fn test_uniform_center_pixel() {
        let mut image = Array2::from_elem((5, 5), 0.5f32);
        image[(2, 2)] = SENTINEL;
        let hole = locate_hole(image.view());
        let boundary = find_boundary(&hole, image.dim(), Connectivity::Four);

        let result = recover_exact(&image, &hole, &boundary, &UniformWeight(1.0));

        assert!(result.is_complete());
        assert!((result.image[(2, 2)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_weight_gives_mean() {
        let image = gradient_with_hole();
        let hole = locate_hole(image.view());
        let boundary = find_boundary(&hole, image.dim(), Connectivity::Eight);

        let mean = boundary
            .iter()
            .map(|b| image[(b.row, b.col)] as f64)
            .sum::<f64>()
            / boundary.len() as f64;

        let result = recover_exact(&image, &hole, &boundary, &UniformWeight(2.5));
        for p in &hole {
            assert!((result.image[(p.row, p.col)] as f64 - mean).abs() < 1e-6);
        }
    }

    #[test]
    fn test_values_within_boundary_range() {
        let image = gradient_with_hole();
        let hole = locate_hole(image.view());
        let boundary = find_boundary(&hole, image.dim(), Connectivity::Four);
        let weight = DistanceWeight::new(3, 0.01).unwrap();

        let values: Vec<f32> = boundary.iter().map(|b| image[(b.row, b.col)]).collect();
        let lo = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let hi = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        let result = recover_exact(&image, &hole, &boundary, &weight);
        for p in &hole {
            let v = result.image[(p.row, p.col)];
            assert!(v >= lo - 1e-6 && v <= hi + 1e-6, "{} outside [{}, {}]", v, lo, hi);
        }
    }

    #[test]
    fn test_independent_of_boundary_order() {
        let image = gradient_with_hole();
        let hole = locate_hole(image.view());
        let boundary = find_boundary(&hole, image.dim(), Connectivity::Eight);
        let mut reversed = boundary.clone();
        reversed.reverse();
        let weight = DistanceWeight::new(2, 0.5).unwrap();

        let a = recover_exact(&image, &hole, &boundary, &weight);
        let b = recover_exact(&image, &hole, &reversed, &weight);
        for p in &hole {
            assert!((a.image[(p.row, p.col)] - b.image[(p.row, p.col)]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_known_pixels_copied() {
        let image = gradient_with_hole();
        let hole = locate_hole(image.view());
        let boundary = find_boundary(&hole, image.dim(), Connectivity::Four);
        let result = recover_exact(&image, &hole, &boundary, &UniformWeight(1.0));

        for ((r, c), &v) in image.indexed_iter() {
            if v != SENTINEL {
                assert_eq!(result.image[(r, c)], v);
            }
        }
    }

    #[test]
    fn test_zero_weight_is_unresolved() {
        let mut image = Array2::from_elem((3, 3), 0.5f32);
        image[(1, 1)] = SENTINEL;
        let hole = locate_hole(image.view());
        let boundary = find_boundary(&hole, image.dim(), Connectivity::Four);

        let result = recover_exact(&image, &hole, &boundary, &UniformWeight(0.0));

        assert_eq!(result.unresolved, vec![Pixel::new(1, 1)]);
        assert_eq!(result.image[(1, 1)], SENTINEL);
    }

    #[test]
    fn test_weighted_average_prefers_near_pixels() {
        let mut image = Array2::zeros((1, 5));
        image[(0, 0)] = 1.0f32;
        image[(0, 4)] = 0.0;
        let boundary = [Pixel::new(0, 0), Pixel::new(0, 4)];
        let weight = DistanceWeight::new(2, 0.01).unwrap();

        let v = weighted_average(Pixel::new(0, 1), &boundary, &image, &weight).unwrap();
        assert!(v > 0.85);
    }
}
