//! End-to-end tests: image + mask on disk through to the restored image

use hole_filler::{
    image_io, process_image,
    types::{Connectivity, Error, FillMethod, ProcessingConfig},
};
use image::{DynamicImage, ImageBuffer, Luma};
use ndarray::Array2;
use std::path::{Path, PathBuf};

const SIZE: u32 = 40;
const HOLE: std::ops::Range<u32> = 16..24;

fn fixture_dir() -> PathBuf {
    let dir = PathBuf::from("tests/fixtures");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn save_gray8(path: &Path, width: u32, height: u32, f: impl Fn(u32, u32) -> u8) {
    let buf = ImageBuffer::<Luma<u8>, Vec<u8>>::from_fn(width, height, |x, y| Luma([f(x, y)]));
    DynamicImage::ImageLuma8(buf).save(path).unwrap();
}

/// Horizontal gradient plus a square mask over the middle
fn write_inputs(name: &str) -> (PathBuf, PathBuf) {
    let dir = fixture_dir();
    let image_path = dir.join(format!("{}_image.png", name));
    let mask_path = dir.join(format!("{}_mask.png", name));

    save_gray8(&image_path, SIZE, SIZE, |x, _| 60 + (x * 3) as u8);
    save_gray8(&mask_path, SIZE, SIZE, |x, y| {
        if HOLE.contains(&x) && HOLE.contains(&y) {
            0
        } else {
            255
        }
    });

    (image_path, mask_path)
}

fn config(method: FillMethod) -> ProcessingConfig {
    ProcessingConfig {
        connectivity: Connectivity::Eight,
        method,
        seed: Some(2024),
        show_progress: false,
        ..Default::default()
    }
}

fn hole_values(image: &Array2<f32>) -> Vec<f32> {
    let mut values = Vec::new();
    for y in HOLE {
        for x in HOLE {
            values.push(image[(y as usize, x as usize)]);
        }
    }
    values
}

fn cleanup(paths: &[&Path]) {
    for p in paths {
        std::fs::remove_file(p).ok();
    }
}

#[test]
fn test_exact_fill_end_to_end() {
    let (image_path, mask_path) = write_inputs("exact");
    let output_path = fixture_dir().join("exact_filled.png");

    let restoration =
        process_image(&image_path, &mask_path, &output_path, &config(FillMethod::Exact)).unwrap();

    assert!(restoration.is_complete());
    assert!(output_path.exists(), "Output file should exist");

    // Boundary columns span x = 15..=24 of the gradient
    let lo = (60 + 15 * 3) as f32 / 255.0;
    let hi = (60 + 24 * 3) as f32 / 255.0;
    for v in hole_values(&restoration.image) {
        assert!(v >= lo - 1e-5 && v <= hi + 1e-5, "{} outside [{}, {}]", v, lo, hi);
    }

    // Output on disk has no hole left and keeps known pixels
    let saved = image_io::load_gray(&output_path).unwrap();
    let original = image_io::load_gray(&image_path).unwrap();
    assert_eq!(saved.dim(), (SIZE as usize, SIZE as usize));
    assert!(hole_values(&saved).iter().all(|&v| v > 0.0));
    assert_eq!(saved[(0, 0)], original[(0, 0)]);
    assert_eq!(saved[(39, 39)], original[(39, 39)]);

    cleanup(&[&image_path, &mask_path, &output_path]);
}

#[test]
fn test_conv_matches_exact_end_to_end() {
    let (image_path, mask_path) = write_inputs("conv");
    let exact_path = fixture_dir().join("conv_exact_filled.png");
    let conv_path = fixture_dir().join("conv_conv_filled.png");

    let exact =
        process_image(&image_path, &mask_path, &exact_path, &config(FillMethod::Exact)).unwrap();
    let conv =
        process_image(&image_path, &mask_path, &conv_path, &config(FillMethod::Conv)).unwrap();

    assert!(conv.is_complete());
    for (a, b) in hole_values(&exact.image).iter().zip(hole_values(&conv.image)) {
        assert!((a - b).abs() < 1e-3, "exact {} conv {}", a, b);
    }

    cleanup(&[&image_path, &mask_path, &exact_path, &conv_path]);
}

#[test]
fn test_fast_fill_is_seeded() {
    let (image_path, mask_path) = write_inputs("fast");
    let first_path = fixture_dir().join("fast_first.png");
    let second_path = fixture_dir().join("fast_second.png");

    let first =
        process_image(&image_path, &mask_path, &first_path, &config(FillMethod::Fast)).unwrap();
    let second =
        process_image(&image_path, &mask_path, &second_path, &config(FillMethod::Fast)).unwrap();

    assert_eq!(first.image, second.image);
    assert!(hole_values(&first.image).iter().all(|&v| v > 0.0));

    cleanup(&[&image_path, &mask_path, &first_path, &second_path]);
}

#[test]
fn test_mask_size_mismatch() {
    let dir = fixture_dir();
    let image_path = dir.join("mismatch_image.png");
    let mask_path = dir.join("mismatch_mask.png");
    let output_path = dir.join("mismatch_filled.png");
    save_gray8(&image_path, 10, 10, |_, _| 128);
    save_gray8(&mask_path, 12, 10, |_, _| 255);

    let result = process_image(&image_path, &mask_path, &output_path, &config(FillMethod::Exact));
    assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    assert!(!output_path.exists());

    cleanup(&[&image_path, &mask_path]);
}

#[test]
fn test_fully_masked_image_fails() {
    let dir = fixture_dir();
    let image_path = dir.join("allhole_image.png");
    let mask_path = dir.join("allhole_mask.png");
    let output_path = dir.join("allhole_filled.png");
    save_gray8(&image_path, 8, 8, |_, _| 128);
    save_gray8(&mask_path, 8, 8, |_, _| 0);

    let result = process_image(&image_path, &mask_path, &output_path, &config(FillMethod::Conv));
    assert!(matches!(result, Err(Error::EmptyBoundary { hole_pixels: 64 })));

    cleanup(&[&image_path, &mask_path]);
}
