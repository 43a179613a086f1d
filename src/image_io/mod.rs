//! Grayscale image I/O and mask merging
//!
//! Decoded images become `Array2<f32>` intensities in [0, 1]; masked pixels
//! are overwritten with the sentinel before recovery, and recovered matrices
//! are clamped back to 8 bits on save.

use crate::types::{Error, FillMethod, Result, SENTINEL};
use image::{DynamicImage, ImageBuffer, ImageReader, Luma};
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Load an image as a single-channel matrix normalized to [0, 1]
pub fn load_gray(path: &Path) -> Result<Array2<f32>> {
    let mut reader = ImageReader::open(path)?;
    reader.no_limits();
    let img = reader.decode()?;

    match img {
        DynamicImage::ImageLuma8(buf) => {
            let (width, height) = buf.dimensions();
            to_normalized(buf.into_raw(), (height as usize, width as usize), 255.0)
        }
        DynamicImage::ImageLuma16(buf) => {
            let (width, height) = buf.dimensions();
            to_normalized(buf.into_raw(), (height as usize, width as usize), 65535.0)
        }
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) | DynamicImage::ImageLumaA8(_) => {
            let gray = img.to_luma8();
            let (width, height) = gray.dimensions();
            to_normalized(gray.into_raw(), (height as usize, width as usize), 255.0)
        }
        DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageLumaA16(_) => {
            let gray = img.to_luma16();
            let (width, height) = gray.dimensions();
            to_normalized(gray.into_raw(), (height as usize, width as usize), 65535.0)
        }
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported image format: {:?}",
            img.color()
        ))),
    }
}

fn to_normalized<T: Into<f32> + Copy>(
    raw: Vec<T>,
    dims: (usize, usize),
    max: f32,
) -> Result<Array2<f32>> {
    let values: Vec<f32> = raw.into_iter().map(|v| v.into() / max).collect();
    Array2::from_shape_vec(dims, values)
        .map_err(|e| Error::Processing(format!("Array shape error: {}", e)))
}

/// Mark every pixel where `mask` is zero as part of the hole
pub fn merge_mask(image: &Array2<f32>, mask: &Array2<f32>) -> Result<Array2<f32>> {
    if image.dim() != mask.dim() {
        return Err(Error::DimensionMismatch {
            image: image.dim(),
            mask: mask.dim(),
        });
    }

    let mut merged = image.clone();
    merged.zip_mut_with(mask, |v, &m| {
        if m == 0.0 {
            *v = SENTINEL;
        }
    });
    Ok(merged)
}

/// Load an image and its mask and merge them into one matrix
pub fn load_with_mask(image_path: &Path, mask_path: &Path) -> Result<Array2<f32>> {
    let image = load_gray(image_path)?;
    let mask = load_gray(mask_path)?;
    merge_mask(&image, &mask)
}

/// Save a matrix as an 8-bit grayscale image.
///
/// Values are clamped to [0, 1]; cells still holding the sentinel become 0.
pub fn save_gray(path: &Path, image: &Array2<f32>) -> Result<()> {
    let (height, width) = (image.nrows() as u32, image.ncols() as u32);
    let raw: Vec<u8> = image
        .iter()
        .map(|&v| {
            if v == SENTINEL {
                0
            } else {
                (v.clamp(0.0, 1.0) * 255.0).round() as u8
            }
        })
        .collect();

    let buf = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, raw)
        .ok_or_else(|| Error::Processing("Failed to create image buffer".to_string()))?;
    DynamicImage::ImageLuma8(buf).save(path)?;
    Ok(())
}

/// Generate output filename based on input and method
pub fn generate_output_path(input: &Path, method: FillMethod) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Invalid input filename",
            ))
        })?;

    let parent = input.parent().unwrap_or_else(|| Path::new("."));

    // 8-bit output; lossy inputs are written back as PNG
    let extension = match input.extension().and_then(|s| s.to_str()) {
        Some(ext) if matches!(ext.to_lowercase().as_str(), "png" | "tif" | "tiff") => ext,
        _ => "png",
    };

    Ok(parent.join(format!("{}_filled_{}.{}", stem, method.name(), extension)))
}
