//! Hole filler: boundary-weighted recovery of missing pixels in grayscale images
//!
//! A hole is a region of pixels marked with [`types::SENTINEL`]. Each hole
//! pixel is restored as a weighted average of the known pixels bordering the
//! hole. Three interchangeable algorithms trade accuracy for speed: an exact
//! average over the full boundary, a stochastic average over a fixed-size
//! random subset, and a normalized convolution over a crop window.

pub mod detection;
pub mod image_io;
pub mod inpainting;
pub mod parallel;
pub mod types;
pub mod weight;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::time::Instant;
use types::{Connectivity, Error, FillMethod, Pixel, ProcessingConfig, Restoration, Result};
use weight::{DistanceWeight, WeightFunction};

/// Hole and boundary for one recovery call, or `None` when there is no hole
fn prepare(
    image: &Array2<f32>,
    connectivity: Connectivity,
) -> Result<Option<(Vec<Pixel>, Vec<Pixel>)>> {
    let hole = detection::locate_hole(image.view());
    if hole.is_empty() {
        return Ok(None);
    }

    let boundary = detection::find_boundary(&hole, image.dim(), connectivity);
    if boundary.is_empty() {
        return Err(Error::EmptyBoundary {
            hole_pixels: hole.len(),
        });
    }

    Ok(Some((hole, boundary)))
}

/// Fill the hole with the exact weighted average over the whole boundary
pub fn fill_hole<W: WeightFunction + ?Sized>(
    image: &Array2<f32>,
    weight: &W,
    connectivity: Connectivity,
) -> Result<Restoration> {
    match prepare(image, connectivity)? {
        Some((hole, boundary)) => Ok(inpainting::recover_exact(image, &hole, &boundary, weight)),
        None => Ok(Restoration::unchanged(image)),
    }
}

/// Fill the hole from a random subset of `sample_size` boundary pixels.
///
/// Pass a seeded generator for reproducible output.
pub fn fill_hole_fast<W: WeightFunction + ?Sized, R: Rng + ?Sized>(
    image: &Array2<f32>,
    weight: &W,
    connectivity: Connectivity,
    sample_size: usize,
    rng: &mut R,
) -> Result<Restoration> {
    match prepare(image, connectivity)? {
        Some((hole, boundary)) => {
            inpainting::recover_stochastic(image, &hole, &boundary, weight, sample_size, rng)
        }
        None => Ok(Restoration::unchanged(image)),
    }
}

/// Fill the hole by normalized convolution.
///
/// Only accurate for weight functions that depend on the pixel offset alone.
pub fn fill_hole_conv<W: WeightFunction + ?Sized>(
    image: &Array2<f32>,
    weight: &W,
    connectivity: Connectivity,
) -> Result<Restoration> {
    match prepare(image, connectivity)? {
        Some((hole, boundary)) => Ok(inpainting::recover_convolution(
            image, &hole, &boundary, weight,
        )),
        None => Ok(Restoration::unchanged(image)),
    }
}

/// Run the method selected in `config` with the default distance weight
pub fn fill(image: &Array2<f32>, config: &ProcessingConfig) -> Result<Restoration> {
    let weight = DistanceWeight::new(config.z, config.epsilon)?;

    match config.method {
        FillMethod::Exact => fill_hole(image, &weight, config.connectivity),
        FillMethod::Fast => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            fill_hole_fast(
                image,
                &weight,
                config.connectivity,
                config.sample_size,
                &mut rng,
            )
        }
        FillMethod::Conv => fill_hole_conv(image, &weight, config.connectivity),
    }
}

/// Main entry point: load an image and its mask, fill the hole, save the result
///
/// # Arguments
/// * `image_path` - Path to the source image
/// * `mask_path` - Path to the mask; zero-valued mask pixels mark the hole
/// * `output_path` - Path for the restored image
/// * `config` - Processing configuration
///
/// # Returns
/// The restoration, including any hole pixels that could not be filled
pub fn process_image(
    image_path: &Path,
    mask_path: &Path,
    output_path: &Path,
    config: &ProcessingConfig,
) -> Result<Restoration> {
    let start_time = Instant::now();

    if config.show_progress {
        println!("Loading image and mask...");
    }
    let image = image_io::load_with_mask(image_path, mask_path)?;
    let load_time = start_time.elapsed();

    if config.benchmark {
        println!("  Load time: {:.2}s", load_time.as_secs_f32());
    }

    if config.show_progress {
        println!("Filling hole ({} method)...", config.method.name());
    }
    let fill_start = Instant::now();
    let restoration = fill(&image, config)?;
    let fill_time = fill_start.elapsed();

    if config.benchmark {
        println!("  Fill time: {:.2}s", fill_time.as_secs_f32());
    }

    if !restoration.is_complete() {
        log::warn!(
            "{} hole pixels could not be recovered and will be written as 0",
            restoration.unresolved.len()
        );
    }

    if config.show_progress {
        println!("Saving output...");
    }
    let save_start = Instant::now();
    image_io::save_gray(output_path, &restoration.image)?;

    if config.benchmark {
        println!("  Save time: {:.2}s", save_start.elapsed().as_secs_f32());
    }

    if config.show_progress {
        println!(
            "\n✓ Completed in {:.2}s",
            start_time.elapsed().as_secs_f32()
        );
    }

    Ok(restoration)
}
