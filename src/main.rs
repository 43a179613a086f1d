//! Hole filler CLI

use anyhow::{Context, Result};
use clap::Parser;
use hole_filler::{
    image_io, process_image,
    types::{Connectivity, FillMethod, ProcessingConfig, DEFAULT_SAMPLE_SIZE},
};
use std::path::PathBuf;

/// Fill a masked hole in a grayscale image from its surrounding pixels
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source image file (PNG, JPEG, TIFF)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Mask image of the same size; zero-valued pixels mark the hole
    #[arg(value_name = "MASK")]
    mask: PathBuf,

    /// Distance exponent of the weight function
    #[arg(short = 'z', long, default_value = "3")]
    z: i32,

    /// Regularizing offset of the weight function
    #[arg(short = 'e', long, default_value = "0.01")]
    epsilon: f64,

    /// Boundary connectivity: 4 or 8
    #[arg(short = 'c', long, default_value = "8")]
    connectivity: String,

    /// Recovery method: exact, fast or conv
    #[arg(short = 'm', long, default_value = "exact")]
    method: String,

    /// Boundary sample size for the fast method
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    samples: usize,

    /// Random seed for the fast method (results vary between runs without it)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file (default: IMAGE_filled_METHOD.EXT)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Show detailed timing information
    #[arg(long)]
    benchmark: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.image.exists() {
        anyhow::bail!("Input image does not exist: {}", cli.image.display());
    }
    if !cli.mask.exists() {
        anyhow::bail!("Mask does not exist: {}", cli.mask.display());
    }

    let connectivity: Connectivity = cli
        .connectivity
        .parse()
        .context("Invalid --connectivity")?;
    let method: FillMethod = cli.method.parse().context("Invalid --method")?;

    let output_path = match cli.output {
        Some(out) => out,
        None => image_io::generate_output_path(&cli.image, method)
            .context("Failed to generate output path")?,
    };

    let config = ProcessingConfig {
        connectivity,
        method,
        z: cli.z,
        epsilon: cli.epsilon,
        sample_size: cli.samples,
        seed: cli.seed,
        show_progress: !cli.quiet,
        benchmark: cli.benchmark,
    };

    if !cli.quiet {
        println!("hole-filler v{}", env!("CARGO_PKG_VERSION"));
        println!("Image:  {}", cli.image.display());
        println!("Mask:   {}", cli.mask.display());
        println!("Output: {}\n", output_path.display());
    }

    let restoration = process_image(&cli.image, &cli.mask, &output_path, &config)
        .context("Processing failed")?;

    if !cli.quiet {
        let total = restoration.image.len();
        println!(
            "\nSuccess! {}x{} image written",
            restoration.image.ncols(),
            restoration.image.nrows()
        );
        if !restoration.is_complete() {
            println!(
                "  {} of {} pixels left unfilled (zero accumulated weight)",
                restoration.unresolved.len(),
                total
            );
        }
    }

    Ok(())
}
