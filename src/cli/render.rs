//! Render command implementation.
//!
//! Decodes an image, runs the sampling pipeline, and writes the drawable
//! records as JSON to stdout or a file.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::buffer::PixelBuffer;
use crate::displace::DisplaceParams;
use crate::error::{Result, StippleError};
use crate::mapper::MergeRange;
use crate::output::{display_path, plural, Printer};
use crate::render::{render, QuantizeOptions, QuantizeTarget, RenderOptions, ShapeKind};
use crate::sampler::{SamplerOptions, Strategy};
use crate::types::{Anchor, StopSet};

/// Largest accepted input file, in bytes.
const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest accepted image dimension, in pixels.
const MAX_DIMENSION: u32 = 4096;

/// Sample an image and emit drawable records as JSON
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input image (PNG, JPEG, GIF, ...)
    pub input: PathBuf,

    /// Stops file (YAML); without one, samples render as plain shapes
    #[arg(long)]
    pub stops: Option<PathBuf>,

    /// Output file for the JSON records; stdout when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Sampling cell size in pixels (Poisson: minimum distance)
    #[arg(long, default_value = "10")]
    pub cell_size: f32,

    /// Sampling strategy: grid, random, stratified, jittered, poisson
    #[arg(long, default_value = "grid")]
    pub strategy: Strategy,

    /// Jitter amplitude as a fraction of cell size (jittered strategy)
    #[arg(long, default_value = "0.4")]
    pub jitter: f32,

    /// Seed for all randomized stages
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Quantize colours to this many levels per channel (2-256)
    #[arg(long)]
    pub levels: Option<u16>,

    /// Diffuse quantization error to neighbours (Floyd-Steinberg)
    #[arg(long)]
    pub dither: bool,

    /// Quantize the sample set instead of the raster
    #[arg(long)]
    pub quantize_samples: bool,

    /// Displacement strength in pixels; 0 disables displacement
    #[arg(long, default_value = "0")]
    pub displace: f32,

    /// Number of displacement noise layers
    #[arg(long, default_value = "3")]
    pub displace_layers: u32,

    /// Falloff exponent for displacement noise
    #[arg(long, default_value = "2")]
    pub displace_exponent: f32,

    /// Merge adjacent same-stop cells into blocks of min..=max cells
    #[arg(long, value_names = ["MIN", "MAX"], num_args = 2)]
    pub merge: Option<Vec<u32>>,

    /// Element anchor: top-left, center, bottom-right, ...
    #[arg(long, default_value = "center")]
    pub anchor: Anchor,

    /// Shape primitive when no stops apply
    #[arg(long, default_value = "circle")]
    pub shape: ShapeKind,

    /// Rotation applied to shape records, in degrees
    #[arg(long, default_value = "0")]
    pub rotation: f32,

    /// Assign stops uniformly at random instead of by brightness
    #[arg(long)]
    pub random_pick: bool,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let printer = Printer::new();

    let buffer = load_image(&args.input)?;
    printer.status(
        "Sampling",
        &format!(
            "{} ({}x{})",
            display_path(&args.input),
            buffer.width(),
            buffer.height()
        ),
    );

    let stops = match &args.stops {
        Some(path) => {
            let source = fs::read_to_string(path).map_err(|e| StippleError::Io {
                path: path.clone(),
                message: format!("Failed to read stops file: {}", e),
            })?;
            StopSet::from_yaml(&source)?
        }
        None => StopSet::new(),
    };

    let options = build_options(&args);
    let records = render(&buffer, &stops, &options);

    let json = serde_json::to_string_pretty(&records).map_err(|e| StippleError::Parse {
        message: format!("Failed to serialize records: {}", e),
        help: None,
    })?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).map_err(|e| StippleError::Io {
                path: path.clone(),
                message: format!("Failed to write output: {}", e),
            })?;
            printer.status(
                "Finished",
                &format!(
                    "{} -> {}",
                    plural(records.len(), "record", "records"),
                    display_path(path)
                ),
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

/// Translate the flag surface into pipeline options.
fn build_options(args: &RenderArgs) -> RenderOptions {
    let quantize = args.levels.map(|levels| QuantizeOptions {
        levels,
        dither: args.dither,
        target: if args.quantize_samples {
            QuantizeTarget::Samples
        } else {
            QuantizeTarget::Raster
        },
    });

    let displace = (args.displace > 0.0).then(|| DisplaceParams {
        layers: args.displace_layers,
        exponent: args.displace_exponent,
        strength: args.displace,
        seed: args.seed as i32,
    });

    let merge = args.merge.as_ref().map(|bounds| MergeRange {
        min: bounds[0],
        max: bounds[1],
    });

    RenderOptions {
        sampler: SamplerOptions {
            cell_size: args.cell_size,
            strategy: args.strategy,
            jitter: args.jitter,
            seed: args.seed,
        },
        quantize,
        displace,
        merge,
        anchor: args.anchor,
        shape: args.shape,
        rotation: args.rotation,
        random_pick: args.random_pick,
    }
}

/// Decode the input image, enforcing file-size and dimension limits.
fn load_image(path: &PathBuf) -> Result<PixelBuffer> {
    let metadata = fs::metadata(path).map_err(|e| StippleError::Io {
        path: path.clone(),
        message: format!("Failed to read file: {}", e),
    })?;

    if metadata.len() > MAX_FILE_BYTES {
        return Err(StippleError::Input {
            message: format!(
                "{} is {} bytes, over the {} byte limit",
                path.display(),
                metadata.len(),
                MAX_FILE_BYTES
            ),
            help: Some("Downscale or re-encode the image first".to_string()),
        });
    }

    let image = image::open(path)
        .map_err(|e| StippleError::Input {
            message: format!("Failed to decode {}: {}", path.display(), e),
            help: Some("Supported formats: PNG, JPEG, GIF, BMP, WebP".to_string()),
        })?
        .to_rgba8();

    if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
        return Err(StippleError::Input {
            message: format!(
                "{} is {}x{}, over the {}px dimension limit",
                path.display(),
                image.width(),
                image.height(),
                MAX_DIMENSION
            ),
            help: Some("Downscale the image first".to_string()),
        });
    }

    Ok(PixelBuffer::from_image(&image))
}
