//! The full buffer-to-records pipeline.
//!
//! Phases run in a fixed order: displacement remaps the raster first (so
//! the effect is resolution-independent), raster-mode quantization runs
//! on the displaced image, the sampler extracts points, sample-mode
//! quantization dithers over the logical grid, and finally stops resolve
//! and adjacent cells merge into records. Output order follows sample
//! emission order and is stable for a given configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buffer::PixelBuffer;
use crate::displace::{displace_buffer, DisplaceParams};
use crate::mapper::{merge_adjacent, resolve, resolve_random, MappedSample, MergeRange};
use crate::quantize::{quantize_buffer, quantize_samples};
use crate::sampler::{sample, SamplerOptions};
use crate::types::{Anchor, StopKind, StopSet};

use super::record::{BackgroundRect, DrawableRecord, ShapeKind};

/// Where quantization applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantizeTarget {
    /// Quantize the raster buffer before sampling.
    #[default]
    Raster,
    /// Quantize the sparse sample set on its logical grid.
    Samples,
}

/// Quantization settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeOptions {
    /// Levels per channel, clamped to [2, 256].
    pub levels: u16,
    /// Floyd-Steinberg error diffusion. In sample mode this requires a
    /// strategy that assigns grid cells.
    pub dither: bool,
    pub target: QuantizeTarget,
}

/// Full pipeline configuration. Plain values, no hidden state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub sampler: SamplerOptions,
    pub quantize: Option<QuantizeOptions>,
    pub displace: Option<DisplaceParams>,
    pub merge: Option<MergeRange>,
    pub anchor: Anchor,
    /// Primitive used when no stops are configured.
    pub shape: ShapeKind,
    /// Rotation applied to every shape record, in degrees.
    pub rotation: f32,
    /// Assign stops uniformly at random instead of by brightness.
    pub random_pick: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sampler: SamplerOptions::default(),
            quantize: None,
            displace: None,
            merge: None,
            anchor: Anchor::Center,
            shape: ShapeKind::Circle,
            rotation: 0.0,
            random_pick: false,
        }
    }
}

/// Run the pipeline: raster in, drawable records out.
///
/// Never fails: an empty buffer or degenerate configuration produces an
/// empty record list.
pub fn render(buffer: &PixelBuffer, stops: &StopSet, options: &RenderOptions) -> Vec<DrawableRecord> {
    if buffer.is_empty() {
        return Vec::new();
    }

    // Phase 1: displacement, as a UV remap of the source raster
    let mut working = match &options.displace {
        Some(params) => displace_buffer(buffer, params),
        None => buffer.clone(),
    };

    // Phase 2: raster-mode quantization
    if let Some(q) = &options.quantize {
        if q.target == QuantizeTarget::Raster {
            quantize_buffer(&mut working, q.levels, q.dither);
        }
    }

    // Phase 3: sampling
    let mut samples = sample(&working, &options.sampler);

    // Phase 4: sample-mode quantization
    if let Some(q) = &options.quantize {
        if q.target == QuantizeTarget::Samples {
            quantize_samples(&mut samples, q.levels, q.dither);
        }
    }

    // Phase 5: stop resolution
    let mut rng = StdRng::seed_from_u64(options.sampler.seed);
    let mut mapped: Vec<MappedSample> = samples
        .into_iter()
        .map(|sample| {
            let stop = if options.random_pick {
                resolve_random(stops, &mut rng)
            } else {
                resolve(sample.brightness, stops)
            };
            MappedSample {
                sample,
                stop_id: stop.map(|s| s.id),
            }
        })
        .collect();

    // Phase 6: adjacent-cell merging
    if let Some(range) = options.merge {
        mapped = merge_adjacent(mapped, range);
    }

    // Phase 7: record emission, in sample order
    mapped
        .iter()
        .map(|m| build_record(m, stops, options))
        .collect()
}

/// Build the drawable record for one mapped sample.
fn build_record(mapped: &MappedSample, stops: &StopSet, options: &RenderOptions) -> DrawableRecord {
    let sample = &mapped.sample;
    let cell = options.sampler.cell_size;
    let extent_w = sample.merge_width() as f32 * cell;
    let extent_h = sample.merge_height() as f32 * cell;

    let stop = mapped.stop_id.and_then(|id| stops.get(id));
    let Some(stop) = stop else {
        // No stops configured: direct shape-attribute computation, with
        // darker samples drawing larger primitives
        let size = (1.0 - sample.brightness) * extent_w;
        return DrawableRecord::Shape {
            kind: options.shape,
            x: sample.x,
            y: sample.y,
            size,
            rotation: options.rotation,
            fill: sample.colour,
        };
    };

    match &stop.kind {
        StopKind::Character(text) => {
            let size = extent_w;
            let (gx, gy) = options.anchor.glyph_offset(size);
            let background = stop.background.map(|fill| {
                let (bx, by) = options.anchor.box_offset(extent_w, extent_h);
                BackgroundRect {
                    x: sample.x + bx,
                    y: sample.y + by,
                    width: extent_w,
                    height: extent_h,
                    fill,
                }
            });
            DrawableRecord::Glyph {
                text: text.clone(),
                x: sample.x + gx,
                y: sample.y + gy,
                size,
                fill: stop.foreground,
                background,
            }
        }
        StopKind::Bitmap(image) => {
            let (bx, by) = options.anchor.box_offset(extent_w, extent_h);
            DrawableRecord::Bitmap {
                image: image.clone(),
                x: sample.x + bx,
                y: sample.y + by,
                width: extent_w,
                height: extent_h,
            }
        }
    }
}
