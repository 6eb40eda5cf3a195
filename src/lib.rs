//! stipple - Raster to drawable-record pipeline
//!
//! A library for converting raster images into sparse, symbolic
//! representations: spatial sampling, colour quantization with error
//! diffusion, brightness-ordered stop assignment with adjacent-cell
//! merging, and deterministic multi-scale displacement.
//!
//! The output is a list of [`DrawableRecord`]s - shapes, glyphs, and
//! bitmap stamps with resolved positions and colours - for an external
//! vector or raster renderer to draw.

pub mod buffer;
pub mod cli;
pub mod displace;
pub mod error;
pub mod mapper;
pub mod output;
pub mod quantize;
pub mod render;
pub mod sampler;
pub mod types;

pub use buffer::PixelBuffer;
pub use displace::{displace_buffer, noise_at, DisplaceParams};
pub use error::{Result, StippleError};
pub use mapper::{merge_adjacent, resolve, resolve_random, MappedSample, MergeRange};
pub use quantize::{quantize_buffer, quantize_channel, quantize_colour, quantize_samples};
pub use render::{
    render, BackgroundRect, DrawableRecord, QuantizeOptions, QuantizeTarget, RenderOptions,
    ShapeKind,
};
pub use sampler::{sample, SamplerOptions, Strategy};
pub use types::{Anchor, Colour, GridCell, MergeExtent, Sample, Stop, StopKind, StopSet};
