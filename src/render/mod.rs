//! Rendering module for stipple.
//!
//! This module runs the sampling pipeline and turns mapped samples into
//! drawable records for an external renderer.

mod pipeline;
mod record;

pub use pipeline::{render, QuantizeOptions, QuantizeTarget, RenderOptions};
pub use record::{BackgroundRect, DrawableRecord, ShapeKind};
