//! Core domain types for stipple.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGBA colour values with derived metrics
//! - `Sample` - a point extracted from an image
//! - `Stop` / `StopSet` - brightness-indexed symbol assignments
//! - `Anchor` - placement tokens for glyphs and boxes

mod anchor;
mod colour;
mod sample;
mod stop;

pub use anchor::Anchor;
pub use colour::Colour;
pub use sample::{GridCell, MergeExtent, Sample};
pub use stop::{Stop, StopKind, StopSet};
