//! Sample type - a single point extracted from an image.
//!
//! Samples are created by the sampler, mutated in place by the quantizer,
//! and consumed read-only by the stop mapper and record builders. They live
//! for one render pass and are never persisted.

use super::Colour;
use crate::buffer::PixelBuffer;

/// Logical grid cell a sample belongs to.
///
/// Only strategies with a regular grid structure (grid, stratified,
/// jittered) assign cells; random and Poisson samples carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: u32,
    pub row: u32,
}

/// Extent of a merged block of cells, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeExtent {
    pub width: u32,
    pub height: u32,
}

impl MergeExtent {
    /// A single unmerged cell.
    pub const SINGLE: Self = Self {
        width: 1,
        height: 1,
    };

    /// A square block of side `s`.
    pub const fn square(s: u32) -> Self {
        Self {
            width: s,
            height: s,
        }
    }
}

/// A sample point carrying position, colour, and derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Continuous image-space position.
    pub x: f32,
    pub y: f32,

    /// Sampled colour.
    pub colour: Colour,

    /// Luminance-weighted brightness in [0, 1], derived from `colour`.
    pub brightness: f32,

    /// HSV saturation in [0, 1], derived from `colour`.
    pub saturation: f32,

    /// Logical grid cell, when the strategy has one.
    pub cell: Option<GridCell>,

    /// Merge extent, set by adjacent-cell merging.
    pub merge: Option<MergeExtent>,
}

impl Sample {
    /// Create a sample by reading the buffer at (x, y).
    ///
    /// Coordinates are clamped into the buffer, so positions that fall
    /// slightly outside (after jitter or displacement) still read a
    /// defined colour.
    pub fn from_buffer(buffer: &PixelBuffer, x: f32, y: f32, cell: Option<GridCell>) -> Self {
        let colour = buffer.get_clamped(x, y);
        Self {
            x,
            y,
            colour,
            brightness: colour.brightness(),
            saturation: colour.saturation(),
            cell,
            merge: None,
        }
    }

    /// Replace the colour and recompute the derived metrics.
    pub fn set_colour(&mut self, colour: Colour) {
        self.colour = colour;
        self.brightness = colour.brightness();
        self.saturation = colour.saturation();
    }

    /// Merge extent width, defaulting to 1 for unmerged samples.
    pub fn merge_width(&self) -> u32 {
        self.merge.map_or(1, |m| m.width)
    }

    /// Merge extent height, defaulting to 1 for unmerged samples.
    pub fn merge_height(&self) -> u32 {
        self.merge.map_or(1, |m| m.height)
    }
}
