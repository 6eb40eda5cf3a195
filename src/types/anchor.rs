//! Anchor tokens and placement offsets.
//!
//! An anchor names which point of an element (corner, edge midpoint, or
//! centre) lands on the sample's logical centre. Glyphs and boxes use
//! distinct offset tables: box offsets position a top-left corner, while
//! glyph offsets position a text baseline origin and compensate for the
//! ascent above it.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StippleError};

/// Fraction of the em box above the baseline assumed for glyph placement.
const GLYPH_ASCENT: f32 = 0.8;

/// The nine compass + centre anchor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// Horizontal factor: 0 for left column, -0.5 for centre, -1 for right.
    fn fx(self) -> f32 {
        match self {
            Anchor::TopLeft | Anchor::Left | Anchor::BottomLeft => 0.0,
            Anchor::Top | Anchor::Center | Anchor::Bottom => -0.5,
            Anchor::TopRight | Anchor::Right | Anchor::BottomRight => -1.0,
        }
    }

    /// Vertical factor: 0 for top row, -0.5 for middle, -1 for bottom.
    fn fy(self) -> f32 {
        match self {
            Anchor::TopLeft | Anchor::Top | Anchor::TopRight => 0.0,
            Anchor::Left | Anchor::Center | Anchor::Right => -0.5,
            Anchor::BottomLeft | Anchor::Bottom | Anchor::BottomRight => -1.0,
        }
    }

    /// Offset from the sample centre to the top-left corner of a box
    /// element (bitmap or background rect) of the given extent.
    pub fn box_offset(self, width: f32, height: f32) -> (f32, f32) {
        (self.fx() * width, self.fy() * height)
    }

    /// Offset from the sample centre to the baseline origin of a glyph
    /// drawn at the given em size.
    ///
    /// The vertical factor is shifted by the ascent so that the glyph box,
    /// not the baseline, aligns to the anchor.
    pub fn glyph_offset(self, size: f32) -> (f32, f32) {
        (self.fx() * size, (self.fy() + GLYPH_ASCENT) * size)
    }
}

impl FromStr for Anchor {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "top-left" | "nw" => Ok(Anchor::TopLeft),
            "top" | "n" => Ok(Anchor::Top),
            "top-right" | "ne" => Ok(Anchor::TopRight),
            "left" | "w" => Ok(Anchor::Left),
            "center" | "centre" | "c" => Ok(Anchor::Center),
            "right" | "e" => Ok(Anchor::Right),
            "bottom-left" | "sw" => Ok(Anchor::BottomLeft),
            "bottom" | "s" => Ok(Anchor::Bottom),
            "bottom-right" | "se" => Ok(Anchor::BottomRight),
            _ => Err(StippleError::Parse {
                message: format!("Unknown anchor: {}", s),
                help: Some(
                    "Use one of: top-left, top, top-right, left, center, right, \
                     bottom-left, bottom, bottom-right"
                        .to_string(),
                ),
            }),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::TopLeft => "top-left",
            Anchor::Top => "top",
            Anchor::TopRight => "top-right",
            Anchor::Left => "left",
            Anchor::Center => "center",
            Anchor::Right => "right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::Bottom => "bottom",
            Anchor::BottomRight => "bottom-right",
        };
        write!(f, "{}", name)
    }
}
