//! Drawable records - the pipeline's output.
//!
//! A record is everything an external vector or raster renderer needs to
//! draw one element. Records carry no back-references to samples or
//! stops; they serialize to JSON for consumption outside the process.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, StippleError};
use crate::types::Colour;

/// Geometric primitive kinds for shape records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
}

impl FromStr for ShapeKind {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "square" => Ok(ShapeKind::Square),
            "diamond" => Ok(ShapeKind::Diamond),
            "triangle" => Ok(ShapeKind::Triangle),
            _ => Err(StippleError::Parse {
                message: format!("Unknown shape kind: {}", s),
                help: Some("Use circle, square, diamond, or triangle".to_string()),
            }),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Triangle => "triangle",
        };
        write!(f, "{}", name)
    }
}

/// Background rect behind a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackgroundRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Colour,
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawableRecord {
    /// A filled primitive centred at (x, y).
    Shape {
        kind: ShapeKind,
        x: f32,
        y: f32,
        size: f32,
        rotation: f32,
        fill: Colour,
    },
    /// A text glyph; (x, y) is the baseline origin.
    Glyph {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        fill: Colour,
        #[serde(skip_serializing_if = "Option::is_none")]
        background: Option<BackgroundRect>,
    },
    /// A bitmap stamp; (x, y) is the top-left corner.
    Bitmap {
        image: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}
