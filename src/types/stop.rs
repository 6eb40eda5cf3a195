//! Brightness stops - the mapping from brightness ranges to symbols.
//!
//! A stop assigns a glyph or bitmap plus colours to a position on the
//! brightness axis. The stop collection is kept sorted ascending by
//! percentage at all times; equal percentages keep their insertion order.
//! Stop ids are stable across reorder, so an external editor can address
//! stops while the user drags them around.

use serde::{Deserialize, Serialize};

use super::Colour;

/// What a stop draws: a text glyph or a bitmap stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StopKind {
    /// A glyph string drawn as text.
    Character(String),
    /// A handle naming a bitmap known to the renderer.
    Bitmap(String),
}

/// A single brightness stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Stable identifier, unique within a set, survives reorder.
    #[serde(default)]
    pub id: u32,

    /// Position on the brightness axis, 0-100.
    pub percentage: f32,

    /// Glyph or bitmap payload.
    #[serde(flatten)]
    pub kind: StopKind,

    /// Foreground colour.
    pub foreground: Colour,

    /// Background colour; `None` means no background rect is drawn.
    #[serde(default)]
    pub background: Option<Colour>,
}

/// An ordered collection of stops.
///
/// Invariant: `stops` is always sorted ascending by percentage (stable
/// sort, so equal percentages resolve by insertion order).
#[derive(Debug, Clone, Default)]
pub struct StopSet {
    stops: Vec<Stop>,
    next_id: u32,
}

impl StopSet {
    /// Create an empty stop set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of stops, assigning fresh ids in list order
    /// and then sorting by percentage.
    pub fn from_stops(stops: impl IntoIterator<Item = (f32, StopKind, Colour, Option<Colour>)>) -> Self {
        let mut set = Self::new();
        for (percentage, kind, foreground, background) in stops {
            set.add(percentage, kind, foreground, background);
        }
        set
    }

    /// Add a stop, returning its id.
    pub fn add(
        &mut self,
        percentage: f32,
        kind: StopKind,
        foreground: Colour,
        background: Option<Colour>,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.stops.push(Stop {
            id,
            percentage: percentage.clamp(0.0, 100.0),
            kind,
            foreground,
            background,
        });
        self.resort();
        id
    }

    /// Remove a stop by id. Returns true if it existed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.stops.len();
        self.stops.retain(|s| s.id != id);
        self.stops.len() != before
    }

    /// Move a stop to a new percentage, re-sorting the set.
    pub fn set_percentage(&mut self, id: u32, percentage: f32) -> bool {
        let Some(stop) = self.stops.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        stop.percentage = percentage.clamp(0.0, 100.0);
        self.resort();
        true
    }

    /// Stops in ascending percentage order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Look up a stop by id.
    pub fn get(&self, id: u32) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// Parse a YAML stops file.
    ///
    /// The file is a list of stops without ids; ids are assigned in list
    /// order before sorting, so ties resolve the way the file reads.
    pub fn from_yaml(source: &str) -> crate::error::Result<Self> {
        let raw: Vec<Stop> = serde_yaml::from_str(source).map_err(|e| {
            crate::error::StippleError::Parse {
                message: format!("Invalid stops file: {}", e),
                help: Some(
                    "Expected a YAML list of stops with percentage, kind, value, \
                     foreground, and optional background"
                        .to_string(),
                ),
            }
        })?;

        let mut set = Self::new();
        for stop in raw {
            set.add(stop.percentage, stop.kind, stop.foreground, stop.background);
        }
        Ok(set)
    }

    fn resort(&mut self) {
        self.stops
            .sort_by(|a, b| a.percentage.partial_cmp(&b.percentage).unwrap_or(std::cmp::Ordering::Equal));
    }
}
