//! Brightness-to-stop resolution and adjacent-cell merging.
//!
//! Resolution maps a sample's brightness onto the stop axis and picks the
//! nearest bracketing stop. Merging then collapses square blocks of
//! same-stop cells into single averaged samples, greedily: each origin
//! grows its square until the first failure and never backtracks to try
//! a better origin.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;

use crate::types::{Colour, MergeExtent, Sample, Stop, StopSet};

/// A sample paired with its resolved stop id, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedSample {
    pub sample: Sample,
    pub stop_id: Option<u32>,
}

/// Bounds for adjacent-cell merging, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub min: u32,
    pub max: u32,
}

impl MergeRange {
    /// Clamp to a usable range: min at least 1, max at least min.
    /// Degenerate configuration degrades instead of failing.
    pub fn normalized(self) -> Self {
        let min = self.min.max(1);
        Self {
            min,
            max: self.max.max(min),
        }
    }
}

/// Resolve a brightness value to a stop.
///
/// Returns `None` only for an empty stop set - nothing to draw, not an
/// error. Brightness below the first stop maps to the first, above the
/// last to the last; between two stops the closer one wins, and an exact
/// midpoint goes to the lower-indexed stop.
pub fn resolve(brightness: f32, stops: &StopSet) -> Option<&Stop> {
    let list = stops.stops();
    if list.is_empty() {
        return None;
    }

    let p = brightness.clamp(0.0, 1.0) * 100.0;

    let upper = match list.iter().position(|s| s.percentage >= p) {
        None => return list.last(),
        Some(0) => return list.first(),
        Some(i) => i,
    };
    let lower = upper - 1;

    if p - list[lower].percentage <= list[upper].percentage - p {
        Some(&list[lower])
    } else {
        Some(&list[upper])
    }
}

/// Pick a uniformly random stop, ignoring brightness.
///
/// The randomized-assignment creative mode. Draws from the caller's
/// seeded RNG so the pick order stays reproducible.
pub fn resolve_random<'a>(stops: &'a StopSet, rng: &mut StdRng) -> Option<&'a Stop> {
    if stops.is_empty() {
        return None;
    }
    Some(&stops.stops()[rng.gen_range(0..stops.len())])
}

/// Merge adjacent same-stop cells into square blocks.
///
/// Samples are grouped by (col, row, stop id). Each unprocessed cell, in
/// insertion order, tries to grow a square from `range.min` up to
/// `range.max`; a size is accepted iff every cell of the block exists,
/// shares the stop, and is unprocessed. The search stops at the first
/// failure, keeping the largest accepted size. Accepted blocks emit one
/// averaged sample; everything else passes through with extent 1.
pub fn merge_adjacent(mapped: Vec<MappedSample>, range: MergeRange) -> Vec<MappedSample> {
    let range = range.normalized();

    // Cell -> index lookup for block membership tests
    let mut by_cell: HashMap<(u32, u32), usize> = HashMap::new();
    for (i, m) in mapped.iter().enumerate() {
        if let Some(cell) = m.sample.cell {
            by_cell.insert((cell.col, cell.row), i);
        }
    }

    let mut processed = vec![false; mapped.len()];
    let mut out = Vec::with_capacity(mapped.len());

    for i in 0..mapped.len() {
        if processed[i] {
            continue;
        }
        processed[i] = true;

        let (cell, stop_id) = match (mapped[i].sample.cell, mapped[i].stop_id) {
            (Some(cell), Some(stop_id)) => (cell, stop_id),
            _ => {
                // No grid cell or no stop: nothing to merge with
                let mut m = mapped[i].clone();
                m.sample.merge = Some(MergeExtent::SINGLE);
                out.push(m);
                continue;
            }
        };

        // Grow the square until the first failure
        let mut accepted = 1;
        for size in range.min..=range.max {
            if block_fits(&mapped, &by_cell, &processed, i, cell.col, cell.row, stop_id, size) {
                accepted = size;
            } else {
                break;
            }
        }

        if accepted < range.min {
            let mut m = mapped[i].clone();
            m.sample.merge = Some(MergeExtent::SINGLE);
            out.push(m);
            continue;
        }

        // Collect and retire the block, then emit one averaged sample
        let mut members = Vec::with_capacity((accepted * accepted) as usize);
        for dy in 0..accepted {
            for dx in 0..accepted {
                let index = by_cell[&(cell.col + dx, cell.row + dy)];
                processed[index] = true;
                members.push(index);
            }
        }

        out.push(MappedSample {
            sample: average_block(&mapped, &members, cell.col, cell.row, accepted),
            stop_id: Some(stop_id),
        });
    }

    out
}

/// Check that an s x s block anchored at (col, row) is fully populated
/// with unprocessed cells of the same stop. The origin itself is exempt
/// from the processed check.
#[allow(clippy::too_many_arguments)]
fn block_fits(
    mapped: &[MappedSample],
    by_cell: &HashMap<(u32, u32), usize>,
    processed: &[bool],
    origin: usize,
    col: u32,
    row: u32,
    stop_id: u32,
    size: u32,
) -> bool {
    for dy in 0..size {
        for dx in 0..size {
            let Some(&index) = by_cell.get(&(col + dx, row + dy)) else {
                return false;
            };
            if index != origin && processed[index] {
                return false;
            }
            if mapped[index].stop_id != Some(stop_id) {
                return false;
            }
        }
    }
    true
}

/// Average a block of samples: arithmetic mean position and brightness,
/// rounded mean colour channels, saturation recomputed from the averaged
/// colour.
fn average_block(
    mapped: &[MappedSample],
    members: &[usize],
    col: u32,
    row: u32,
    size: u32,
) -> Sample {
    let n = members.len() as f32;
    let mut x = 0.0;
    let mut y = 0.0;
    let mut r = 0.0;
    let mut g = 0.0;
    let mut b = 0.0;
    let mut a = 0.0;
    let mut brightness = 0.0;

    for &index in members {
        let s = &mapped[index].sample;
        x += s.x;
        y += s.y;
        r += s.colour.r as f32;
        g += s.colour.g as f32;
        b += s.colour.b as f32;
        a += s.colour.a as f32;
        brightness += s.brightness;
    }

    let colour = Colour::new(
        (r / n).round() as u8,
        (g / n).round() as u8,
        (b / n).round() as u8,
        (a / n).round() as u8,
    );

    Sample {
        x: x / n,
        y: y / n,
        colour,
        brightness: brightness / n,
        saturation: colour.saturation(),
        cell: Some(crate::types::GridCell { col, row }),
        merge: Some(MergeExtent::square(size)),
    }
}
