//! Spatial sampling strategies.
//!
//! A sampler turns a pixel buffer into a list of sample points under a
//! chosen strategy. All randomness comes from a `StdRng` seeded from the
//! options, so every strategy - including plain random scatter - is
//! reproducible for a given seed.

mod poisson;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PixelBuffer;
use crate::error::{Result, StippleError};
use crate::types::{GridCell, Sample};

/// Default jitter amount for the jittered-grid strategy, as a fraction of
/// the cell size.
pub const DEFAULT_JITTER: f32 = 0.4;

/// Sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One sample per cell, at the cell centre.
    #[default]
    Grid,
    /// Uniformly random positions over the whole buffer, one per cell's
    /// worth of area. No grid cells are assigned.
    Random,
    /// One sample per cell at a uniformly random position inside it.
    Stratified,
    /// Cell centres displaced by independent per-axis jitter.
    Jittered,
    /// Poisson-disk (Bridson) with minimum distance equal to the cell
    /// size. No grid cells are assigned.
    Poisson,
}

impl Strategy {
    /// Whether this strategy assigns logical grid cells - the
    /// precondition for sample-mode dithering.
    pub fn has_cells(self) -> bool {
        matches!(self, Strategy::Grid | Strategy::Stratified | Strategy::Jittered)
    }
}

impl FromStr for Strategy {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(Strategy::Grid),
            "random" => Ok(Strategy::Random),
            "stratified" => Ok(Strategy::Stratified),
            "jittered" => Ok(Strategy::Jittered),
            "poisson" => Ok(Strategy::Poisson),
            _ => Err(StippleError::Parse {
                message: format!("Unknown sampling strategy: {}", s),
                help: Some("Use grid, random, stratified, jittered, or poisson".to_string()),
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Grid => "grid",
            Strategy::Random => "random",
            Strategy::Stratified => "stratified",
            Strategy::Jittered => "jittered",
            Strategy::Poisson => "poisson",
        };
        write!(f, "{}", name)
    }
}

/// Sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerOptions {
    /// Cell size in pixels. Non-positive values yield no samples.
    pub cell_size: f32,
    pub strategy: Strategy,
    /// Jitter amount for [`Strategy::Jittered`], as a fraction of the
    /// cell size. Negative values clamp to zero.
    pub jitter: f32,
    /// Seed for all random draws.
    pub seed: u64,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            strategy: Strategy::Grid,
            jitter: DEFAULT_JITTER,
            seed: 0,
        }
    }
}

/// Produce samples from a buffer under the configured strategy.
///
/// An empty buffer or non-positive cell size is a legitimate
/// nothing-to-render state and returns an empty list.
pub fn sample(buffer: &PixelBuffer, options: &SamplerOptions) -> Vec<Sample> {
    if buffer.is_empty() || options.cell_size <= 0.0 {
        return Vec::new();
    }

    match options.strategy {
        Strategy::Grid => sample_grid(buffer, options.cell_size),
        Strategy::Random => sample_random(buffer, options.cell_size, options.seed),
        Strategy::Stratified => sample_stratified(buffer, options.cell_size, options.seed),
        Strategy::Jittered => {
            sample_jittered(buffer, options.cell_size, options.jitter, options.seed)
        }
        Strategy::Poisson => poisson::sample_poisson(buffer, options.cell_size, options.seed),
    }
}

/// Number of grid columns and rows for a cell size.
fn grid_dims(buffer: &PixelBuffer, cell_size: f32) -> (u32, u32) {
    let cols = (buffer.width() as f32 / cell_size).ceil() as u32;
    let rows = (buffer.height() as f32 / cell_size).ceil() as u32;
    (cols, rows)
}

fn sample_grid(buffer: &PixelBuffer, cell_size: f32) -> Vec<Sample> {
    let (cols, rows) = grid_dims(buffer, cell_size);
    let mut samples = Vec::with_capacity((cols * rows) as usize);

    for row in 0..rows {
        for col in 0..cols {
            let x = (col as f32 + 0.5) * cell_size;
            let y = (row as f32 + 0.5) * cell_size;

            // Last row/col may spill past the buffer; drop those centres
            if x >= buffer.width() as f32 || y >= buffer.height() as f32 {
                continue;
            }

            samples.push(Sample::from_buffer(buffer, x, y, Some(GridCell { col, row })));
        }
    }

    samples
}

fn sample_random(buffer: &PixelBuffer, cell_size: f32, seed: u64) -> Vec<Sample> {
    let (cols, rows) = grid_dims(buffer, cell_size);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity((cols * rows) as usize);

    for _ in 0..cols * rows {
        let x = rng.gen_range(0.0..buffer.width() as f32);
        let y = rng.gen_range(0.0..buffer.height() as f32);
        samples.push(Sample::from_buffer(buffer, x, y, None));
    }

    samples
}

fn sample_stratified(buffer: &PixelBuffer, cell_size: f32, seed: u64) -> Vec<Sample> {
    let (cols, rows) = grid_dims(buffer, cell_size);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity((cols * rows) as usize);

    let max_x = buffer.width() as f32;
    let max_y = buffer.height() as f32;

    for row in 0..rows {
        for col in 0..cols {
            let x = ((col as f32 + rng.gen::<f32>()) * cell_size).clamp(0.0, max_x);
            let y = ((row as f32 + rng.gen::<f32>()) * cell_size).clamp(0.0, max_y);
            samples.push(Sample::from_buffer(buffer, x, y, Some(GridCell { col, row })));
        }
    }

    samples
}

fn sample_jittered(buffer: &PixelBuffer, cell_size: f32, jitter: f32, seed: u64) -> Vec<Sample> {
    let (cols, rows) = grid_dims(buffer, cell_size);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity((cols * rows) as usize);

    // Negative jitter degrades to plain grid centres instead of failing
    let half = jitter.max(0.0) / 2.0 * cell_size;
    let max_x = buffer.width() as f32;
    let max_y = buffer.height() as f32;

    for row in 0..rows {
        for col in 0..cols {
            let cx = (col as f32 + 0.5) * cell_size;
            let cy = (row as f32 + 0.5) * cell_size;
            if cx >= max_x || cy >= max_y {
                continue;
            }

            let x = (cx + rng.gen_range(-half..=half)).clamp(0.0, max_x);
            let y = (cy + rng.gen_range(-half..=half)).clamp(0.0, max_y);
            samples.push(Sample::from_buffer(buffer, x, y, Some(GridCell { col, row })));
        }
    }

    samples
}
