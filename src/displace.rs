//! Deterministic multi-scale displacement noise and UV remapping.
//!
//! The noise is a hashed cell lattice composited across power-of-two
//! scales by running maximum, which produces the characteristic blocky
//! stratified look (a sum would smooth it out). The hash uses 32-bit
//! wrapping arithmetic throughout so the field is bit-reproducible for
//! identical integer inputs on every platform.
//!
//! Displacement is applied as a full-image UV remap before sampling:
//! every destination pixel looks up a displaced source coordinate. This
//! keeps the effect resolution-independent, unlike offsetting sample
//! positions after the fact.

use crate::buffer::PixelBuffer;

/// Parameters for the displacement field. Immutable per render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaceParams {
    /// Number of octave layers, at least 1.
    pub layers: u32,
    /// Contrast exponent; higher values suppress all but the brightest
    /// cells. Must be positive.
    pub exponent: f32,
    /// Displacement amplitude in pixels.
    pub strength: f32,
    /// Noise seed.
    pub seed: i32,
}

impl Default for DisplaceParams {
    fn default() -> Self {
        Self {
            layers: 3,
            exponent: 2.0,
            strength: 12.0,
            seed: 0,
        }
    }
}

/// Hash a lattice cell to a value in [0, 1).
///
/// 32-bit wrapping arithmetic, arithmetic shifts, final reinterpret as
/// unsigned: the exact sequence is part of the output contract.
fn cell_hash(cell_x: i32, cell_y: i32, seed: i32) -> f32 {
    let mut h = seed
        .wrapping_add(cell_x.wrapping_mul(374761393))
        .wrapping_add(cell_y.wrapping_mul(668265263));
    h = (h ^ (h >> 13)).wrapping_mul(1274126177);
    ((h ^ (h >> 16)) as u32) as f32 / 4294967296.0
}

/// Sample the multi-scale noise field at (x, y), in [0, 1].
///
/// Layer L maps the query point onto a grid of `max(1, ref / 2^L)` cells
/// per axis, hashes the cell with `seed + L`, raises the value to
/// `exponent`, and the layers composite by maximum.
pub fn noise_at(x: f32, y: f32, params: &DisplaceParams, ref_width: u32, ref_height: u32) -> f32 {
    let layers = params.layers.max(1);
    let exponent = params.exponent.max(f32::EPSILON);
    let ref_w = ref_width.max(1) as f32;
    let ref_h = ref_height.max(1) as f32;

    let mut value = 0.0f32;
    for layer in 0..layers {
        let scale = 1u32 << layer.min(31);
        let layer_w = (ref_width / scale).max(1);
        let layer_h = (ref_height / scale).max(1);

        let cell_x = (x / ref_w * layer_w as f32).floor() as i32;
        let cell_y = (y / ref_h * layer_h as f32).floor() as i32;

        let h = cell_hash(cell_x, cell_y, params.seed.wrapping_add(layer as i32));
        value = value.max(h.powf(exponent));
    }

    value
}

/// Remap a buffer through the displacement field.
///
/// Each destination pixel reads the source at its own coordinate shifted
/// by `(noise - 0.5) * strength` on both axes, clamped to the buffer and
/// bilinearly interpolated. Returns a new buffer of the same size; the
/// sampler then runs on the displaced image.
pub fn displace_buffer(buffer: &PixelBuffer, params: &DisplaceParams) -> PixelBuffer {
    if buffer.is_empty() || params.strength == 0.0 {
        return buffer.clone();
    }

    let width = buffer.width();
    let height = buffer.height();
    let mut out = PixelBuffer::filled(width, height, crate::types::Colour::TRANSPARENT);

    for y in 0..height {
        for x in 0..width {
            let n = noise_at(x as f32, y as f32, params, width, height);
            let disp = (n - 0.5) * params.strength;
            let colour = buffer.sample_bilinear(x as f32 + disp, y as f32 + disp);
            out.set(x, y, colour);
        }
    }

    out
}
