//! Colour quantization with optional Floyd-Steinberg error diffusion.
//!
//! Quantization reduces each channel to `levels` evenly spaced values
//! spanning [0, 255] exactly. Each input maps to the nearest representable
//! output (half-way cases round up), so every output value is a fixed
//! point and re-quantizing is a no-op.
//!
//! Error diffusion runs in strict raster order (ascending row, then
//! column). The scan order is part of the contract: diffusion is not
//! commutative, and reordering it changes the output bit-for-bit.

use crate::buffer::PixelBuffer;
use crate::types::{Colour, Sample};

/// Error-diffusion weights: right 7/16, bottom-left 3/16, bottom 5/16,
/// bottom-right 1/16.
const DIFFUSION: [(i64, i64, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Quantize a single channel value to `levels` evenly spaced outputs.
///
/// `levels` is clamped to [2, 256]. The input may carry accumulated
/// diffusion error, so it is clamped to [0, 255] first. The value snaps
/// to the nearest level (half-way cases round up, so 128 at two levels
/// goes to 255), and each output re-quantizes to itself.
pub fn quantize_channel(value: f32, levels: u16) -> u8 {
    let levels = levels.clamp(2, 256) as u32;
    let value = value.clamp(0.0, 255.0);

    let step = 255.0 / (levels - 1) as f32;
    let level = (value / step).round().min((levels - 1) as f32);
    (level * step).round() as u8
}

/// Flat-quantize a colour's RGB channels. Alpha is untouched.
pub fn quantize_colour(colour: Colour, levels: u16) -> Colour {
    Colour::new(
        quantize_channel(colour.r as f32, levels),
        quantize_channel(colour.g as f32, levels),
        quantize_channel(colour.b as f32, levels),
        colour.a,
    )
}

/// Quantize a raster buffer in place, with optional error diffusion.
pub fn quantize_buffer(buffer: &mut PixelBuffer, levels: u16, dither: bool) {
    if buffer.is_empty() {
        return;
    }

    if !dither {
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                if let Some(c) = buffer.get(x, y) {
                    buffer.set(x, y, quantize_colour(c, levels));
                }
            }
        }
        return;
    }

    let width = buffer.width() as i64;
    let height = buffer.height() as i64;

    // Working buffer with f32 channels for error accumulation
    let mut work: Vec<[f32; 3]> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let c = buffer.get(x as u32, y as u32).unwrap_or(Colour::TRANSPARENT);
            [c.r as f32, c.g as f32, c.b as f32]
        })
        .collect();

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            let old = work[idx];
            let new = [
                quantize_channel(old[0], levels),
                quantize_channel(old[1], levels),
                quantize_channel(old[2], levels),
            ];

            let alpha = buffer.get(x as u32, y as u32).map_or(255, |c| c.a);
            buffer.set(
                x as u32,
                y as u32,
                Colour::new(new[0], new[1], new[2], alpha),
            );

            let err = [
                old[0].clamp(0.0, 255.0) - new[0] as f32,
                old[1].clamp(0.0, 255.0) - new[1] as f32,
                old[2].clamp(0.0, 255.0) - new[2] as f32,
            ];

            for (dx, dy, weight) in &DIFFUSION {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || nx >= width || ny >= height {
                    continue;
                }
                let nidx = (ny * width + nx) as usize;
                for ch in 0..3 {
                    work[nidx][ch] = (work[nidx][ch] + err[ch] * weight).clamp(0.0, 255.0);
                }
            }
        }
    }
}

/// Quantize a sample set in place, with optional error diffusion over the
/// logical (col, row) grid.
///
/// Diffusion requires samples with grid cells; error flowing toward a cell
/// with no sample is dropped, not redistributed. Strategies without cells
/// (random, poisson) should disable dithering upstream - samples without a
/// cell are flat-quantized and take no part in diffusion.
pub fn quantize_samples(samples: &mut [Sample], levels: u16, dither: bool) {
    if !dither {
        for sample in samples.iter_mut() {
            let q = quantize_colour(sample.colour, levels);
            sample.set_colour(q);
        }
        return;
    }

    // Dense (col, row) -> sample index grid for O(1) neighbour lookup
    let mut cols = 0;
    let mut rows = 0;
    for sample in samples.iter() {
        if let Some(cell) = sample.cell {
            cols = cols.max(cell.col as i64 + 1);
            rows = rows.max(cell.row as i64 + 1);
        }
    }

    if cols == 0 || rows == 0 {
        quantize_samples(samples, levels, false);
        return;
    }

    let mut grid: Vec<Option<usize>> = vec![None; (cols * rows) as usize];
    for (i, sample) in samples.iter().enumerate() {
        if let Some(cell) = sample.cell {
            grid[(cell.row as i64 * cols + cell.col as i64) as usize] = Some(i);
        }
    }

    let mut work: Vec<[f32; 3]> = samples
        .iter()
        .map(|s| [s.colour.r as f32, s.colour.g as f32, s.colour.b as f32])
        .collect();

    // Raster order over the logical grid, not sample insertion order
    for row in 0..rows {
        for col in 0..cols {
            let Some(idx) = grid[(row * cols + col) as usize] else {
                continue;
            };

            let old = work[idx];
            let new = [
                quantize_channel(old[0], levels),
                quantize_channel(old[1], levels),
                quantize_channel(old[2], levels),
            ];

            let alpha = samples[idx].colour.a;
            samples[idx].set_colour(Colour::new(new[0], new[1], new[2], alpha));

            let err = [
                old[0].clamp(0.0, 255.0) - new[0] as f32,
                old[1].clamp(0.0, 255.0) - new[1] as f32,
                old[2].clamp(0.0, 255.0) - new[2] as f32,
            ];

            for (dx, dy, weight) in &DIFFUSION {
                let ncol = col + dx;
                let nrow = row + dy;
                if ncol < 0 || ncol >= cols || nrow >= rows {
                    continue;
                }
                // Missing neighbour: the error is lost, not rerouted
                let Some(nidx) = grid[(nrow * cols + ncol) as usize] else {
                    continue;
                };
                for ch in 0..3 {
                    work[nidx][ch] = (work[nidx][ch] + err[ch] * weight).clamp(0.0, 255.0);
                }
            }
        }
    }

    // Samples with no cell sat out the diffusion pass; quantize them flat
    for sample in samples.iter_mut() {
        if sample.cell.is_none() {
            let q = quantize_colour(sample.colour, levels);
            sample.set_colour(q);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridCell;

    #[test]
    fn test_quantize_channel_two_levels() {
        assert_eq!(quantize_channel(0.0, 2), 0);
        assert_eq!(quantize_channel(127.0, 2), 0);
        // 128 sits on the midpoint between the two outputs and rounds up
        assert_eq!(quantize_channel(128.0, 2), 255);
        assert_eq!(quantize_channel(255.0, 2), 255);
    }

    #[test]
    fn test_quantize_channel_spans_full_range() {
        for levels in [2u16, 3, 4, 8, 17, 256] {
            assert_eq!(quantize_channel(0.0, levels), 0);
            assert_eq!(quantize_channel(255.0, levels), 255);
        }
    }

    #[test]
    fn test_quantize_channel_levels_clamped() {
        // levels below 2 clamp to 2 rather than failing
        assert_eq!(quantize_channel(200.0, 0), 255);
        assert_eq!(quantize_channel(50.0, 1), 0);
    }

    #[test]
    fn test_quantize_output_values_are_fixed_points() {
        // Narrow-bucket case: at 28 levels the step is 255/27, so 10
        // snaps to 9 and 9 must stay 9 on a second pass.
        assert_eq!(quantize_channel(10.0, 28), 9);
        assert_eq!(quantize_channel(9.0, 28), 9);
    }

    #[test]
    fn test_quantize_idempotent_all_levels() {
        for levels in 2..=256u16 {
            for value in 0..=255u8 {
                let once = quantize_channel(value as f32, levels);
                let twice = quantize_channel(once as f32, levels);
                assert_eq!(
                    once, twice,
                    "levels={} value={} once={} twice={}",
                    levels, value, once, twice
                );
            }
        }
    }

    #[test]
    fn test_quantize_buffer_flat() {
        let mut buffer = PixelBuffer::filled(2, 2, Colour::rgb(128, 100, 200));
        quantize_buffer(&mut buffer, 2, false);

        assert_eq!(buffer.get(0, 0), Some(Colour::rgb(255, 0, 255)));
        assert_eq!(buffer.get(1, 1), Some(Colour::rgb(255, 0, 255)));
    }

    #[test]
    fn test_quantize_buffer_preserves_alpha() {
        let mut buffer = PixelBuffer::filled(1, 1, Colour::new(128, 128, 128, 42));
        quantize_buffer(&mut buffer, 2, false);
        assert_eq!(buffer.get(0, 0).unwrap().a, 42);
    }

    #[test]
    fn test_dither_preserves_average_tone() {
        // A 16x16 30%-gray field should dither to roughly 30% white
        let gray = (0.3 * 255.0) as u8;
        let mut buffer = PixelBuffer::filled(16, 16, Colour::rgb(gray, gray, gray));
        quantize_buffer(&mut buffer, 2, true);

        let white = buffer
            .iter_pixels()
            .filter(|(_, _, c)| c.r == 255)
            .count();
        let ratio = white as f32 / 256.0;
        assert!(
            (ratio - 0.3).abs() < 0.1,
            "expected ~0.3 white ratio, got {}",
            ratio
        );
    }

    #[test]
    fn test_dither_exact_values_unchanged() {
        let mut black = PixelBuffer::filled(4, 4, Colour::BLACK);
        quantize_buffer(&mut black, 2, true);
        assert!(black.iter_pixels().all(|(_, _, c)| c == Colour::BLACK));

        let mut white = PixelBuffer::filled(4, 4, Colour::WHITE);
        quantize_buffer(&mut white, 2, true);
        assert!(white.iter_pixels().all(|(_, _, c)| c == Colour::WHITE));
    }

    #[test]
    fn test_dither_error_conservation_interior() {
        // For an interior pixel, the redistributed error equals the
        // introduced error: the four weights sum to 16/16.
        let total: f32 = DIFFUSION.iter().map(|(_, _, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-6);

        // Behavioural check: a single mid-gray pixel in the middle of a
        // black field pushes its full error into in-bounds neighbours, so
        // the field's total brightness stays close to the input's.
        let mut buffer = PixelBuffer::filled(5, 5, Colour::BLACK);
        buffer.set(2, 2, Colour::rgb(100, 100, 100));
        let before: f32 = buffer.iter_pixels().map(|(_, _, c)| c.r as f32).sum();

        quantize_buffer(&mut buffer, 2, true);
        let after: f32 = buffer.iter_pixels().map(|(_, _, c)| c.r as f32).sum();

        // 100 quantizes to 0 and the error diffuses until it dissipates
        // below threshold; no new energy appears.
        assert!(after <= before + 1.0);
    }

    #[test]
    fn test_dither_interior_error_fully_redistributed() {
        // Shadow the diffusion bookkeeping on a gray buffer chosen so the
        // accumulation clamp never engages: errors stay within half a step
        // of 127.5, so working values never leave [36, 164]. For every
        // interior pixel the introduced error must be redistributed to
        // in-bounds neighbours in full, and the production pass must agree
        // with the shadow pixel for pixel.
        let size = 6i64;
        let levels = 3;
        let mut work: Vec<f32> = vec![100.0; (size * size) as usize];
        let mut shadow: Vec<u8> = vec![0; (size * size) as usize];

        for y in 0..size {
            for x in 0..size {
                let idx = (y * size + x) as usize;
                let old = work[idx];
                let new = quantize_channel(old, levels);
                shadow[idx] = new;

                let err = old.clamp(0.0, 255.0) - new as f32;
                let mut redistributed = 0.0f32;
                for (dx, dy, weight) in &DIFFUSION {
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx < 0 || nx >= size || ny >= size {
                        continue;
                    }
                    work[(ny * size + nx) as usize] += err * weight;
                    redistributed += err * weight;
                }

                if x > 0 && x < size - 1 && y < size - 1 {
                    assert!(
                        (redistributed - err).abs() < 1e-3,
                        "pixel ({}, {}): introduced {} but redistributed {}",
                        x,
                        y,
                        err,
                        redistributed
                    );
                }
            }
        }

        let mut buffer = PixelBuffer::filled(6, 6, Colour::rgb(100, 100, 100));
        quantize_buffer(&mut buffer, levels, true);
        for (x, y, c) in buffer.iter_pixels() {
            let expected = shadow[(y * 6 + x) as usize];
            assert_eq!((c.r, c.g, c.b), (expected, expected, expected));
        }
    }

    #[test]
    fn test_dither_deterministic() {
        let make = || {
            let mut b = PixelBuffer::filled(8, 8, Colour::rgb(77, 140, 200));
            quantize_buffer(&mut b, 3, true);
            b
        };
        assert_eq!(make(), make());
    }

    fn grid_sample(col: u32, row: u32, value: u8) -> Sample {
        let buffer = PixelBuffer::filled(1, 1, Colour::rgb(value, value, value));
        let mut s = Sample::from_buffer(&buffer, col as f32, row as f32, None);
        s.cell = Some(GridCell { col, row });
        s
    }

    #[test]
    fn test_quantize_samples_flat() {
        let mut samples = vec![grid_sample(0, 0, 128), grid_sample(1, 0, 100)];
        quantize_samples(&mut samples, 2, false);

        assert_eq!(samples[0].colour, Colour::rgb(255, 255, 255));
        assert_eq!(samples[1].colour, Colour::rgb(0, 0, 0));
    }

    #[test]
    fn test_quantize_samples_recomputes_brightness() {
        let mut samples = vec![grid_sample(0, 0, 128)];
        quantize_samples(&mut samples, 2, false);
        assert_eq!(samples[0].brightness, 1.0);
    }

    #[test]
    fn test_quantize_samples_dither_diffuses_right() {
        // 120 quantizes to 0 at two levels, pushing 120 * 7/16 = 52.5
        // right; 120 + 52.5 = 172.5 quantizes to 255.
        let mut samples = vec![grid_sample(0, 0, 120), grid_sample(1, 0, 120)];
        quantize_samples(&mut samples, 2, true);

        assert_eq!(samples[0].colour.r, 0);
        assert_eq!(samples[1].colour.r, 255);
    }

    #[test]
    fn test_quantize_samples_missing_neighbour_drops_error() {
        // Only one sample: all diffused error targets empty cells and is
        // lost, which must not panic or leak anywhere.
        let mut samples = vec![grid_sample(0, 0, 120)];
        quantize_samples(&mut samples, 2, true);
        assert_eq!(samples[0].colour.r, 0);
    }

    #[test]
    fn test_quantize_samples_grid_order_not_insertion_order() {
        // Insertion order is scrambled; diffusion must still run in
        // raster order over (col, row).
        let mut scrambled = vec![
            grid_sample(1, 0, 120),
            grid_sample(0, 0, 120),
        ];
        quantize_samples(&mut scrambled, 2, true);

        // (0,0) processed first despite being listed second
        let first = scrambled.iter().find(|s| s.cell.unwrap().col == 0).unwrap();
        let second = scrambled.iter().find(|s| s.cell.unwrap().col == 1).unwrap();
        assert_eq!(first.colour.r, 0);
        assert_eq!(second.colour.r, 255);
    }

    #[test]
    fn test_quantize_samples_no_cells_falls_back_flat() {
        let buffer = PixelBuffer::filled(1, 1, Colour::rgb(128, 128, 128));
        let mut samples = vec![Sample::from_buffer(&buffer, 0.0, 0.0, None)];
        quantize_samples(&mut samples, 2, true);
        assert_eq!(samples[0].colour.r, 255);
    }
}
