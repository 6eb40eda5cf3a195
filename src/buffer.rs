//! Pixel buffer - the raster input to the pipeline.
//!
//! A flat row-major RGBA grid. Reads are defensive: coordinates outside
//! the buffer clamp to the nearest edge pixel, and an empty buffer reads
//! as transparent black. Sample positions can legitimately land outside
//! the image after jitter or displacement, so out-of-bounds access is a
//! defined state, not a fault.

use image::RgbaImage;

use crate::types::Colour;

/// A width x height RGBA pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Colour>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single colour.
    pub fn filled(width: u32, height: u32, colour: Colour) -> Self {
        Self {
            width,
            height,
            pixels: vec![colour; (width * height) as usize],
        }
    }

    /// Create a buffer from raw RGBA bytes (row-major, 4 bytes per pixel).
    ///
    /// Returns an empty buffer if the byte count doesn't match the
    /// dimensions.
    pub fn from_rgba_bytes(width: u32, height: u32, data: &[u8]) -> Self {
        let expected = (width * height * 4) as usize;
        if data.len() != expected {
            return Self::filled(0, 0, Colour::TRANSPARENT);
        }

        let pixels = data
            .chunks_exact(4)
            .map(|p| Colour::new(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer from a decoded image.
    pub fn from_image(image: &RgbaImage) -> Self {
        Self::from_rgba_bytes(image.width(), image.height(), image.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get a pixel at integer coordinates.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Set a pixel at integer coordinates. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = colour;
        }
    }

    /// Read the pixel nearest to a continuous position, clamping the
    /// coordinates into the buffer. An empty buffer reads as transparent
    /// black.
    pub fn get_clamped(&self, x: f32, y: f32) -> Colour {
        if self.is_empty() {
            return Colour::TRANSPARENT;
        }
        let cx = (x.floor().max(0.0) as u32).min(self.width - 1);
        let cy = (y.floor().max(0.0) as u32).min(self.height - 1);
        self.pixels[(cy * self.width + cx) as usize]
    }

    /// Bilinearly interpolate the colour at a continuous position.
    ///
    /// Used by the displacement UV remap. Coordinates clamp to the buffer
    /// edge; an empty buffer reads as transparent black.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Colour {
        if self.is_empty() {
            return Colour::TRANSPARENT;
        }

        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = x - x0 as f32;
        let ty = y - y0 as f32;

        let p00 = self.pixels[(y0 * self.width + x0) as usize];
        let p10 = self.pixels[(y0 * self.width + x1) as usize];
        let p01 = self.pixels[(y1 * self.width + x0) as usize];
        let p11 = self.pixels[(y1 * self.width + x1) as usize];

        let lerp2 = |a: u8, b: u8, c: u8, d: u8| -> u8 {
            let top = a as f32 + (b as f32 - a as f32) * tx;
            let bottom = c as f32 + (d as f32 - c as f32) * tx;
            (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8
        };

        Colour::new(
            lerp2(p00.r, p10.r, p01.r, p11.r),
            lerp2(p00.g, p10.g, p01.g, p11.g),
            lerp2(p00.b, p10.b, p01.b, p11.b),
            lerp2(p00.a, p10.a, p01.a, p11.a),
        )
    }

    /// Iterate over all pixels with their positions, row-major.
    pub fn iter_pixels(&self) -> impl Iterator<Item = (u32, u32, Colour)> + '_ {
        self.pixels.iter().enumerate().map(move |(i, &c)| {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            (x, y, c)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled() {
        let buffer = PixelBuffer::filled(3, 2, Colour::WHITE);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.get(2, 1), Some(Colour::WHITE));
        assert_eq!(buffer.get(3, 0), None);
    }

    #[test]
    fn test_from_rgba_bytes() {
        let data = [255, 0, 0, 255, 0, 255, 0, 255];
        let buffer = PixelBuffer::from_rgba_bytes(2, 1, &data);

        assert_eq!(buffer.get(0, 0), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(buffer.get(1, 0), Some(Colour::rgb(0, 255, 0)));
    }

    #[test]
    fn test_from_rgba_bytes_wrong_length() {
        let buffer = PixelBuffer::from_rgba_bytes(2, 2, &[0, 0, 0]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_get_clamped_in_bounds() {
        let mut buffer = PixelBuffer::filled(2, 2, Colour::BLACK);
        buffer.set(1, 1, Colour::WHITE);

        assert_eq!(buffer.get_clamped(1.7, 1.2), Colour::WHITE);
        assert_eq!(buffer.get_clamped(0.0, 0.0), Colour::BLACK);
    }

    #[test]
    fn test_get_clamped_out_of_bounds() {
        let buffer = PixelBuffer::filled(2, 2, Colour::WHITE);

        assert_eq!(buffer.get_clamped(-10.0, -10.0), Colour::WHITE);
        assert_eq!(buffer.get_clamped(100.0, 0.0), Colour::WHITE);
    }

    #[test]
    fn test_get_clamped_empty_buffer() {
        let buffer = PixelBuffer::filled(0, 0, Colour::WHITE);
        assert_eq!(buffer.get_clamped(5.0, 5.0), Colour::TRANSPARENT);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut buffer = PixelBuffer::filled(2, 1, Colour::BLACK);
        buffer.set(1, 0, Colour::WHITE);

        let mid = buffer.sample_bilinear(0.5, 0.0);
        assert_eq!(mid, Colour::new(128, 128, 128, 255));
    }

    #[test]
    fn test_bilinear_exact_pixel() {
        let mut buffer = PixelBuffer::filled(3, 3, Colour::BLACK);
        buffer.set(1, 1, Colour::rgb(10, 20, 30));

        assert_eq!(buffer.sample_bilinear(1.0, 1.0), Colour::rgb(10, 20, 30));
    }

    #[test]
    fn test_bilinear_clamps_to_edge() {
        let buffer = PixelBuffer::filled(2, 2, Colour::rgb(7, 7, 7));
        assert_eq!(buffer.sample_bilinear(-3.0, 50.0), Colour::rgb(7, 7, 7));
    }

    #[test]
    fn test_iter_pixels_row_major() {
        let data = [1, 0, 0, 255, 2, 0, 0, 255, 3, 0, 0, 255, 4, 0, 0, 255];
        let buffer = PixelBuffer::from_rgba_bytes(2, 2, &data);

        let positions: Vec<(u32, u32, u8)> =
            buffer.iter_pixels().map(|(x, y, c)| (x, y, c.r)).collect();
        assert_eq!(
            positions,
            vec![(0, 0, 1), (1, 0, 2), (0, 1, 3), (1, 1, 4)]
        );
    }
}
