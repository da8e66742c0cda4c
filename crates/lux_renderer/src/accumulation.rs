//! Progressive accumulation of per-frame radiance.
//!
//! The buffer stores the running mean of every frame rendered since the last
//! reset. Frame `f` (0-based) is folded in with [`blend`], so the stored
//! value is always the plain average of frames `0..=f`.

use image::{Rgba, RgbaImage};
use lux_core::Color;
use rayon::prelude::*;

/// Fold the mean of frame `frame_index` into `history`.
///
/// `history` is the average of the previous `frame_index` frames.
#[inline]
pub fn blend(history: Color, frame_index: u32, sample: Color) -> Color {
    let f = frame_index as f32;
    (history * f + sample) / (f + 1.0)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
#[inline]
fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Width x height radiance history, stored row-major with row 0 at the top.
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl AccumulationBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Fold `sample`, the mean of frame `frame_index`, into pixel (x, y).
    pub fn accumulate(&mut self, x: u32, y: u32, frame_index: u32, sample: Color) {
        let i = self.index(x, y);
        self.pixels[i] = blend(self.pixels[i], frame_index, sample);
    }

    /// Parallel iterator over `(row, pixels)` pairs.
    ///
    /// Each row is handed out exactly once, so lanes never share a pixel.
    pub fn rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [Color])> {
        let width = (self.width as usize).max(1);
        self.pixels.par_chunks_mut(width).enumerate()
    }

    /// Clear the history to black.
    pub fn reset(&mut self) {
        self.pixels.fill(Color::ZERO);
    }

    /// Gamma-corrected 8-bit RGBA bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Gamma-corrected image, e.g. for saving to disk.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(color_to_rgba(self.get(x, y))))
    }

    /// Raw linear radiance as interleaved RGB floats.
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::Vec3;

    #[test]
    fn test_blend() {
        let out = blend(Vec3::splat(10.0), 4, Vec3::splat(20.0));
        assert_eq!(out, Vec3::splat(12.0));
    }

    #[test]
    fn test_first_frame_replaces_history() {
        let out = blend(Vec3::splat(123.0), 0, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(out, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_running_mean() {
        let mut buffer = AccumulationBuffer::new(2, 1);
        let frames = [1.0, 5.0, 3.0, 7.0];
        for (f, value) in frames.iter().enumerate() {
            buffer.accumulate(1, 0, f as u32, Vec3::splat(*value));
        }
        assert!((buffer.get(1, 0).x - 4.0).abs() < 1e-6);
        assert_eq!(buffer.get(0, 0), Vec3::ZERO);
    }

    #[test]
    fn test_rows_mut_covers_every_pixel_once() {
        let mut buffer = AccumulationBuffer::new(5, 3);
        buffer.rows_mut().for_each(|(y, row)| {
            assert_eq!(row.len(), 5);
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel += Vec3::new(x as f32, y as f32, 1.0);
            }
        });
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(buffer.get(x, y), Vec3::new(x as f32, y as f32, 1.0));
            }
        }
    }

    #[test]
    fn test_reset() {
        let mut buffer = AccumulationBuffer::new(2, 2);
        buffer.accumulate(1, 1, 0, Vec3::ONE);
        buffer.reset();
        assert!(buffer.pixels().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn test_rgba_conversion() {
        let mut buffer = AccumulationBuffer::new(3, 1);
        buffer.accumulate(0, 0, 0, Vec3::new(0.25, 1.0, 4.0));
        buffer.accumulate(1, 0, 0, Vec3::new(-1.0, 0.0, f32::NAN));

        let bytes = buffer.to_rgba8();
        assert_eq!(bytes.len(), 12);
        // sqrt(0.25) = 0.5, clamped above 1
        assert_eq!(&bytes[0..4], &[127, 255, 255, 255]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 255]);

        let image = buffer.to_image();
        assert_eq!(image.dimensions(), (3, 1));
        assert_eq!(image.get_pixel(0, 0).0, [127, 255, 255, 255]);
    }

    #[test]
    fn test_f32_view() {
        let mut buffer = AccumulationBuffer::new(2, 1);
        buffer.accumulate(1, 0, 0, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buffer.as_f32_slice(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }
}
