//! 8-bit RGBA output images and tone reproduction.

use crate::Color;

/// Largest byte-mapping factor that never rounds 1.0 up to 256.
const BYTE_SCALE: f32 = 256.0 - 1.0 / 128.0;

/// Convert linear radiance to display RGBA.
///
/// Each channel is raised to `1/gamma`, clamped to `[0, 1]`, scaled by
/// `256 - 2^-7` and truncated. Alpha is always opaque.
#[inline]
pub fn tone_map(color: Color, gamma: f32) -> [u8; 4] {
    let inv_gamma = 1.0 / gamma;
    let channel = |c: f32| (c.max(0.0).powf(inv_gamma).min(1.0) * BYTE_SCALE) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 0xFF]
}

/// Row-major RGBA image with a stride of `4 · width` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Image {
    /// Create an opaque black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0xFF]; width as usize * height as usize],
        }
    }

    /// The zero-sized image returned by a cancelled render.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        4 * self.width as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let index = self.index(x, y);
        self.pixels[index] = rgba;
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// The whole buffer as a flat byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// One row as bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.index(0, y);
        bytemuck::cast_slice(&self.pixels[start..start + self.width as usize])
    }

    /// Copy all rows of `slice` into this image starting at row `y0`.
    ///
    /// # Panics
    /// If the widths differ or the slice does not fit below `y0`.
    pub fn blit_rows(&mut self, slice: &Image, y0: u32) {
        assert_eq!(slice.width, self.width, "slice width mismatch");
        assert!(y0 + slice.height <= self.height, "slice exceeds image height");
        let start = self.index(0, y0);
        self.pixels[start..start + slice.pixels.len()].copy_from_slice(&slice.pixels);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_map_linear() {
        assert_eq!(tone_map(Color::ZERO, 1.0), [0, 0, 0, 255]);
        assert_eq!(tone_map(Color::ONE, 1.0), [255, 255, 255, 255]);
        assert_eq!(tone_map(Color::splat(0.5), 1.0), [127, 127, 127, 255]);
    }

    #[test]
    fn test_tone_map_clamps_and_ignores_nan() {
        assert_eq!(tone_map(Color::new(4.0, -1.0, f32::NAN), 1.0), [255, 0, 0, 255]);
        assert_eq!(tone_map(Color::splat(f32::INFINITY), 2.2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_tone_map_gamma() {
        // 0.25^(1/2) = 0.5
        assert_eq!(tone_map(Color::splat(0.25), 2.0)[0], 127);
    }

    #[test]
    fn test_stride_and_bytes() {
        let image = Image::new(3, 2);
        assert_eq!(image.stride(), 12);
        assert_eq!(image.as_bytes().len(), 24);
        assert_eq!(image.row(1), &[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_blit_rows() {
        let mut image = Image::new(2, 4);
        let mut slice = Image::new(2, 2);
        slice.set(1, 0, [1, 2, 3, 255]);
        slice.set(0, 1, [4, 5, 6, 255]);

        image.blit_rows(&slice, 2);
        assert_eq!(image.get(1, 2), [1, 2, 3, 255]);
        assert_eq!(image.get(0, 3), [4, 5, 6, 255]);
        assert_eq!(image.get(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_empty_image() {
        let image = Image::empty();
        assert!(image.is_empty());
        assert_eq!(image.stride(), 0);
    }
}
