//! Two-dimensional textures over `(u, v)`.
//!
//! Materials multiply a texture into the value of a scattering component.
//! Image textures are decoded with the `image` crate into linear RGB and
//! cached by path so several materials can share one decode.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use thiserror::Error;

use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A texture lookup.
#[derive(Debug, Clone)]
pub enum Texture {
    /// The same colour everywhere.
    Constant(Color),
    /// Alternating squares, `scale` squares per unit of `u` and `v`.
    Checker { scale: f32, even: Color, odd: Color },
    /// A decoded image, bilinearly filtered with wrapped coordinates.
    Image(Arc<ImageTexture>),
}

impl Texture {
    pub fn evaluate(&self, uv: Vec2) -> Color {
        match self {
            Texture::Constant(color) => *color,
            Texture::Checker { scale, even, odd } => {
                let cell = (uv.x * scale).floor() as i64 + (uv.y * scale).floor() as i64;
                if cell.rem_euclid(2) == 0 {
                    *even
                } else {
                    *odd
                }
            }
            Texture::Image(image) => image.sample(uv),
        }
    }
}

/// Decoded image in linear RGB, rows stored top first.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    path: String,
}

impl ImageTexture {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>, path: impl Into<String>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bilinear lookup between texel centres. Both axes wrap, and `v = 0`
    /// is the bottom row.
    pub fn sample(&self, uv: Vec2) -> Color {
        let (w, h) = (self.width as i64, self.height as i64);
        let sx = uv.x * w as f32 - 0.5;
        let sy = (1.0 - uv.y) * h as f32 - 0.5;
        let (cx, cy) = (sx.floor(), sy.floor());
        let (fx, fy) = (sx - cx, sy - cy);
        let (cx, cy) = (cx as i64, cy as i64);

        let texel = |dx: i64, dy: i64| {
            let x = (cx + dx).rem_euclid(w);
            let y = (cy + dy).rem_euclid(h);
            self.pixels[(y * w + x) as usize]
        };

        let upper = texel(0, 0).lerp(texel(1, 0), fx);
        let lower = texel(0, 1).lerp(texel(1, 1), fx);
        upper.lerp(lower, fy)
    }

    /// Memory held by the decoded pixels.
    pub fn size_bytes(&self) -> usize {
        std::mem::size_of_val(self.pixels.as_slice())
    }
}

/// Decoded image textures, shared by every material that names the same file.
#[derive(Debug, Default)]
pub struct TextureCache {
    base_dir: PathBuf,
    loaded: HashMap<PathBuf, Arc<ImageTexture>>,
}

impl TextureCache {
    /// Cache resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache resolving relative paths against `base_dir`, normally the
    /// directory of the scene file.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            loaded: HashMap::new(),
        }
    }

    /// Decode `path` on first use; later calls share the same texture.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageTexture>> {
        let resolved = self.base_dir.join(path);
        if let Some(texture) = self.loaded.get(&resolved) {
            return Ok(Arc::clone(texture));
        }

        let texture = Arc::new(decode(&resolved)?);
        log::debug!(
            "Decoded {} ({}x{}, {} KiB)",
            texture.path(),
            texture.width(),
            texture.height(),
            texture.size_bytes() / 1024
        );
        self.loaded.insert(resolved, Arc::clone(&texture));
        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

fn decode(path: &Path) -> TextureResult<ImageTexture> {
    let name = path.display().to_string();
    let rgb = image::open(path)
        .map_err(|source| TextureError::Load {
            path: name.clone(),
            source,
        })?
        .into_rgb8();

    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty(name));
    }

    let pixels = rgb
        .pixels()
        .map(|&image::Rgb([r, g, b])| Color::new(decode_srgb(r), decode_srgb(g), decode_srgb(b)))
        .collect();
    Ok(ImageTexture::new(width, height, pixels, name))
}

/// sRGB transfer function, byte to linear.
fn decode_srgb(byte: u8) -> f32 {
    let c = f32::from(byte) / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}
