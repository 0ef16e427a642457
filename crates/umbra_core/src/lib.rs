//! Umbra Core - renderer-agnostic data for the umbra light-transport pipeline.
//!
//! This crate provides:
//!
//! - **Options**: `RenderOptions`, `SamplerConfig` and their validation
//! - **Textures**: constant, checkerboard and image textures over `(u, v)`
//! - **Raster output**: the 8-bit RGBA `Image` and tone reproduction
//! - **Scene descriptions**: a serde JSON format and its loader
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::description::load_description;
//!
//! let description = load_description("cornell.json")?;
//! println!("{} objects, {} lights",
//!     description.objects.len(),
//!     description.lights.len());
//! ```

pub mod color;
pub mod description;
pub mod options;
pub mod raster;
pub mod texture;

// Re-export commonly used types
pub use color::{Color, Rgb};
pub use description::{load_description, LoadError, SceneDescription};
pub use options::{
    CameraKind, ConfigError, IntegratorKind, LightStrategy, RenderOptions, SamplerConfig,
};
pub use raster::{tone_map, Image};
pub use texture::{ImageTexture, Texture, TextureCache, TextureError};
