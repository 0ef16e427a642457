//! Render and sampler configuration.
//!
//! Both types deserialize from partial JSON documents; missing fields take
//! their defaults. Angles are written in degrees and held in radians.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Errors reported by option validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image size {width}x{height} is empty")]
    EmptyImage { width: u32, height: u32 },

    #[error("field of view must lie in (0, 180) degrees, got {0} degrees")]
    InvalidFieldOfView(f32),

    #[error("world-to-screen scale must be positive, got {0}")]
    InvalidWorldToScreen(f32),

    #[error("aperture must be non-negative, got {0}")]
    InvalidAperture(f32),

    #[error("focus distance must be positive when the aperture is open, got {0}")]
    InvalidFocus(f32),

    #[error("max depth must be at least 2, got {0}")]
    InvalidMaxDepth(u32),

    #[error("gamma must be positive, got {0}")]
    InvalidGamma(f32),

    #[error("global refractive index must be positive, got {0}")]
    InvalidRefraction(f32),

    #[error("camera eye and look-at coincide or the up vector is parallel to the view")]
    DegenerateView,

    #[error("samples per pixel must be at least 1")]
    NoSamples,

    #[error("background colour must be finite and non-negative")]
    InvalidBackground,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which radiance estimator renders the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// Direct lighting plus recursive specular reflection and transmission.
    Direct,
    /// Unidirectional path tracing with Russian roulette.
    #[default]
    Path,
}

/// How the direct-lighting integrator visits lights at each hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightStrategy {
    /// Every light, each with its own sample count.
    #[default]
    All,
    /// One uniformly chosen light, scaled by the light count.
    One,
}

/// Camera model used to turn pixels into rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraKind {
    /// Off-axis frustum with optional thin lens.
    #[default]
    Frustum,
    /// Centred pinhole perspective.
    Perspective,
}

/// Everything the renderer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view in radians (degrees when serialized).
    #[serde(with = "degrees")]
    pub fov: f32,
    /// World units per pixel on the near plane.
    pub world_to_screen: f32,
    /// Lens diameter; zero disables depth of field.
    pub aperture: f32,
    /// Distance to the plane in focus.
    pub focus: f32,
    pub max_depth: u32,
    pub gamma: f32,
    /// Refractive index of the medium surrounding every object (η_A).
    pub global_refraction: f32,
    pub camera: CameraKind,
    pub integrator: IntegratorKind,
    pub light_strategy: LightStrategy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            width: 256,
            height: 256,
            fov: 45.0_f32.to_radians(),
            world_to_screen: 0.001,
            aperture: 0.0,
            focus: 1.0,
            max_depth: 5,
            gamma: 2.2,
            global_refraction: 1.0,
            camera: CameraKind::default(),
            integrator: IntegratorKind::default(),
            light_strategy: LightStrategy::default(),
        }
    }
}

impl RenderOptions {
    /// Check every constraint the renderer relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(ConfigError::InvalidFieldOfView(self.fov.to_degrees()));
        }
        if !(self.world_to_screen > 0.0 && self.world_to_screen.is_finite()) {
            return Err(ConfigError::InvalidWorldToScreen(self.world_to_screen));
        }
        if !(self.aperture >= 0.0 && self.aperture.is_finite()) {
            return Err(ConfigError::InvalidAperture(self.aperture));
        }
        if self.aperture > 0.0 && !(self.focus > 0.0 && self.focus.is_finite()) {
            return Err(ConfigError::InvalidFocus(self.focus));
        }
        if self.max_depth < 2 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        if !(self.global_refraction > 0.0 && self.global_refraction.is_finite()) {
            return Err(ConfigError::InvalidRefraction(self.global_refraction));
        }
        let view = self.look_at - self.eye;
        if view.length_squared() == 0.0 || view.cross(self.up).length_squared() < 1.0e-12 {
            return Err(ConfigError::DegenerateView);
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Which sample generator drives the render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplerConfig {
    /// One sample per pixel at the pixel centre.
    #[default]
    Deterministic,
    /// Seeded pseudo-random samples.
    Random { samples_per_pixel: u32, seed: u64 },
}

impl SamplerConfig {
    pub fn samples_per_pixel(&self) -> u32 {
        match self {
            SamplerConfig::Deterministic => 1,
            SamplerConfig::Random {
                samples_per_pixel, ..
            } => *samples_per_pixel,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.samples_per_pixel() == 0 {
            return Err(ConfigError::NoSamples);
        }
        Ok(())
    }
}

/// Validate a background colour.
pub fn validate_background(color: Color) -> ConfigResult<()> {
    if color.is_finite() && color.min_element() >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBackground)
    }
}

/// Serde adapter: degrees on the wire, radians in memory.
mod degrees {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(radians: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(radians.to_degrees())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        f32::deserialize(deserializer).map(f32::to_radians)
    }
}
