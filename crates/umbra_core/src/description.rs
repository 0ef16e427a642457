//! JSON scene descriptions.
//!
//! A description mirrors what a renderer needs: render options, the sampler,
//! named textures and materials, objects (with nested groups) and lights.
//! It carries no behaviour; the renderer crate assembles a scene from it.
//!
//! ```json
//! {
//!   "render_options": { "eye": [0, -5, 0], "look_at": [0, 0, 0], "up": [0, 0, 1] },
//!   "materials": { "white": { "type": "diffuse", "albedo": [0.8, 0.8, 0.8] } },
//!   "objects": [ { "type": "sphere", "radius": 1.0, "material": "white" } ],
//!   "lights": [ { "type": "directional", "direction": [-1, 1, -1], "radiance": 1.0 } ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ConfigError, RenderOptions, Rgb, SamplerConfig};

/// Errors that can occur while loading a description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid render options: {0}")]
    Config(#[from] ConfigError),
}

pub type LoadResult<T> = Result<T, LoadError>;

fn yes() -> bool {
    true
}

fn one() -> f32 {
    1.0
}

fn one_sample() -> u32 {
    1
}

/// A complete scene file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub render_options: RenderOptions,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub background: Rgb,
    #[serde(default = "yes")]
    pub cast_shadow: bool,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureDesc>,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDesc {
    Constant { color: Rgb },
    Checker { scale: f32, even: Rgb, odd: Rgb },
    Image { path: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Diffuse {
        albedo: Rgb,
        #[serde(default)]
        texture: Option<String>,
        #[serde(default)]
        cast_shadow: Option<bool>,
    },
    Mirror {
        reflectance: Rgb,
        #[serde(default)]
        texture: Option<String>,
        #[serde(default)]
        cast_shadow: Option<bool>,
    },
    Glass {
        ior: f32,
        #[serde(default)]
        cast_shadow: Option<bool>,
    },
    Plastic {
        diffuse: Rgb,
        specular: Rgb,
        #[serde(default)]
        texture: Option<String>,
        #[serde(default)]
        cast_shadow: Option<bool>,
    },
}

/// One step of an object transform. Steps compose left to right: the first
/// step listed is the outermost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStep {
    Translate(Vec3),
    /// Degrees.
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    /// Whole quarter turns, exact.
    QuarterX(i32),
    QuarterY(i32),
    QuarterZ(i32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDesc {
    #[serde(flatten)]
    pub shape: ShapeDesc,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub transform: Vec<TransformStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    Sphere {
        radius: f32,
    },
    Disc {
        radius: f32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        #[serde(default)]
        capped: bool,
    },
    Group {
        children: Vec<ObjectDesc>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDesc {
    Point {
        position: Vec3,
        intensity: Rgb,
        #[serde(default = "one")]
        scale: f32,
    },
    Directional {
        /// Direction the light travels in.
        direction: Vec3,
        radiance: Rgb,
        #[serde(default = "one")]
        scale: f32,
    },
    Area {
        emit: Rgb,
        #[serde(default = "one")]
        scale: f32,
        #[serde(default = "one_sample")]
        samples: u32,
        #[serde(default)]
        two_sided: bool,
        shape: ObjectDesc,
    },
}

impl SceneDescription {
    /// Parse a description from JSON text and validate its options.
    pub fn from_json(text: &str) -> LoadResult<Self> {
        let description: SceneDescription = serde_json::from_str(text)?;
        description.render_options.validate()?;
        description.sampler.validate()?;
        crate::options::validate_background(description.background.0)?;
        Ok(description)
    }
}

/// Load and validate a description from a JSON file.
pub fn load_description<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let description = SceneDescription::from_json(&text)?;
    log::info!(
        "Loaded {}: {} objects, {} lights, {} materials",
        path.display(),
        description.objects.len(),
        description.lights.len(),
        description.materials.len()
    );
    Ok(description)
}
