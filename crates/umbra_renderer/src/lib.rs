//! Umbra Renderer - CPU light transport
//!
//! Rigid analytic objects, point, directional and area lights, and two
//! Monte Carlo radiance estimators (direct lighting with specular
//! recursion, and a path tracer with next-event estimation). Images are
//! rendered in horizontal blocks on a rayon thread pool.

mod bsdf;
mod bxdf;
mod camera;
mod integrator;
mod light;
mod material;
mod object;
mod renderer;
mod sampler;
mod scene;
mod scene_builder;
mod surface;
mod worker;

pub mod sampling;
pub mod shading;

#[cfg(test)]
mod scenarios;

pub use bsdf::{Bsdf, BsdfSample};
pub use bxdf::{Bxdf, BxdfData, BxdfFlags, BxdfSample, Dielectric, Diffuse, Mirror};
pub use camera::{make_camera, Camera, FrustumCamera, PerspectiveCamera};
pub use integrator::{
    estimate_direct, make_integrator, specular_reflect_or_transmit, uniform_sample_all_lights,
    uniform_sample_one_light, DirectLighting, Integrator, PathTracer,
};
pub use light::{DiffuseAreaLight, DirectionalLight, Light, LightKind, LightSample, PointLight};
pub use material::{Material, MaterialSlot};
pub use object::{Cylinder, Disc, GeometryError, GeometryResult, Group, Object, Plane, Sphere};
pub use renderer::{render, RenderContext, RenderError, RenderResult};
pub use sampler::{make_sampler, DeterministicSampler, RandomSampler, Sampler};
pub use scene::Scene;
pub use scene_builder::{build_scene, SceneError, SceneResult};
pub use surface::SurfaceInfo;
pub use worker::{make_render_blocks, ProgressFn, RenderBlock, Worker, DEFAULT_BLOCK_SIZE};
