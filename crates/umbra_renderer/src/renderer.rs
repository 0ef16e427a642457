//! Render entry point.

use std::time::Instant;

use thiserror::Error;
use umbra_core::{ConfigError, Image, RenderOptions, SamplerConfig};
use umbra_math::{Transform, TransformError, Vertex};

use crate::camera::{make_camera, Camera};
use crate::integrator::{make_integrator, Integrator};
use crate::sampler::make_sampler;
use crate::scene::Scene;
use crate::scene_builder::SceneError;
use crate::worker::Worker;

/// Errors that stop a render from starting.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render options: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid camera placement: {0}")]
    View(#[from] TransformError),

    #[error("Block size must be at least one row")]
    InvalidBlockSize,

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to build scene: {0}")]
    Scene(#[from] SceneError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Everything a render reads. Shared by all worker threads, never mutated.
pub struct RenderContext {
    scene: Scene,
    camera: Box<dyn Camera>,
    /// Camera space to world space
    view: Transform,
    options: RenderOptions,
    integrator: Box<dyn Integrator>,
}

impl RenderContext {
    /// Validate `options` and set up the camera and integrator they select.
    pub fn new(scene: Scene, options: RenderOptions) -> RenderResult<Self> {
        options.validate()?;
        let view = Transform::look_at(Vertex(options.eye), Vertex(options.look_at), options.up)?;
        Ok(Self {
            camera: make_camera(&options),
            integrator: make_integrator(&options),
            scene,
            view,
            options,
        })
    }

    /// Replace the integrator the options selected.
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    pub fn view(&self) -> &Transform {
        &self.view
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }
}

/// Render `scene` to an 8-bit RGBA image.
///
/// `thread_count` of 0 uses one thread per core.
pub fn render(
    scene: Scene,
    options: &RenderOptions,
    sampler_config: &SamplerConfig,
    block_size: u32,
    thread_count: usize,
) -> RenderResult<Image> {
    sampler_config.validate()?;
    let context = RenderContext::new(scene, options.clone())?;
    let sampler = make_sampler(sampler_config);

    log::info!(
        "Rendering {}x{} with {:?} integrator, {} spp, {} objects, {} lights",
        options.width,
        options.height,
        options.integrator,
        sampler.samples_per_pixel(),
        context.scene().objects().len(),
        context.scene().lights().len()
    );
    let start = Instant::now();

    let image = Worker::new(&context, block_size)?
        .with_threads(thread_count)
        .run(sampler.as_ref())?;

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::Color;

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = RenderOptions {
            max_depth: 1,
            ..RenderOptions::default()
        };
        let result = render(Scene::new(Color::ZERO), &options, &SamplerConfig::Deterministic, 16, 1);
        assert!(matches!(result, Err(RenderError::Config(ConfigError::InvalidMaxDepth(1)))));

        let no_samples = SamplerConfig::Random {
            samples_per_pixel: 0,
            seed: 1,
        };
        let result = render(Scene::new(Color::ZERO), &RenderOptions::default(), &no_samples, 16, 1);
        assert!(matches!(result, Err(RenderError::Config(ConfigError::NoSamples))));
    }

    #[test]
    fn test_background_fills_empty_scene() {
        let options = RenderOptions {
            width: 5,
            height: 3,
            gamma: 1.0,
            ..RenderOptions::default()
        };
        let image = render(Scene::new(Color::ONE), &options, &SamplerConfig::Deterministic, 2, 2).unwrap();
        assert_eq!(image.stride(), 20);
        assert!(image.pixels().iter().all(|&p| p == [255, 255, 255, 255]));
    }
}
