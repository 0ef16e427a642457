//! Radiance estimators and the light-sampling helpers they share.

mod direct;
mod path;

pub use direct::DirectLighting;
pub use path::PathTracer;

use glam::Vec2;
use umbra_core::color::is_black;
use umbra_core::{tone_map, Color, Image, IntegratorKind, RenderOptions};
use umbra_math::Ray;

use crate::bsdf::Bsdf;
use crate::bxdf::BxdfFlags;
use crate::light::Light;
use crate::renderer::RenderContext;
use crate::sampler::Sampler;
use crate::sampling::{choose, power_heuristic};
use crate::scene::Scene;
use crate::surface::SurfaceInfo;
use crate::worker::RenderBlock;

/// Trait for radiance estimators.
pub trait Integrator: Send + Sync {
    /// Radiance arriving at the ray origin from along `ray`. `depth` counts
    /// the scattering events that led to this ray.
    fn radiance(&self, scene: &Scene, ray: &Ray, sampler: &mut dyn Sampler, depth: u32) -> Color;

    /// Render the rows of `block` into an image of the block's height.
    fn render_block(&self, context: &RenderContext, block: &RenderBlock, sampler: &mut dyn Sampler) -> Image {
        let camera = context.camera();
        let width = camera.width();
        let samples = sampler.samples_per_pixel();
        let gamma = context.options().gamma;
        let mut image = Image::new(width, block.height());

        for y in block.y0..block.y1 {
            for x in 0..width {
                let mut sum = Color::ZERO;
                for _ in 0..samples {
                    let ray = context.view().apply(camera.ray(x, y, sampler));
                    let radiance = self.radiance(context.scene(), &ray, sampler, 0);
                    // A stray NaN or inf would poison the whole pixel
                    if radiance.is_finite() {
                        sum += radiance;
                    }
                }
                image.set(x, y - block.y0, tone_map(sum / samples as f32, gamma));
            }
        }

        image
    }
}

/// Build the integrator `options` select.
pub fn make_integrator(options: &RenderOptions) -> Box<dyn Integrator> {
    match options.integrator {
        IntegratorKind::Direct => Box::new(DirectLighting::new(
            options.max_depth,
            options.global_refraction,
            options.light_strategy,
        )),
        IntegratorKind::Path => Box::new(PathTracer::new(options.max_depth, options.global_refraction)),
    }
}

fn same_light(a: &dyn Light, b: &dyn Light) -> bool {
    std::ptr::eq(
        a as *const dyn Light as *const (),
        b as *const dyn Light as *const (),
    )
}

/// Direct light from one light at `surface`, combining a light sample and a
/// BSDF sample with the power heuristic. Delta lights take the light sample
/// only. Specular components are skipped unless `specular` is set.
#[allow(clippy::too_many_arguments)]
pub fn estimate_direct(
    surface: &SurfaceInfo<'_>,
    bsdf: &Bsdf<'_>,
    light: &dyn Light,
    u_light: Vec2,
    u_scatter: Vec2,
    scene: &Scene,
    specular: bool,
) -> Color {
    let flags = if specular {
        BxdfFlags::ALL
    } else {
        BxdfFlags::NON_SPECULAR
    };
    let normal = surface.n.vec();
    let mut ld = Color::ZERO;

    // Sample the light
    if let Some(sample) = light.sample_li(surface, u_light) {
        if sample.pdf > 0.0 && !is_black(sample.li) {
            let f = bsdf.eval(sample.wi, flags) * sample.wi.dot(normal).abs();
            if !is_black(f) && !scene.intersect_shadow(&sample.vis_ray) {
                if light.is_delta() {
                    ld += f * sample.li / sample.pdf;
                } else {
                    let scattering_pdf = bsdf.pdf(sample.wi, flags);
                    let weight = power_heuristic(1, sample.pdf, 1, scattering_pdf);
                    ld += f * sample.li * weight / sample.pdf;
                }
            }
        }
    }

    if light.is_delta() {
        return ld;
    }

    // Sample the BSDF
    let Some(sample) = bsdf.sample(u_scatter, flags) else {
        return ld;
    };
    let f = sample.f * sample.wi.dot(normal).abs();
    if is_black(f) || sample.pdf <= 0.0 {
        return ld;
    }

    let weight = if sample.flags.is_specular() {
        1.0
    } else {
        let light_pdf = light.pdf_li(surface, sample.wi);
        if light_pdf == 0.0 {
            return ld;
        }
        power_heuristic(1, sample.pdf, 1, light_pdf)
    };

    let ray = surface.spawn_ray(sample.wi);
    let li = match scene.intersect(&ray) {
        Some(hit) => match hit.area_light {
            Some(hit_light) if same_light(hit_light, light) => hit_light.radiance(&hit, -sample.wi),
            _ => Color::ZERO,
        },
        None => Color::ZERO,
    };
    ld + f * li * weight / sample.pdf
}

/// Direct light from every light, each averaged over its own sample count.
pub fn uniform_sample_all_lights(
    surface: &SurfaceInfo<'_>,
    bsdf: &Bsdf<'_>,
    scene: &Scene,
    sampler: &mut dyn Sampler,
) -> Color {
    let mut l = Color::ZERO;
    for light in scene.lights() {
        let n = light.num_samples();
        let mut ld = Color::ZERO;
        for _ in 0..n {
            let u_light = sampler.sample_2d();
            let u_scatter = sampler.sample_2d();
            ld += estimate_direct(surface, bsdf, light.as_ref(), u_light, u_scatter, scene, false);
        }
        l += ld / n as f32;
    }
    l
}

/// Direct light from one uniformly chosen light, scaled by the light count.
pub fn uniform_sample_one_light(
    surface: &SurfaceInfo<'_>,
    bsdf: &Bsdf<'_>,
    scene: &Scene,
    sampler: &mut dyn Sampler,
) -> Color {
    let lights = scene.lights();
    if lights.is_empty() {
        return Color::ZERO;
    }
    let light = &lights[choose(sampler.sample(), lights.len())];
    let u_light = sampler.sample_2d();
    let u_scatter = sampler.sample_2d();
    lights.len() as f32 * estimate_direct(surface, bsdf, light.as_ref(), u_light, u_scatter, scene, false)
}

/// Follow the specular reflection (or transmission) lobe of `bsdf` and
/// recurse into `integrator`.
pub fn specular_reflect_or_transmit(
    integrator: &dyn Integrator,
    surface: &SurfaceInfo<'_>,
    bsdf: &Bsdf<'_>,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    depth: u32,
    transmit: bool,
) -> Color {
    let side = if transmit {
        BxdfFlags::TRANSMISSION
    } else {
        BxdfFlags::REFLECTION
    };
    let Some(sample) = bsdf.sample(sampler.sample_2d(), BxdfFlags::SPECULAR | side) else {
        return Color::ZERO;
    };
    let cos = sample.wi.dot(surface.n.vec()).abs();
    if sample.pdf <= 0.0 || is_black(sample.f) || cos == 0.0 {
        return Color::ZERO;
    }
    let ray = surface.spawn_ray(sample.wi);
    sample.f * integrator.radiance(scene, &ray, sampler, depth + 1) * cos / sample.pdf
}
