use umbra_core::color::is_black;
use umbra_core::Color;
use umbra_math::Ray;

use super::{uniform_sample_one_light, Integrator};
use crate::bxdf::BxdfFlags;
use crate::sampler::Sampler;
use crate::scene::Scene;

/// Bounces after which Russian roulette may end a path.
const ROULETTE_START: u32 = 3;

/// Smallest termination probability once roulette applies.
const MIN_ROULETTE_Q: f32 = 0.0625;

/// Unidirectional path tracer with next-event estimation.
#[derive(Debug, Clone)]
pub struct PathTracer {
    max_depth: u32,
    eta_a: f32,
}

impl PathTracer {
    pub fn new(max_depth: u32, eta_a: f32) -> Self {
        Self { max_depth, eta_a }
    }
}

impl Integrator for PathTracer {
    fn radiance(&self, scene: &Scene, ray: &Ray, sampler: &mut dyn Sampler, _depth: u32) -> Color {
        let mut l = Color::ZERO;
        let mut beta = Color::ONE;
        let mut ray = *ray;
        let mut specular_bounce = false;

        let mut bounce = 0;
        loop {
            let hit = scene.intersect(&ray);

            // Emission is found by light sampling except where the previous
            // vertex could not sample lights
            if bounce == 0 || specular_bounce {
                l += beta * hit.as_ref().map_or(scene.background(), |hit| hit.emitted());
            }

            let Some(hit) = hit else {
                break;
            };
            if bounce >= self.max_depth {
                break;
            }
            let Some(bsdf) = hit.bsdf(self.eta_a) else {
                break;
            };

            l += beta * uniform_sample_one_light(&hit, &bsdf, scene, sampler);

            let Some(sample) = bsdf.sample(sampler.sample_2d(), BxdfFlags::ALL) else {
                break;
            };
            let cos = sample.wi.dot(hit.n.vec()).abs();
            if sample.pdf <= 0.0 || is_black(sample.f) || cos == 0.0 {
                break;
            }

            beta *= sample.f * cos / sample.pdf;
            specular_bounce = sample.flags.is_specular();
            ray = hit.spawn_ray(sample.wi);

            if bounce > ROULETTE_START {
                let q = MIN_ROULETTE_Q.max(1.0 - beta.max_element());
                if sampler.sample() < q {
                    break;
                }
                beta /= 1.0 - q;
            }
            bounce += 1;
        }

        l
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{DiffuseAreaLight, DirectionalLight};
    use crate::material::Material;
    use crate::object::{Plane, Sphere};
    use crate::sampler::{DeterministicSampler, RandomSampler};
    use glam::Vec3;
    use std::f32::consts::FRAC_1_PI;
    use std::sync::Arc;
    use umbra_math::{Direction, Transform, Vertex};

    #[test]
    fn test_camera_sees_area_light_directly() {
        let panel = Plane::new(1.0, 1.0, Transform::translate(0.0, 0.0, 2.0) * Transform::rotate_x_quarters(2), None).unwrap();
        let mut scene = Scene::new(Color::ZERO);
        scene.add_light(Box::new(DiffuseAreaLight::new(Box::new(panel), Color::ONE, 2.5, 1, false)));

        let tracer = PathTracer::new(5, 1.0);
        let up = Ray::new(Vertex::ORIGIN, Direction::Z);
        let l = tracer.radiance(&scene, &up, &mut DeterministicSampler, 0);
        assert_eq!(l, Color::splat(2.5));

        let down = Ray::new(Vertex::new(0.0, 0.0, 3.0), Direction::NEG_Z);
        assert_eq!(tracer.radiance(&scene, &down, &mut DeterministicSampler, 0), Color::ZERO);
    }

    #[test]
    fn test_single_bounce_matches_direct_lighting() {
        // An isolated lit sphere: every continuation escapes, so the path
        // tracer reduces to one light sample at the first hit
        let white = Arc::new(Material::diffuse(Color::splat(0.8), None));
        let mut scene = Scene::new(Color::ZERO);
        scene.add_object(Box::new(Sphere::new(1.0, Transform::IDENTITY, Some(white)).unwrap()));
        scene.add_light(Box::new(DirectionalLight::new(Vec3::NEG_Z, Color::ONE, 1.0)));

        let tracer = PathTracer::new(5, 1.0);
        let mut sampler = RandomSampler::new(1, 21);
        let top = Ray::new(Vertex::new(0.0, 0.0, 3.0), Direction::NEG_Z);
        for _ in 0..32 {
            let l = tracer.radiance(&scene, &top, &mut sampler, 0);
            assert!((l.x - 0.8 * FRAC_1_PI).abs() < 1e-5, "{l:?}");
        }
    }

    #[test]
    fn test_radiance_is_bounded_in_closed_furnace() {
        // Inside a white sphere lit only by an emitting inner sphere every
        // path is finite and non-negative
        let grey = Arc::new(Material::diffuse(Color::splat(0.5), None));
        let mut scene = Scene::new(Color::ZERO);
        scene.add_object(Box::new(Sphere::new(3.0, Transform::IDENTITY, Some(grey)).unwrap()));
        let bulb = Sphere::new(0.5, Transform::translate(0.0, 0.0, 1.5), None).unwrap();
        scene.add_light(Box::new(DiffuseAreaLight::new(Box::new(bulb), Color::ONE, 1.0, 1, false)));

        let tracer = PathTracer::new(8, 1.0);
        let mut sampler = RandomSampler::new(1, 4);
        for i in 0..200 {
            let dir = Vec3::new((i as f32 * 0.37).sin(), (i as f32 * 0.11).cos(), -0.5);
            let ray = Ray::new(Vertex::ORIGIN, Direction::new(dir));
            let l = tracer.radiance(&scene, &ray, &mut sampler, 0);
            assert!(l.is_finite() && l.min_element() >= 0.0, "{l:?}");
        }
    }
}
