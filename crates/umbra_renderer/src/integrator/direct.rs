use umbra_core::{Color, LightStrategy};
use umbra_math::Ray;

use super::{specular_reflect_or_transmit, uniform_sample_all_lights, uniform_sample_one_light, Integrator};
use crate::sampler::Sampler;
use crate::scene::Scene;

/// Direct illumination at the first hit, plus perfect specular reflection
/// and transmission followed recursively up to `max_depth`.
#[derive(Debug, Clone)]
pub struct DirectLighting {
    max_depth: u32,
    /// Refractive index of the surrounding medium
    eta_a: f32,
    strategy: LightStrategy,
}

impl DirectLighting {
    pub fn new(max_depth: u32, eta_a: f32, strategy: LightStrategy) -> Self {
        Self {
            max_depth,
            eta_a,
            strategy,
        }
    }
}

impl Integrator for DirectLighting {
    fn radiance(&self, scene: &Scene, ray: &Ray, sampler: &mut dyn Sampler, depth: u32) -> Color {
        let Some(hit) = scene.intersect(ray) else {
            return scene.background();
        };

        let mut l = hit.emitted();
        let Some(bsdf) = hit.bsdf(self.eta_a) else {
            return l;
        };

        l += match self.strategy {
            LightStrategy::All => uniform_sample_all_lights(&hit, &bsdf, scene, sampler),
            LightStrategy::One => uniform_sample_one_light(&hit, &bsdf, scene, sampler),
        };

        if depth + 1 < self.max_depth {
            l += specular_reflect_or_transmit(self, &hit, &bsdf, scene, sampler, depth, false);
            l += specular_reflect_or_transmit(self, &hit, &bsdf, scene, sampler, depth, true);
        }

        l
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::DirectionalLight;
    use crate::material::Material;
    use crate::object::{Plane, Sphere};
    use crate::sampler::DeterministicSampler;
    use glam::Vec3;
    use std::f32::consts::FRAC_1_PI;
    use std::sync::Arc;
    use umbra_math::{Direction, Transform, Vertex};

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new(Color::new(0.1, 0.2, 0.3));
        let integrator = DirectLighting::new(5, 1.0, LightStrategy::All);
        let ray = Ray::new(Vertex::ORIGIN, Direction::Z);
        let l = integrator.radiance(&scene, &ray, &mut DeterministicSampler, 0);
        assert_eq!(l, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_mirror_shows_lit_floor() {
        let white = Arc::new(Material::diffuse(Color::ONE, None));
        let mirror = Arc::new(Material::mirror(Color::splat(0.5), None));

        let mut scene = Scene::new(Color::ZERO);
        scene.add_object(Box::new(Plane::new(20.0, 20.0, Transform::IDENTITY, Some(white)).unwrap()));
        // Vertical mirror facing -x at x = 1
        scene.add_object(Box::new(
            Plane::new(20.0, 20.0, Transform::translate(1.0, 0.0, 0.0) * Transform::rotate_y_quarters(-1), Some(mirror))
                .unwrap(),
        ));
        scene.add_light(Box::new(DirectionalLight::new(Vec3::NEG_Z, Color::ONE, 1.0)));

        let integrator = DirectLighting::new(5, 1.0, LightStrategy::All);
        // Hits the mirror at z = 0.5 and reflects down onto the floor at the origin
        let ray = Ray::new(Vertex::new(0.0, 0.0, 1.0), Direction::new(Vec3::new(1.0, 0.0, -0.5)));
        let l = integrator.radiance(&scene, &ray, &mut DeterministicSampler, 0);
        assert!((l - Color::splat(0.5 * FRAC_1_PI)).length() < 1e-4, "{l:?}");

        // Without a bounce budget the mirror is black
        let shallow = DirectLighting::new(1, 1.0, LightStrategy::All);
        let l = shallow.radiance(&scene, &ray, &mut DeterministicSampler, 0);
        assert_eq!(l, Color::ZERO);
    }

    #[test]
    fn test_shadowed_sphere_bottom() {
        let white = Arc::new(Material::diffuse(Color::ONE, None));
        let mut scene = Scene::new(Color::ZERO);
        scene.add_object(Box::new(Sphere::new(1.0, Transform::IDENTITY, Some(white)).unwrap()));
        scene.add_light(Box::new(DirectionalLight::new(Vec3::NEG_Z, Color::ONE, 1.0)));
        let integrator = DirectLighting::new(5, 1.0, LightStrategy::One);

        let top = Ray::new(Vertex::new(0.0, 0.0, 3.0), Direction::NEG_Z);
        let l = integrator.radiance(&scene, &top, &mut DeterministicSampler, 0);
        assert!((l.x - FRAC_1_PI).abs() < 1e-5);

        let bottom = Ray::new(Vertex::new(0.0, 0.0, -3.0), Direction::Z);
        assert_eq!(integrator.radiance(&scene, &bottom, &mut DeterministicSampler, 0), Color::ZERO);
    }
}
