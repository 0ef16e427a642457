//! Scene container: objects, lights and the background.

use umbra_core::Color;
use umbra_math::{Aabb, Ray};

use crate::light::Light;
use crate::object::Object;
use crate::surface::SurfaceInfo;

/// Everything the integrators trace against. Read-only while rendering.
pub struct Scene {
    objects: Vec<Box<dyn Object>>,
    /// World bounds of `objects`, index for index
    bounds: Vec<Aabb>,
    lights: Vec<Box<dyn Light>>,
    background: Color,
    cast_shadow: bool,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            objects: Vec::new(),
            bounds: Vec::new(),
            lights: Vec::new(),
            background,
            cast_shadow: true,
        }
    }

    /// Whether shadow rays consult each material's shadow-caster flag.
    pub fn with_cast_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self
    }

    pub fn add_object(&mut self, object: Box<dyn Object>) {
        self.bounds.push(object.world_bounds());
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[Box<dyn Object>] {
        &self.objects
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn casts_shadow(&self) -> bool {
        self.cast_shadow
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.lights.is_empty()
    }

    /// Nearest hit along `ray`. Hits on an area light's shape carry a link
    /// back to the light.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>> {
        let mut probe = *ray;
        let mut nearest = None;

        for (object, bounds) in self.objects.iter().zip(&self.bounds) {
            if !bounds.hit(&probe) {
                continue;
            }
            if let Some(hit) = object.intersect(&probe) {
                probe.t_max = hit.t;
                nearest = Some(hit);
            }
        }

        for light in &self.lights {
            let Some(shape) = light.shape() else {
                continue;
            };
            if let Some(mut hit) = shape.intersect(&probe) {
                probe.t_max = hit.t;
                hit.area_light = Some(light.as_ref());
                nearest = Some(hit);
            }
        }

        nearest
    }

    /// Whether anything blocks `ray` before its `t_max`. Light shapes never
    /// block shadow rays.
    pub fn intersect_shadow(&self, ray: &Ray) -> bool {
        self.objects
            .iter()
            .zip(&self.bounds)
            .any(|(object, bounds)| bounds.hit(ray) && object.occludes(ray, self.cast_shadow))
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects.len())
            .field("lights", &self.lights.len())
            .field("background", &self.background)
            .field("cast_shadow", &self.cast_shadow)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::DiffuseAreaLight;
    use crate::material::Material;
    use crate::object::tests::white;
    use crate::object::{Disc, Sphere};
    use std::sync::Arc;
    use umbra_math::{Direction, Transform, Vertex};

    fn down(x: f32) -> Ray {
        Ray::new(Vertex::new(x, 0.0, 10.0), Direction::NEG_Z)
    }

    #[test]
    fn test_nearest_hit_across_objects_and_lights() {
        let mut scene = Scene::new(Color::ZERO);
        scene.add_object(Box::new(Sphere::new(1.0, Transform::IDENTITY, white()).unwrap()));
        scene.add_object(Box::new(Sphere::new(1.0, Transform::translate(0.0, 0.0, 3.0), white()).unwrap()));
        let panel = Disc::new(0.5, Transform::translate(0.0, 0.0, 5.0), None).unwrap();
        scene.add_light(Box::new(DiffuseAreaLight::new(Box::new(panel), Color::ONE, 1.0, 1, true)));

        let hit = scene.intersect(&down(0.0)).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-5);
        assert!(hit.area_light.is_some());
        assert_eq!(hit.emitted(), Color::ONE);

        let hit = scene.intersect(&down(0.8)).unwrap();
        assert!(hit.area_light.is_none());
        assert!(hit.p.z > 3.0);

        assert!(scene.intersect(&down(2.0)).is_none());
    }

    #[test]
    fn test_shadow_flags() {
        let glass = Some(Arc::new(Material::glass(1.5)));
        let mut scene = Scene::new(Color::ZERO);
        scene.add_object(Box::new(Sphere::new(1.0, Transform::IDENTITY, glass).unwrap()));
        assert!(!scene.intersect_shadow(&down(0.0)));

        let scene = scene.with_cast_shadow(false);
        assert!(scene.intersect_shadow(&down(0.0)));

        let short = Ray::with_t_max(Vertex::new(0.0, 0.0, 10.0), Direction::NEG_Z, 5.0);
        assert!(!scene.intersect_shadow(&short));
    }
}
