//! Materials: up to two scattering components, each with an optional
//! texture multiplied into its value.

use umbra_core::{Color, Texture};

use crate::bxdf::{Bxdf, BxdfFlags, Diffuse, Dielectric, Mirror};

/// Most components a single material carries.
pub const MAX_BXDFS: usize = 2;

/// One component of a material.
pub struct MaterialSlot {
    pub bxdf: Box<dyn Bxdf>,
    pub texture: Option<Texture>,
}

impl MaterialSlot {
    fn new(bxdf: impl Bxdf + 'static, texture: Option<Texture>) -> Self {
        Self {
            bxdf: Box::new(bxdf),
            texture,
        }
    }

    pub fn flags(&self) -> BxdfFlags {
        self.bxdf.flags()
    }
}

/// Surface appearance shared by every object that references it.
pub struct Material {
    slots: Vec<MaterialSlot>,
    cast_shadow: bool,
}

impl Material {
    fn from_slots(slots: Vec<MaterialSlot>, cast_shadow: bool) -> Self {
        debug_assert!(slots.len() <= MAX_BXDFS);
        Self { slots, cast_shadow }
    }

    /// Lambertian surface. The texture, if any, modulates the albedo.
    pub fn diffuse(albedo: Color, texture: Option<Texture>) -> Self {
        Self::from_slots(vec![MaterialSlot::new(Diffuse::new(albedo), texture)], true)
    }

    /// Perfect mirror.
    pub fn mirror(reflectance: Color, texture: Option<Texture>) -> Self {
        Self::from_slots(vec![MaterialSlot::new(Mirror::new(reflectance), texture)], true)
    }

    /// Smooth glass. Does not block shadow rays unless told otherwise.
    pub fn glass(ior: f32) -> Self {
        Self::from_slots(vec![MaterialSlot::new(Dielectric::new(ior), None)], false)
    }

    /// Diffuse base under a specular coat.
    pub fn plastic(diffuse: Color, specular: Color, texture: Option<Texture>) -> Self {
        Self::from_slots(
            vec![
                MaterialSlot::new(Diffuse::new(diffuse), texture),
                MaterialSlot::new(Mirror::new(specular), None),
            ],
            true,
        )
    }

    pub fn with_cast_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self
    }

    pub fn slots(&self) -> &[MaterialSlot] {
        &self.slots
    }

    /// Whether this material blocks shadow rays.
    pub fn casts_shadow(&self) -> bool {
        self.cast_shadow
    }

    /// Union of the flags of every component.
    pub fn flags(&self) -> BxdfFlags {
        self.slots
            .iter()
            .fold(BxdfFlags::empty(), |acc, slot| acc | slot.flags())
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("flags", &self.flags())
            .field("cast_shadow", &self.cast_shadow)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let plastic = Material::plastic(Color::splat(0.5), Color::splat(0.1), None);
        assert_eq!(plastic.slots().len(), 2);
        assert!(plastic.flags().contains(BxdfFlags::DIFFUSE | BxdfFlags::SPECULAR));
        assert!(plastic.casts_shadow());

        let glass = Material::glass(1.5);
        assert!(!glass.casts_shadow());
        assert!(glass.with_cast_shadow(true).casts_shadow());
    }
}
