//! World-space wrapper around a material's components at one surface point.

use glam::{Vec2, Vec3};
use umbra_core::Color;
use umbra_math::Frame;

use crate::bxdf::{BxdfData, BxdfFlags};
use crate::material::{Material, MaterialSlot};
use crate::sampling::{choose, ONE_MINUS_EPSILON};
use crate::surface::SurfaceInfo;

/// A sampled incident direction in world space.
#[derive(Debug, Clone, Copy)]
pub struct BsdfSample {
    pub wi: Vec3,
    pub f: Color,
    pub pdf: f32,
    pub flags: BxdfFlags,
}

/// The scattering function at one surface point.
pub struct Bsdf<'a> {
    material: &'a Material,
    frame: Frame,
    data: BxdfData,
    uv: Vec2,
}

impl<'a> Bsdf<'a> {
    pub fn new(surface: &SurfaceInfo<'_>, material: &'a Material, eta_a: f32) -> Self {
        Self {
            material,
            frame: surface.frame,
            data: BxdfData {
                wo: surface.wo_s,
                eta_a,
            },
            uv: surface.uv,
        }
    }

    pub fn to_shading(&self, v: Vec3) -> Vec3 {
        self.frame.to_local(v)
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.frame.to_world(v)
    }

    fn matching(&self, flags: BxdfFlags) -> impl Iterator<Item = &'a MaterialSlot> + '_ {
        self.material
            .slots()
            .iter()
            .filter(move |slot| slot.flags().matches(flags))
    }

    pub fn num_components(&self, flags: BxdfFlags) -> usize {
        self.matching(flags).count()
    }

    fn texture(&self, slot: &MaterialSlot) -> Color {
        slot.texture
            .as_ref()
            .map_or(Color::ONE, |texture| texture.evaluate(self.uv))
    }

    /// Sum of the matching components for world direction `wi`.
    ///
    /// Only components on the side `wi` lies on contribute: reflection when
    /// `wi` and `wo` share a hemisphere, transmission otherwise.
    pub fn eval(&self, wi: Vec3, flags: BxdfFlags) -> Color {
        let wi_s = self.to_shading(wi);
        if self.data.wo.z == 0.0 {
            return Color::ZERO;
        }
        let side = if wi_s.z * self.data.wo.z > 0.0 {
            BxdfFlags::REFLECTION
        } else {
            BxdfFlags::TRANSMISSION
        };

        self.matching(flags)
            .filter(|slot| slot.flags().contains(side))
            .map(|slot| slot.bxdf.eval(&self.data, wi_s) * self.texture(slot))
            .sum()
    }

    /// Mean density of the matching components.
    pub fn pdf(&self, wi: Vec3, flags: BxdfFlags) -> f32 {
        let wi_s = self.to_shading(wi);
        let (count, total) = self
            .matching(flags)
            .fold((0usize, 0.0f32), |(count, total), slot| {
                (count + 1, total + slot.bxdf.pdf(&self.data, wi_s))
            });
        if count == 0 {
            0.0
        } else {
            total / count as f32
        }
    }

    /// Pick one matching component uniformly and sample it.
    pub fn sample(&self, u: Vec2, flags: BxdfFlags) -> Option<BsdfSample> {
        let count = self.num_components(flags);
        if count == 0 {
            return None;
        }

        let k = choose(u.x, count);
        let slot = self.matching(flags).nth(k)?;
        let remapped = Vec2::new((u.x * count as f32 - k as f32).min(ONE_MINUS_EPSILON), u.y);

        let sample = slot.bxdf.sample(&self.data, remapped, flags)?;
        if sample.pdf <= 0.0 {
            return None;
        }
        let wi = self.to_world(sample.wi);

        if count == 1 {
            return Some(BsdfSample {
                wi,
                f: sample.f * self.texture(slot),
                pdf: sample.pdf,
                flags: sample.flags,
            });
        }

        if sample.flags.is_specular() {
            // A delta component contributes only through this sample
            return Some(BsdfSample {
                wi,
                f: sample.f * self.texture(slot),
                pdf: sample.pdf / count as f32,
                flags: sample.flags,
            });
        }

        Some(BsdfSample {
            wi,
            f: self.eval(wi, flags),
            pdf: self.pdf(wi, flags),
            flags: sample.flags,
        })
    }
}
