//! Scattering components in shading coordinates.
//!
//! Every direction a BxDF sees is in the shading frame of the surface point,
//! with the normal along +z. `wo` points back towards the viewer and `wi`
//! towards the light; both point away from the surface.

use std::f32::consts::FRAC_1_PI;

use bitflags::bitflags;
use glam::{Vec2, Vec3};
use umbra_core::Color;

use crate::sampling::cosine_sample_hemisphere;
use crate::shading::{
    abs_cos_theta, boundary_eta, cos_theta, fresnel_dielectric, reflect, refract,
    same_hemisphere,
};

bitflags! {
    /// What kind of scattering a component models.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BxdfFlags: u8 {
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;

        const HEMISPHERES = Self::REFLECTION.bits() | Self::TRANSMISSION.bits();
        const LOBES = Self::DIFFUSE.bits() | Self::GLOSSY.bits() | Self::SPECULAR.bits();
        const NON_SPECULAR = Self::HEMISPHERES.bits() | Self::DIFFUSE.bits() | Self::GLOSSY.bits();
        const ALL = Self::HEMISPHERES.bits() | Self::LOBES.bits();
    }
}

impl BxdfFlags {
    /// A component matches a request when they share a hemisphere and a lobe.
    #[inline]
    pub fn matches(self, request: BxdfFlags) -> bool {
        self.intersects(request & BxdfFlags::HEMISPHERES)
            && self.intersects(request & BxdfFlags::LOBES)
    }

    #[inline]
    pub fn is_specular(self) -> bool {
        self.contains(BxdfFlags::SPECULAR)
    }
}

/// Per-interaction inputs shared by every component of a BSDF.
#[derive(Debug, Clone, Copy)]
pub struct BxdfData {
    /// Outgoing direction in shading coordinates.
    pub wo: Vec3,
    /// Refractive index of the medium on the normal's side.
    pub eta_a: f32,
}

/// A sampled incident direction.
#[derive(Debug, Clone, Copy)]
pub struct BxdfSample {
    pub wi: Vec3,
    pub f: Color,
    pub pdf: f32,
    pub flags: BxdfFlags,
}

pub trait Bxdf: Send + Sync {
    fn flags(&self) -> BxdfFlags;

    /// Value of `f(wo, wi)`. Zero for delta distributions.
    fn eval(&self, data: &BxdfData, wi: Vec3) -> Color;

    /// Density of [`Bxdf::sample`] with respect to solid angle.
    ///
    /// Defaults to cosine-weighted sampling on the side of `wo`.
    fn pdf(&self, data: &BxdfData, wi: Vec3) -> f32 {
        if same_hemisphere(data.wo, wi) {
            abs_cos_theta(wi) * FRAC_1_PI
        } else {
            0.0
        }
    }

    /// Draw `wi`. `request` restricts which parts of the component may be
    /// sampled; the caller has already checked that the component matches.
    fn sample(&self, data: &BxdfData, u: Vec2, _request: BxdfFlags) -> Option<BxdfSample> {
        let mut wi = cosine_sample_hemisphere(u);
        if data.wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = self.pdf(data, wi);
        if pdf <= 0.0 {
            return None;
        }
        Some(BxdfSample {
            wi,
            f: self.eval(data, wi),
            pdf,
            flags: self.flags(),
        })
    }
}

/// Lambertian reflection.
#[derive(Debug, Clone, Copy)]
pub struct Diffuse {
    albedo: Color,
}

impl Diffuse {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Bxdf for Diffuse {
    fn flags(&self) -> BxdfFlags {
        BxdfFlags::REFLECTION | BxdfFlags::DIFFUSE
    }

    fn eval(&self, data: &BxdfData, wi: Vec3) -> Color {
        if cos_theta(data.wo) > 0.0 && cos_theta(wi) > 0.0 {
            self.albedo * FRAC_1_PI
        } else {
            Color::ZERO
        }
    }
}

/// Perfect specular reflection.
#[derive(Debug, Clone, Copy)]
pub struct Mirror {
    reflectance: Color,
}

impl Mirror {
    pub fn new(reflectance: Color) -> Self {
        Self { reflectance }
    }
}

impl Bxdf for Mirror {
    fn flags(&self) -> BxdfFlags {
        BxdfFlags::REFLECTION | BxdfFlags::SPECULAR
    }

    fn eval(&self, _data: &BxdfData, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn pdf(&self, _data: &BxdfData, _wi: Vec3) -> f32 {
        0.0
    }

    fn sample(&self, data: &BxdfData, _u: Vec2, _request: BxdfFlags) -> Option<BxdfSample> {
        let wi = reflect(data.wo);
        let cos = abs_cos_theta(wi);
        if cos == 0.0 {
            return None;
        }
        Some(BxdfSample {
            wi,
            f: self.reflectance / cos,
            pdf: 1.0,
            flags: self.flags(),
        })
    }
}

/// Smooth dielectric interface: Fresnel-weighted specular reflection and
/// transmission.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    ior: f32,
}

impl Dielectric {
    /// `ior` is the refractive index inside the surface.
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }
}

impl Bxdf for Dielectric {
    fn flags(&self) -> BxdfFlags {
        BxdfFlags::REFLECTION | BxdfFlags::TRANSMISSION | BxdfFlags::SPECULAR
    }

    fn eval(&self, _data: &BxdfData, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn pdf(&self, _data: &BxdfData, _wi: Vec3) -> f32 {
        0.0
    }

    fn sample(&self, data: &BxdfData, u: Vec2, request: BxdfFlags) -> Option<BxdfSample> {
        let wo = data.wo;
        let eta = boundary_eta(data.eta_a, self.ior, cos_theta(wo));
        let fresnel = fresnel_dielectric(cos_theta(wo), eta);

        let want_reflection = request.contains(BxdfFlags::REFLECTION);
        let want_transmission = request.contains(BxdfFlags::TRANSMISSION);

        let reflection = |pdf: f32, weight: f32| {
            let wi = reflect(wo);
            let cos = abs_cos_theta(wi);
            (cos > 0.0).then(|| BxdfSample {
                wi,
                f: Color::splat(weight / cos),
                pdf,
                flags: BxdfFlags::REFLECTION | BxdfFlags::SPECULAR,
            })
        };

        let Some(wt) = refract(wo, eta) else {
            // Total internal reflection: all energy is reflected
            return if want_reflection { reflection(1.0, 1.0) } else { None };
        };

        let (take_reflection, pdf) = match (want_reflection, want_transmission) {
            (true, true) => (u.x < 0.5, 0.5),
            (true, false) => (true, 1.0),
            (false, true) => (false, 1.0),
            (false, false) => return None,
        };

        if take_reflection {
            return reflection(pdf, fresnel);
        }

        let cos = abs_cos_theta(wt);
        if cos == 0.0 {
            return None;
        }
        // Radiance is compressed by eta² crossing into the denser medium
        let weight = (1.0 - fresnel) * eta * eta;
        Some(BxdfSample {
            wi: wt,
            f: Color::splat(weight / cos),
            pdf,
            flags: BxdfFlags::TRANSMISSION | BxdfFlags::SPECULAR,
        })
    }
}
