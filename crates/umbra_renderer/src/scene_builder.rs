//! Assemble a [`Scene`] from a [`SceneDescription`].

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use umbra_core::description::{LightDesc, MaterialDesc, ObjectDesc, ShapeDesc, TextureDesc, TransformStep};
use umbra_core::{SceneDescription, Texture, TextureCache, TextureError};
use umbra_math::{Transform, Vertex};

use crate::light::{DiffuseAreaLight, DirectionalLight, Light, PointLight};
use crate::material::Material;
use crate::object::{Cylinder, Disc, GeometryError, Group, Object, Plane, Sphere};
use crate::scene::Scene;

/// Errors raised while turning a description into a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("{0} has no material")]
    MissingMaterial(&'static str),

    #[error("Material '{name}' has invalid index of refraction {ior}")]
    InvalidIor { name: String, ior: f32 },

    #[error("Light scale must be positive, got {0}")]
    InvalidLightScale(f32),
}

pub type SceneResult<T> = Result<T, SceneError>;

type Materials = BTreeMap<String, Arc<Material>>;

/// Build the scene a description describes. Image textures are decoded
/// through `cache`.
pub fn build_scene(description: &SceneDescription, cache: &mut TextureCache) -> SceneResult<Scene> {
    let textures = build_textures(&description.textures, cache)?;
    let materials = build_materials(&description.materials, &textures)?;

    let mut scene = Scene::new(description.background.0).with_cast_shadow(description.cast_shadow);
    for object in &description.objects {
        scene.add_object(build_object(object, &materials, None, true)?);
    }
    for light in &description.lights {
        scene.add_light(build_light(light, &materials)?);
    }

    log::info!(
        "Built scene: {} objects, {} lights, {} materials, {} image textures",
        scene.objects().len(),
        scene.lights().len(),
        materials.len(),
        cache.len()
    );
    Ok(scene)
}

fn build_textures(
    descs: &BTreeMap<String, TextureDesc>,
    cache: &mut TextureCache,
) -> SceneResult<BTreeMap<String, Texture>> {
    descs
        .iter()
        .map(|(name, desc)| {
            let texture = match desc {
                TextureDesc::Constant { color } => Texture::Constant(color.0),
                TextureDesc::Checker { scale, even, odd } => Texture::Checker {
                    scale: *scale,
                    even: even.0,
                    odd: odd.0,
                },
                TextureDesc::Image { path } => Texture::Image(cache.load(path)?),
            };
            Ok((name.clone(), texture))
        })
        .collect()
}

fn lookup_texture(textures: &BTreeMap<String, Texture>, name: Option<&String>) -> Option<Texture> {
    let name = name?;
    let texture = textures.get(name).cloned();
    if texture.is_none() {
        log::warn!("Unknown texture '{name}', using the plain material colour");
    }
    texture
}

fn build_materials(
    descs: &BTreeMap<String, MaterialDesc>,
    textures: &BTreeMap<String, Texture>,
) -> SceneResult<Materials> {
    let mut materials = Materials::new();
    for (name, desc) in descs {
        let (material, cast_shadow) = match desc {
            MaterialDesc::Diffuse {
                albedo,
                texture,
                cast_shadow,
            } => (
                Material::diffuse(albedo.0, lookup_texture(textures, texture.as_ref())),
                cast_shadow,
            ),
            MaterialDesc::Mirror {
                reflectance,
                texture,
                cast_shadow,
            } => (
                Material::mirror(reflectance.0, lookup_texture(textures, texture.as_ref())),
                cast_shadow,
            ),
            MaterialDesc::Glass { ior, cast_shadow } => {
                if !(*ior > 0.0 && ior.is_finite()) {
                    return Err(SceneError::InvalidIor {
                        name: name.clone(),
                        ior: *ior,
                    });
                }
                (Material::glass(*ior), cast_shadow)
            }
            MaterialDesc::Plastic {
                diffuse,
                specular,
                texture,
                cast_shadow,
            } => (
                Material::plastic(diffuse.0, specular.0, lookup_texture(textures, texture.as_ref())),
                cast_shadow,
            ),
        };

        let material = match cast_shadow {
            Some(cast_shadow) => material.with_cast_shadow(*cast_shadow),
            None => material,
        };
        materials.insert(name.clone(), Arc::new(material));
    }
    Ok(materials)
}

/// Compose transform steps; the first step is applied last.
fn build_transform(steps: &[TransformStep]) -> Transform {
    steps.iter().fold(Transform::IDENTITY, |acc, step| {
        acc * match *step {
            TransformStep::Translate(t) => Transform::translate(t.x, t.y, t.z),
            TransformStep::RotateX(degrees) => Transform::rotate_x(degrees.to_radians()),
            TransformStep::RotateY(degrees) => Transform::rotate_y(degrees.to_radians()),
            TransformStep::RotateZ(degrees) => Transform::rotate_z(degrees.to_radians()),
            TransformStep::QuarterX(quarters) => Transform::rotate_x_quarters(quarters),
            TransformStep::QuarterY(quarters) => Transform::rotate_y_quarters(quarters),
            TransformStep::QuarterZ(quarters) => Transform::rotate_z_quarters(quarters),
        }
    })
}

fn shape_name(shape: &ShapeDesc) -> &'static str {
    match shape {
        ShapeDesc::Sphere { .. } => "sphere",
        ShapeDesc::Disc { .. } => "disc",
        ShapeDesc::Plane { .. } => "plane",
        ShapeDesc::Cylinder { .. } => "cylinder",
        ShapeDesc::Group { .. } => "group",
    }
}

/// Build one object. Children of a group inherit the group's material
/// unless they name their own.
fn build_object(
    desc: &ObjectDesc,
    materials: &Materials,
    inherited: Option<&Arc<Material>>,
    require_material: bool,
) -> SceneResult<Box<dyn Object>> {
    let material = match &desc.material {
        Some(name) => Some(
            materials
                .get(name)
                .ok_or_else(|| SceneError::UnknownMaterial(name.clone()))?,
        ),
        None => inherited,
    };
    let transform = build_transform(&desc.transform);

    if let ShapeDesc::Group { children } = &desc.shape {
        let children = children
            .iter()
            .map(|child| build_object(child, materials, material, require_material))
            .collect::<SceneResult<Vec<_>>>()?;
        return Ok(Box::new(Group::new(children, transform)?));
    }

    if require_material && material.is_none() {
        return Err(SceneError::MissingMaterial(shape_name(&desc.shape)));
    }
    let material = material.cloned();

    let object: Box<dyn Object> = match desc.shape {
        ShapeDesc::Sphere { radius } => Box::new(Sphere::new(radius, transform, material)?),
        ShapeDesc::Disc { radius } => Box::new(Disc::new(radius, transform, material)?),
        ShapeDesc::Plane { width, height } => Box::new(Plane::new(width, height, transform, material)?),
        ShapeDesc::Cylinder {
            radius,
            height,
            capped,
        } => Box::new(Cylinder::new(radius, height, capped, transform, material)?),
        ShapeDesc::Group { .. } => unreachable!("groups are handled above"),
    };
    Ok(object)
}

fn check_scale(scale: f32) -> SceneResult<f32> {
    if scale > 0.0 && scale.is_finite() {
        Ok(scale)
    } else {
        Err(SceneError::InvalidLightScale(scale))
    }
}

fn build_light(desc: &LightDesc, materials: &Materials) -> SceneResult<Box<dyn Light>> {
    let light: Box<dyn Light> = match desc {
        LightDesc::Point {
            position,
            intensity,
            scale,
        } => Box::new(PointLight::new(Vertex(*position), intensity.0, check_scale(*scale)?)),
        LightDesc::Directional {
            direction,
            radiance,
            scale,
        } => Box::new(DirectionalLight::new(*direction, radiance.0, check_scale(*scale)?)),
        LightDesc::Area {
            emit,
            scale,
            samples,
            two_sided,
            shape,
        } => {
            let shape = build_object(shape, materials, None, false)?;
            Box::new(DiffuseAreaLight::new(
                shape,
                emit.0,
                check_scale(*scale)?,
                *samples,
                *two_sided,
            ))
        }
    };
    Ok(light)
}
