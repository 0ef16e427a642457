//! End-to-end renders of small reference scenes.

use std::f32::consts::{FRAC_1_PI, PI};
use std::sync::Arc;

use glam::{Vec2, Vec3};
use umbra_core::{tone_map, Color, Image, IntegratorKind, RenderOptions, SamplerConfig, Texture};
use umbra_math::Transform;

use crate::light::{DiffuseAreaLight, DirectionalLight};
use crate::material::Material;
use crate::object::{Plane, Sphere};
use crate::renderer::{render, RenderContext};
use crate::sampler::DeterministicSampler;
use crate::scene::Scene;
use crate::worker::{Worker, DEFAULT_BLOCK_SIZE};

fn diffuse(r: f32, g: f32, b: f32) -> Option<Arc<Material>> {
    Some(Arc::new(Material::diffuse(Color::new(r, g, b), None)))
}

/// Mean of one channel over columns `[x0, x1)`, in `[0, 1]`.
fn mean_channel(image: &Image, x0: u32, x1: u32, channel: usize) -> f32 {
    let mut sum = 0.0;
    for y in 0..image.height() {
        for x in x0..x1 {
            sum += image.get(x, y)[channel] as f32 / 255.0;
        }
    }
    sum / ((x1 - x0) * image.height()) as f32
}

#[test]
fn test_empty_scene_is_black() {
    let options = RenderOptions {
        gamma: 1.0,
        ..RenderOptions::default()
    };
    let image = render(
        Scene::new(Color::ZERO),
        &options,
        &SamplerConfig::Deterministic,
        DEFAULT_BLOCK_SIZE,
        0,
    )
    .unwrap();

    assert_eq!((image.width(), image.height()), (256, 256));
    assert!(image.pixels().iter().all(|&p| p == [0, 0, 0, 255]));
}

fn lit_sphere_scene() -> Scene {
    let mut scene = Scene::new(Color::ZERO);
    scene.add_object(Box::new(Sphere::new(1.0, Transform::IDENTITY, diffuse(1.0, 1.0, 1.0)).unwrap()));
    // Arrives from (1, -1, 1)
    scene.add_light(Box::new(DirectionalLight::new(Vec3::new(-1.0, 1.0, -1.0), Color::ONE, 4.0)));
    scene
}

fn lit_sphere_options() -> RenderOptions {
    RenderOptions {
        eye: Vec3::new(0.0, -5.0, 0.0),
        look_at: Vec3::ZERO,
        up: Vec3::Z,
        gamma: 1.0,
        ..RenderOptions::default()
    }
}

#[test]
fn test_directional_light_on_diffuse_sphere() {
    let image = render(
        lit_sphere_scene(),
        &lit_sphere_options(),
        &SamplerConfig::Deterministic,
        DEFAULT_BLOCK_SIZE,
        0,
    )
    .unwrap();

    let [r, g, b, a] = image.get(128, 128);
    assert!(r == g && g == b, "{:?}", image.get(128, 128));
    assert!((180..=220).contains(&r), "centre pixel {r}");
    assert_eq!(a, 255);
    assert_eq!(image.get(0, 0), [0, 0, 0, 255]);
}

#[test]
fn test_cornell_box_colour_bleeding() {
    let white = diffuse(0.73, 0.73, 0.73);
    let red = diffuse(0.75, 0.05, 0.05);
    let green = diffuse(0.05, 0.75, 0.05);
    let wall = |transform: Transform, material: &Option<Arc<Material>>| {
        Box::new(Plane::new(2.0, 2.0, transform, material.clone()).unwrap())
    };

    // Open towards the camera; every wall faces inwards
    let mut scene = Scene::new(Color::ZERO);
    scene.add_object(wall(Transform::translate(0.0, 0.0, -1.0), &white));
    scene.add_object(wall(Transform::translate(0.0, 0.0, 1.0) * Transform::rotate_x_quarters(2), &white));
    scene.add_object(wall(Transform::translate(0.0, 1.0, 0.0) * Transform::rotate_x_quarters(1), &white));
    scene.add_object(wall(Transform::translate(-1.0, 0.0, 0.0) * Transform::rotate_y_quarters(1), &red));
    scene.add_object(wall(Transform::translate(1.0, 0.0, 0.0) * Transform::rotate_y_quarters(-1), &green));

    let panel = Plane::new(0.5, 0.5, Transform::translate(0.0, 0.0, 0.99) * Transform::rotate_x_quarters(2), None).unwrap();
    scene.add_light(Box::new(DiffuseAreaLight::new(Box::new(panel), Color::ONE, 2.0, 1, false)));

    let options = RenderOptions {
        eye: Vec3::new(0.0, -2.7, 0.0),
        look_at: Vec3::ZERO,
        up: Vec3::Z,
        width: 128,
        height: 128,
        fov: 60.0_f32.to_radians(),
        // The walls are dim in linear terms; compare display values
        gamma: 2.2,
        integrator: IntegratorKind::Path,
        ..RenderOptions::default()
    };
    let sampler = SamplerConfig::Random {
        samples_per_pixel: 16,
        seed: 3,
    };
    let image = render(scene, &options, &sampler, DEFAULT_BLOCK_SIZE, 0).unwrap();

    let third = image.width() / 3;
    let left = (mean_channel(&image, 0, third, 0), mean_channel(&image, 0, third, 1));
    let right_x0 = image.width() - third;
    let right = (
        mean_channel(&image, right_x0, image.width(), 0),
        mean_channel(&image, right_x0, image.width(), 1),
    );

    assert!(left.0 - left.1 >= 0.05, "left third (r, g) = {left:?}");
    assert!(right.1 - right.0 >= 0.05, "right third (r, g) = {right:?}");
}

fn checker() -> Texture {
    Texture::Checker {
        scale: 8.0,
        even: Color::new(0.9, 0.9, 0.9),
        odd: Color::new(0.2, 0.3, 0.8),
    }
}

#[test]
fn test_mirror_sphere_reflects_checker_floor() {
    let centre = Vec3::new(0.0, 0.0, 1.5);
    let floor = Arc::new(Material::diffuse(Color::ONE, Some(checker())));
    let mirror = Arc::new(Material::mirror(Color::ONE, None));

    let mut scene = Scene::new(Color::ZERO);
    scene.add_object(Box::new(Plane::new(40.0, 40.0, Transform::IDENTITY, Some(floor)).unwrap()));
    scene.add_object(Box::new(
        Sphere::new(1.0, Transform::translate(centre.x, centre.y, centre.z), Some(mirror)).unwrap(),
    ));
    scene.add_light(Box::new(DirectionalLight::new(Vec3::NEG_Z, Color::ONE, 1.0)));

    let options = RenderOptions {
        eye: Vec3::new(0.0, -6.0, 3.0),
        look_at: centre,
        up: Vec3::Z,
        gamma: 1.0,
        integrator: IntegratorKind::Direct,
        ..RenderOptions::default()
    };
    let gamma = options.gamma;
    let context = RenderContext::new(scene, options).unwrap();
    let image = Worker::new(&context, DEFAULT_BLOCK_SIZE)
        .unwrap()
        .run(&DeterministicSampler)
        .unwrap();

    let texture = checker();
    let offsets = [Vec2::new(2e-3, 0.0), Vec2::new(-2e-3, 0.0), Vec2::new(0.0, 2e-3), Vec2::new(0.0, -2e-3)];
    let mut checked = 0;

    // Lower half of the sphere, which reflects the floor
    for y in (130..180).step_by(2) {
        for x in (100..156).step_by(3) {
            let ray = context.view().apply(context.camera().ray(x, y, &mut DeterministicSampler));
            let Some(hit) = context.scene().intersect(&ray) else {
                continue;
            };
            if (hit.p.0 - centre).length() > 1.0 + 1e-3 {
                continue;
            }

            let d = ray.direction.vec();
            let n = hit.n.vec();
            let reflected = hit.spawn_ray(d - 2.0 * d.dot(n) * n);
            let Some(bounce) = context.scene().intersect(&reflected) else {
                continue;
            };
            // Skip the sphere's shadow and cells too close to a checker edge
            if bounce.p.z.abs() > 1e-3 || bounce.p.truncate().length() < 1.2 {
                continue;
            }
            let colour = texture.evaluate(bounce.uv);
            if offsets.iter().any(|&o| texture.evaluate(bounce.uv + o) != colour) {
                continue;
            }

            let expected = tone_map(colour * FRAC_1_PI, gamma);
            let actual = image.get(x, y);
            for c in 0..3 {
                assert!(
                    (actual[c] as i32 - expected[c] as i32).abs() <= 2,
                    "pixel ({x}, {y}): {actual:?} vs {expected:?}"
                );
            }
            checked += 1;
        }
    }

    assert!(checked > 20, "only {checked} pixels reflected the floor");
}

#[test]
fn test_glass_ball_is_dark_at_centre() {
    let mut scene = Scene::new(Color::ZERO);
    scene.add_object(Box::new(
        Sphere::new(1.0, Transform::IDENTITY, Some(Arc::new(Material::glass(1.5)))).unwrap(),
    ));
    // Lit floor below the frame, reachable only through the ball
    scene.add_object(Box::new(
        Plane::new(8.0, 12.0, Transform::translate(0.0, 0.0, -3.0), diffuse(1.0, 1.0, 1.0)).unwrap(),
    ));
    scene.add_light(Box::new(DirectionalLight::new(Vec3::NEG_Z, Color::ONE, PI)));

    let options = RenderOptions {
        eye: Vec3::new(0.0, -5.0, 0.0),
        look_at: Vec3::ZERO,
        up: Vec3::Z,
        fov: 30.0_f32.to_radians(),
        gamma: 1.0,
        integrator: IntegratorKind::Direct,
        ..RenderOptions::default()
    };
    let image = render(scene, &options, &SamplerConfig::Deterministic, DEFAULT_BLOCK_SIZE, 0).unwrap();

    // Silhouette radius in pixels
    let silhouette = 0.2_f32.asin().tan() / 15.0_f32.to_radians().tan() * 128.0;
    for y in 0..image.height() {
        for x in 0..image.width() {
            let offset = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - Vec2::splat(128.0);
            if offset.length() > silhouette + 3.0 {
                assert_eq!(image.get(x, y), [0, 0, 0, 255], "pixel ({x}, {y}) outside the ball");
            }
        }
    }

    let centre = image.get(128, 128)[0];
    let rim = (30..=60)
        .flat_map(|y| (126..=130).map(move |x| (x, y)))
        .map(|(x, y)| image.get(x, y)[0])
        .max()
        .unwrap_or(0);
    assert!(rim > centre, "rim {rim} centre {centre}");
}

#[test]
fn test_renders_are_reproducible() {
    let options = lit_sphere_options();
    let configs = [
        SamplerConfig::Deterministic,
        SamplerConfig::Random {
            samples_per_pixel: 4,
            seed: 11,
        },
    ];

    for config in &configs {
        let first = render(lit_sphere_scene(), &options, config, DEFAULT_BLOCK_SIZE, 4).unwrap();
        let second = render(lit_sphere_scene(), &options, config, DEFAULT_BLOCK_SIZE, 4).unwrap();
        assert!(first == second, "{config:?} renders differ");
    }
}
