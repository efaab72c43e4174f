//! The built-in demo scene.

use rtx_core::{CheesePlane, Color, Light, Material, Object, Point3, Scene, Vec3};
use rtx_renderer::Camera;

/// Screen distance of the demo camera.
const SCREEN_DIST: f32 = 1400.0;

/// Five spheres of mixed glass, matte and mirror finishes on a checkered
/// floor, lit by two point lights and one sphere light.
pub fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let spheres = [
        // center, radius, reflectance, transmittance, eta, diffuse
        ((200.0, 200.0, 500.0), 200.0, Color::new(0.2, 0.0, 0.0), 0.75, 1.6, 1.0),
        ((250.0, 300.0, 1200.0), 300.0, Color::new(0.2, 0.55, 0.0), 0.4, 1.5, 1.0),
        ((500.0, 200.0, 700.0), 200.0, Color::new(0.4, 0.0, 0.5), 0.35, 1.4, 1.0),
        ((1000.0, 400.0, 1100.0), 400.0, Color::splat(0.99), 0.0, 1.0, 0.0),
        ((900.0, 200.0, 500.0), 200.0, Color::new(0.5, 0.3, 0.4), 0.2, 1.5, 1.0),
    ];
    for ((x, y, z), radius, reflectance, transmittance, eta, diffuse) in spheres {
        let material = Material::new(reflectance)
            .with_transmittance(Color::splat(transmittance), eta)
            .with_diffuse(diffuse);
        scene.add_object(Object::sphere(Point3::new(x, y, z), radius, material));
    }

    let floor = CheesePlane::new(Vec3::Y, Point3::ORIGIN).with_colors(Color::splat(0.7), Color::splat(0.2));
    scene.add_object(Object::cheese_plane(floor, Material::new(Color::splat(0.7)).with_diffuse(1.0)));

    scene.add_object(Object::triangle(
        Point3::new(-400.0, 0.0, 2200.0),
        Point3::new(300.0, 900.0, 2400.0),
        Point3::new(1000.0, 0.0, 2200.0),
        Material::new(Color::new(0.3, 0.3, 0.6)).with_diffuse(0.6),
    ));

    let white = Color::splat(255.0);
    scene.add_light(Light::dot(Point3::new(100.0, 300.0, 100.0), white, 0.5));
    scene.add_light(Light::dot(Point3::new(1400.0, 500.0, 200.0), white, 0.6));
    scene.add_light(Light::sphere_dot(Point3::new(600.0, 900.0, 300.0), 60.0, white, 0.8));

    scene.build();
    scene
}

/// Camera whose screen spans `width` x `height` scene units from the origin,
/// looking down +Z.
pub fn camera(width: u32, height: u32) -> Camera {
    Camera::new(Point3::ORIGIN, Vec3::Y, Vec3::X, width as f32, height as f32, SCREEN_DIST)
}
