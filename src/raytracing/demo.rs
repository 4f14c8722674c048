//! Built in scenes, handy to try the renderer without a scene file.

use std::f64::consts::FRAC_PI_6;
use std::sync::Arc;

use super::camera::CameraConfig;
use super::material::StandardMaterial;
use super::math::Vec3;
use super::parser::ImageData;
use super::primitive::{Primitive, Shape};
use super::scene::{Light, Scene};
use super::texture::{Checkerboard, SurfaceNormal, WoodGrain};

fn ground() -> Primitive {
    Primitive::new(
        Shape::Plane,
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::zero(),
        Vec3::new(10.0, 10.0, 10.0),
    )
    .with_material(Arc::new(Checkerboard::default()))
}

fn sphere_at(position: Vec3, material: StandardMaterial) -> Primitive {
    Primitive::new(Shape::Sphere, position, Vec3::zero(), Vec3::one())
        .with_material(Arc::new(material))
}

fn looking_at_origin(position: Vec3) -> CameraConfig {
    CameraConfig {
        position,
        look_at: Vec3::zero(),
        ..Default::default()
    }
}

/// A glass sphere floating over a checkerboard.
pub fn refraction() -> ImageData {
    let mut scene = Scene::new();
    scene.add_light(Light::new(Vec3::new(0.0, 3.0, 1.0), Vec3::one(), 0.9));
    scene.add_object(ground());
    scene.add_object(sphere_at(Vec3::zero(), StandardMaterial::glass()));
    ImageData {
        camera: looking_at_origin(Vec3::new(0.0, 0.0, 10.0)),
        scene,
    }
}

/// A long metal slab reflecting a gold sphere and a cube.
pub fn mirror() -> ImageData {
    let mut scene = Scene::new();
    scene.add_light(Light::new(Vec3::new(0.0, 3.0, 1.0), Vec3::one(), 0.9));
    scene.add_object(ground());
    scene.add_object(
        Primitive::new(Shape::Cube, Vec3::zero(), Vec3::zero(), Vec3::new(5.0, 1.0, 1.0))
            .with_material(Arc::new(StandardMaterial::metal())),
    );
    scene.add_object(sphere_at(Vec3::new(2.0, 0.0, 3.0), StandardMaterial::gold()));
    scene.add_object(
        Primitive::new(Shape::Cube, Vec3::new(-4.0, 1.0, -3.0), Vec3::zero(), Vec3::one())
            .with_material(Arc::new(StandardMaterial::sky())),
    );
    ImageData {
        camera: looking_at_origin(Vec3::new(0.0, 1.0, 10.0)),
        scene,
    }
}

/// Every material and texture in one picture.
pub fn all_in_one() -> ImageData {
    let mut scene = Scene::new();
    scene.add_light(Light::new(Vec3::new(0.0, 1.0, 0.0), Vec3::one(), 0.9));
    scene.add_light(Light::new(Vec3::new(4.0, 6.0, -5.0), Vec3::one(), 0.8));

    let wide = Vec3::new(10.0, 10.0, 10.0);
    scene.add_object(ground());
    scene.add_object(
        Primitive::new(Shape::Plane, Vec3::new(0.0, 15.0, 0.0), Vec3::new(-FRAC_PI_6, 0.0, 0.0), wide)
            .with_material(Arc::new(StandardMaterial::sky())),
    );
    scene.add_object(
        Primitive::new(Shape::Plane, Vec3::new(0.0, 0.0, 10.0), Vec3::new(FRAC_PI_6, 0.0, 0.0), wide)
            .with_material(Arc::new(WoodGrain::default())),
    );
    scene.add_object(
        Primitive::new(Shape::Cube, Vec3::new(1.0, 0.5, -2.0), Vec3::zero(), Vec3::one())
            .with_material(Arc::new(StandardMaterial::gold())),
    );
    scene.add_object(sphere_at(Vec3::new(-2.0, 0.0, -1.5), StandardMaterial::metal()));
    scene.add_object(
        Primitive::new(Shape::Sphere, Vec3::new(-1.0, 2.0, 0.0), Vec3::zero(), Vec3::one())
            .with_material(Arc::new(SurfaceNormal::default())),
    );
    scene.add_object(sphere_at(Vec3::new(-4.0, 0.0, 0.0), StandardMaterial::glass()));
    scene.add_object(sphere_at(Vec3::new(-7.0, 0.0, -1.0), StandardMaterial::emerald()));
    ImageData {
        camera: looking_at_origin(Vec3::new(5.0, 1.0, 5.0)),
        scene,
    }
}
