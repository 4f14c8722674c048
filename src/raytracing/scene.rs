use std::sync::Arc;

use super::math::Vec3;
use super::primitive::{HitPoint, Primitive, EPSILON};
use super::ray::Ray;

/// Point light. Lights are never intersected by rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f64,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3, intensity: f64) -> Light {
        Light {
            position,
            color,
            intensity,
        }
    }

    /// Per channel radiance reaching a lit point.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Read only queries the shader needs from the world.
pub trait SceneQuery {
    /// Nearest intersection with `t > EPSILON`, ties resolved in insertion order.
    fn best_hit<'a>(&'a self, ray: &Ray) -> Option<HitPoint<'a>>;

    /// Whether something blocks the feeler ray before it reaches `origin + direction`.
    fn is_in_shadow(&self, feeler: &Ray) -> bool;

    fn lights(&self) -> &[Light];
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Arc<Primitive>>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn add_object(&mut self, primitive: Primitive) -> Arc<Primitive> {
        let shared = Arc::new(primitive);
        self.objects.push(shared.clone());
        shared
    }

    pub fn add_shared(&mut self, primitive: Arc<Primitive>) {
        self.objects.push(primitive);
    }

    /// Removes the given primitive (by identity), returns whether it was in the scene.
    pub fn remove_object(&mut self, primitive: &Arc<Primitive>) -> bool {
        let before = self.objects.len();
        self.objects.retain(|object| !Arc::ptr_eq(object, primitive));
        self.objects.len() != before
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[Arc<Primitive>] {
        &self.objects
    }
}

impl SceneQuery for Scene {
    fn best_hit<'a>(&'a self, ray: &Ray) -> Option<HitPoint<'a>> {
        let mut best: Option<HitPoint<'a>> = None;
        for object in &self.objects {
            let nearest = object.hit(ray).find(|hit| hit.t > EPSILON);
            if let Some(hit) = nearest {
                // strict comparison keeps the first inserted primitive on ties
                if best.map_or(true, |current| hit.t < current.t) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    fn is_in_shadow(&self, feeler: &Ray) -> bool {
        self.objects.iter().any(|object| object.has_shadow_hit(feeler))
    }

    fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::primitive::Shape;
    use float_cmp::approx_eq;

    fn sphere_at(position: Vec3) -> Primitive {
        Primitive::new(Shape::Sphere, position, Vec3::zero(), Vec3::one())
    }

    #[test]
    fn best_hit_is_the_nearest() {
        let mut scene = Scene::new();
        scene.add_object(sphere_at(Vec3::new(0.0, 0.0, -10.0)));
        let near = scene.add_object(sphere_at(Vec3::new(0.0, 0.0, -4.0)));
        let hit = scene
            .best_hit(&Ray::new(Vec3::zero(), -Vec3::z_axis()))
            .unwrap();
        assert!(approx_eq!(f64, hit.t, 3.0, epsilon = 1e-9));
        assert!(std::ptr::eq(hit.primitive, near.as_ref()));
    }

    #[test]
    fn ties_go_to_the_first_inserted() {
        let mut scene = Scene::new();
        let first = scene.add_object(sphere_at(Vec3::new(0.0, 0.0, -4.0)));
        scene.add_object(Primitive::new(
            Shape::Cube,
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::zero(),
            Vec3::one(),
        ));
        let hit = scene
            .best_hit(&Ray::new(Vec3::zero(), -Vec3::z_axis()))
            .unwrap();
        assert!(approx_eq!(f64, hit.t, 3.0, epsilon = 1e-9));
        assert!(std::ptr::eq(hit.primitive, first.as_ref()));
    }

    #[test]
    fn empty_scene_has_no_hit_and_no_shadow() {
        let scene = Scene::new();
        let ray = Ray::new(Vec3::zero(), Vec3::x_axis());
        assert!(scene.best_hit(&ray).is_none());
        assert!(!scene.is_in_shadow(&ray));
    }

    #[test]
    fn shadow_is_reciprocal() {
        let mut scene = Scene::new();
        scene.add_object(sphere_at(Vec3::new(0.0, 2.0, 0.0)));
        let a = Vec3::new(0.3, -1.0, 0.1);
        let b = Vec3::new(-0.2, 5.0, 0.4);
        let forward = Ray::new(a, b - a);
        let backward = Ray::new(b, a - b);
        assert!(scene.is_in_shadow(&forward));
        assert_eq!(scene.is_in_shadow(&forward), scene.is_in_shadow(&backward));

        let c = Vec3::new(4.0, -1.0, 0.0);
        let d = Vec3::new(4.0, 5.0, 0.0);
        assert!(!scene.is_in_shadow(&Ray::new(c, d - c)));
        assert!(!scene.is_in_shadow(&Ray::new(d, c - d)));
    }

    #[test]
    fn shadowed_feelers_hit_before_the_light() {
        let mut scene = Scene::new();
        scene.add_object(sphere_at(Vec3::new(-2.0, 0.0, 0.0)));
        scene.add_object(Primitive::new(
            Shape::Cube,
            Vec3::new(1.5, 0.5, 0.0),
            Vec3::new(0.4, 0.7, -0.2),
            Vec3::new(1.5, 0.5, 0.8),
        ));
        scene.add_object(Primitive::new(
            Shape::Cylinder,
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(0.3, 0.0, 0.5),
            Vec3::new(0.6, 1.5, 0.6),
        ));

        let light = Vec3::new(0.3, 6.0, 1.0);
        let mut shadowed = 0;
        for i in 0..40 {
            for j in 0..40 {
                let origin = Vec3::new(-4.0 + i as f64 * 0.2, -3.0, -4.0 + j as f64 * 0.15);
                let feeler = Ray::new(origin, light - origin);
                if scene.is_in_shadow(&feeler) {
                    shadowed += 1;
                    let hit = scene.best_hit(&feeler).unwrap();
                    assert!(hit.t > 0.0 && hit.t < 1.0, "t = {} from {:?}", hit.t, origin);
                }
            }
        }
        assert!(shadowed > 0);
    }

    #[test]
    fn shared_primitives_can_live_in_several_scenes() {
        let sphere = Arc::new(sphere_at(Vec3::new(0.0, 0.0, -4.0)));
        let mut first = Scene::new();
        let mut second = Scene::new();
        first.add_shared(sphere.clone());
        second.add_shared(sphere.clone());

        let ray = Ray::new(Vec3::zero(), -Vec3::z_axis());
        let a = first.best_hit(&ray).unwrap();
        let b = second.best_hit(&ray).unwrap();
        assert!(std::ptr::eq(a.primitive, b.primitive));

        assert!(first.remove_object(&sphere));
        assert!(first.best_hit(&ray).is_none());
        assert!(second.best_hit(&ray).is_some());
    }

    #[test]
    fn removed_objects_are_no_longer_hit() {
        let mut scene = Scene::new();
        let sphere = scene.add_object(sphere_at(Vec3::new(0.0, 0.0, -4.0)));
        assert!(scene.remove_object(&sphere));
        assert!(!scene.remove_object(&sphere));
        assert!(scene
            .best_hit(&Ray::new(Vec3::zero(), -Vec3::z_axis()))
            .is_none());
    }

    #[test]
    fn light_radiance_scales_the_color() {
        let light = Light::new(Vec3::zero(), Vec3::new(1.0, 0.5, 0.0), 0.8);
        assert_eq!(light.radiance(), Vec3::new(0.8, 0.4, 0.0));
    }
}
