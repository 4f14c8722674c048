use std::fmt;
use std::sync::Arc;

use super::material::{Material, StandardMaterial};
use super::math::Vec3;
use super::ray::Ray;
use super::transform::Transform;

pub mod cube;
pub mod cylinder;
pub mod plane;
pub mod sphere;

/// Minimum ray parameter accepted as a hit, avoids self intersection (shadow acne).
pub const EPSILON: f64 = 1e-4;

// cylinder wall and caps can report four candidates before filtering
const MAX_LOCAL_HITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Unit sphere centered at the origin.
    Sphere,
    /// Unit square [-0.5, 0.5]² lying in the XZ plane, facing +Y.
    Plane,
    /// Axis aligned cube [-1, 1]³.
    Cube,
    /// Capped cylinder of radius 1 between y = 0 and y = 1.
    Cylinder,
}

/// Intersection in the primitive's own coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHit {
    pub t: f64,
    pub normal: Vec3,
    pub is_entering: bool,
    pub surface_index: usize,
}

impl Default for LocalHit {
    fn default() -> Self {
        LocalHit {
            t: 0.0,
            normal: Vec3::zero(),
            is_entering: true,
            surface_index: 0,
        }
    }
}

/// Fixed capacity list of local hits kept sorted by ascending `t`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHits {
    hits: [LocalHit; MAX_LOCAL_HITS],
    len: usize,
}

impl LocalHits {
    pub fn new() -> LocalHits {
        LocalHits::default()
    }

    /// Inserts keeping the ordering; when full the farthest hit is dropped.
    pub fn push(&mut self, hit: LocalHit) {
        let mut index = self.len.min(MAX_LOCAL_HITS - 1);
        if self.len == MAX_LOCAL_HITS && hit.t >= self.hits[index].t {
            return;
        }
        while index > 0 && self.hits[index - 1].t > hit.t {
            self.hits[index] = self.hits[index - 1];
            index -= 1;
        }
        self.hits[index] = hit;
        self.len = (self.len + 1).min(MAX_LOCAL_HITS);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[LocalHit] {
        &self.hits[..self.len]
    }
}

impl IntoIterator for LocalHits {
    type Item = LocalHit;
    type IntoIter = std::iter::Take<std::array::IntoIter<LocalHit, MAX_LOCAL_HITS>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter().take(self.len)
    }
}

/// A world space intersection between a ray and a primitive.
#[derive(Debug, Clone, Copy)]
pub struct HitPoint<'a> {
    pub t: f64,
    pub point: Vec3,
    /// Geometric unit normal, pointing out of the primitive.
    pub normal: Vec3,
    pub is_entering: bool,
    pub surface_index: usize,
    pub primitive: &'a Primitive,
}

impl<'a> HitPoint<'a> {
    pub fn material(&self) -> &'a dyn Material {
        self.primitive.material()
    }
}

pub struct Primitive {
    shape: Shape,
    transform: Transform,
    material: Arc<dyn Material>,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("shape", &self.shape)
            .field("position", &self.transform.position())
            .field("rotation", &self.transform.rotation())
            .field("scale", &self.transform.scale())
            .finish()
    }
}

impl Primitive {
    pub fn new(shape: Shape, position: Vec3, rotation: Vec3, scale: Vec3) -> Primitive {
        Primitive {
            shape,
            transform: Transform::new(position, rotation, scale),
            material: Arc::new(StandardMaterial::default()),
        }
    }

    /// The canonical shape at the origin, without rotation or scale.
    pub fn unit(shape: Shape) -> Primitive {
        Primitive::new(shape, Vec3::zero(), Vec3::zero(), Vec3::one())
    }

    pub fn with_material(mut self, material: Arc<dyn Material>) -> Primitive {
        self.material = material;
        self
    }

    pub fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.set_rotation(rotation);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.set_scale(scale);
    }

    /// Intersects a ray already expressed in the primitive's local frame.
    pub fn intersect_local(&self, ray: &Ray) -> LocalHits {
        match self.shape {
            Shape::Sphere => sphere::intersect(ray),
            Shape::Plane => plane::intersect(ray),
            Shape::Cube => cube::intersect(ray),
            Shape::Cylinder => cylinder::intersect(ray),
        }
    }

    pub fn to_world(&self, local_point: Vec3, hit: LocalHit) -> HitPoint<'_> {
        HitPoint {
            t: hit.t,
            point: self.transform.point_to_world(local_point),
            normal: self.transform.normal_to_world(hit.normal),
            is_entering: hit.is_entering,
            surface_index: hit.surface_index,
            primitive: self,
        }
    }

    /// All the intersections of a world space ray, ordered by `t`.
    ///
    /// The ray parameter is preserved by the affine transform, so `t` is comparable
    /// between primitives.
    pub fn hit<'a>(&'a self, ray: &Ray) -> impl Iterator<Item = HitPoint<'a>> + 'a {
        let local_ray = ray.transformed(self.transform.world_to_local());
        let hits = self.intersect_local(&local_ray);
        let (origin, direction) = (local_ray.origin, local_ray.direction);
        hits.into_iter()
            .map(move |hit| self.to_world(origin + direction * hit.t, hit))
    }

    /// Whether anything of this primitive lies strictly between the ray origin and
    /// `origin + direction` (t in (0, 1)).
    pub fn has_shadow_hit(&self, ray: &Ray) -> bool {
        let local_ray = ray.transformed(self.transform.world_to_local());
        self.intersect_local(&local_ray)
            .as_slice()
            .iter()
            .any(|hit| hit.t < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn local_hits_stay_sorted() {
        let mut hits = LocalHits::new();
        for t in [3.0, 1.0, 2.0] {
            hits.push(LocalHit {
                t,
                ..LocalHit::default()
            });
        }
        let ts: Vec<f64> = hits.into_iter().map(|hit| hit.t).collect();
        assert_eq!(ts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn local_hits_drop_the_farthest_when_full() {
        let mut hits = LocalHits::new();
        for t in [5.0, 4.0, 3.0, 2.0, 1.0, 6.0] {
            hits.push(LocalHit {
                t,
                ..LocalHit::default()
            });
        }
        let ts: Vec<f64> = hits.as_slice().iter().map(|hit| hit.t).collect();
        assert_eq!(ts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn translated_and_scaled_sphere_is_hit_in_world_space() {
        let sphere = Primitive::new(
            Shape::Sphere,
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::zero(),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let hits: Vec<HitPoint> = sphere.hit(&ray).collect();
        assert_eq!(hits.len(), 2);
        assert!(approx_eq!(f64, hits[0].t, 8.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, hits[1].t, 12.0, epsilon = 1e-9));
        assert!(hits[0].point.distance(Vec3::new(0.0, 0.0, -8.0)) < 1e-9);
        assert!(hits[0].normal.distance(Vec3::z_axis()) < 1e-9);
        assert!(hits[1].normal.distance(-Vec3::z_axis()) < 1e-9);
        assert!(hits[0].is_entering && !hits[1].is_entering);
        assert!(std::ptr::eq(hits[0].primitive, &sphere));
    }

    #[test]
    fn tiny_sphere_keeps_its_own_inverse() {
        let size = 5e-5;
        let sphere = Primitive::new(
            Shape::Sphere,
            Vec3::zero(),
            Vec3::zero(),
            Vec3::new(size, size, size),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::z_axis());
        let hits: Vec<HitPoint> = sphere.hit(&ray).collect();
        assert_eq!(hits.len(), 2);
        assert!(approx_eq!(f64, hits[0].t, 5.0 - size, epsilon = 1e-9));
        assert!(approx_eq!(f64, hits[1].t, 5.0 + size, epsilon = 1e-9));
        for hit in &hits {
            assert!(hit.point.distance(ray.at(hit.t)) < 1e-9);
        }
    }

    #[test]
    fn ellipsoid_normals_use_the_inverse_transpose() {
        let ellipsoid = Primitive::new(
            Shape::Sphere,
            Vec3::zero(),
            Vec3::zero(),
            Vec3::new(4.0, 1.0, 1.0),
        );
        // point (2, sqrt(3)/2, 0) lies on x²/16 + y² = 1
        let target = Vec3::new(2.0, 3f64.sqrt() / 2.0, 0.0);
        let ray = Ray::new(Vec3::new(10.0, target.y, 0.0), -Vec3::x_axis());
        let hit = ellipsoid.hit(&ray).next().unwrap();
        let expected = Vec3::new(target.x / 16.0, target.y, 0.0).normalize();
        assert!(hit.point.distance(target) < 1e-9);
        assert!(hit.normal.distance(expected) < 1e-9);
    }

    #[test]
    fn shadow_hits_only_count_before_the_light() {
        let sphere = Primitive::new(Shape::Sphere, Vec3::new(0.0, 0.0, 5.0), Vec3::zero(), Vec3::one());
        let toward_far_light = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 10.0));
        let toward_near_light = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 2.0));
        assert!(sphere.has_shadow_hit(&toward_far_light));
        assert!(!sphere.has_shadow_hit(&toward_near_light));
    }
}
