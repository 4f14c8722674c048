use super::{LocalHit, LocalHits, EPSILON};
use crate::raytracing::math::Vec3;
use crate::raytracing::ray::Ray;

const RADIUS: f64 = 1.0;
const HEIGHT: f64 = 1.0;

pub const WALL: usize = 0;
pub const TOP_CAP: usize = 1;
pub const BOTTOM_CAP: usize = 2;

/// Intersects the capped cylinder of radius 1 standing on the XZ plane, y in [0, 1].
pub fn intersect(ray: &Ray) -> LocalHits {
    let mut candidates = LocalHits::new();
    let o = ray.origin;
    let d = ray.direction;

    // lateral surface: x² + z² = r², ignoring y
    let a = d.x * d.x + d.z * d.z;
    if a > f64::EPSILON {
        let b = 2.0 * (o.x * d.x + o.z * d.z);
        let c = o.x * o.x + o.z * o.z - RADIUS * RADIUS;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let sqrt_discriminant = discriminant.sqrt();
            for t in [
                (-b - sqrt_discriminant) / (2.0 * a),
                (-b + sqrt_discriminant) / (2.0 * a),
            ] {
                let point = ray.at(t);
                if t > EPSILON && (0.0..=HEIGHT).contains(&point.y) {
                    let normal = Vec3::new(point.x, 0.0, point.z).normalize();
                    candidates.push(tag(t, normal, d, WALL));
                }
            }
        }
    }

    // caps
    if d.y.abs() > f64::EPSILON {
        for (plane_y, normal, surface) in [
            (HEIGHT, Vec3::y_axis(), TOP_CAP),
            (0.0, -Vec3::y_axis(), BOTTOM_CAP),
        ] {
            let t = (plane_y - o.y) / d.y;
            let point = ray.at(t);
            if t > EPSILON && point.x * point.x + point.z * point.z <= RADIUS * RADIUS {
                candidates.push(tag(t, normal, d, surface));
            }
        }
    }

    // a ray through the rim meets the wall and a cap at the same t
    let mut hits = LocalHits::new();
    let mut last_t = f64::NEG_INFINITY;
    for hit in candidates {
        if hit.t - last_t > EPSILON {
            hits.push(hit);
            last_t = hit.t;
        }
    }
    hits
}

fn tag(t: f64, normal: Vec3, direction: Vec3, surface_index: usize) -> LocalHit {
    LocalHit {
        t,
        normal,
        is_entering: normal.dot(direction) < 0.0,
        surface_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn horizontal_ray_crosses_the_wall_twice() {
        let ray = Ray::new(Vec3::new(-3.0, 0.5, 0.0), Vec3::x_axis());
        let hits = intersect(&ray);
        assert_eq!(hits.len(), 2);
        let [entry, exit] = [hits.as_slice()[0], hits.as_slice()[1]];
        assert!(approx_eq!(f64, entry.t, 2.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, exit.t, 4.0, epsilon = 1e-9));
        assert!(entry.is_entering && !exit.is_entering);
        assert_eq!(entry.surface_index, WALL);
        assert!(entry.normal.distance(-Vec3::x_axis()) < 1e-9);
        assert!(exit.normal.distance(Vec3::x_axis()) < 1e-9);
    }

    #[test]
    fn vertical_ray_goes_through_both_caps() {
        let ray = Ray::new(Vec3::new(0.2, 3.0, -0.1), Vec3::new(0.0, -1.0, 0.0));
        let hits = intersect(&ray);
        assert_eq!(hits.len(), 2);
        let [entry, exit] = [hits.as_slice()[0], hits.as_slice()[1]];
        assert_eq!(entry.surface_index, TOP_CAP);
        assert_eq!(exit.surface_index, BOTTOM_CAP);
        assert!(approx_eq!(f64, entry.t, 2.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, exit.t, 3.0, epsilon = 1e-9));
        assert!(entry.is_entering && !exit.is_entering);
    }

    #[test]
    fn slanted_ray_enters_the_cap_and_leaves_through_the_wall() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.8, -1.0, 0.0));
        let hits = intersect(&ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.as_slice()[0].surface_index, TOP_CAP);
        assert_eq!(hits.as_slice()[1].surface_index, WALL);
        assert!(approx_eq!(f64, hits.as_slice()[0].t, 1.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, hits.as_slice()[1].t, 1.25, epsilon = 1e-9));
    }

    #[test]
    fn ray_above_the_cylinder_misses() {
        let ray = Ray::new(Vec3::new(-3.0, 1.5, 0.0), Vec3::x_axis());
        assert!(intersect(&ray).is_empty());
    }

    #[test]
    fn ray_from_the_wall_outward_does_not_hit_again() {
        let ray = Ray::new(Vec3::new(1.0, 0.5, 0.0), Vec3::x_axis());
        assert!(intersect(&ray).is_empty());
    }
}
