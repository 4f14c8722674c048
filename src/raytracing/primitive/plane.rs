use super::{LocalHit, LocalHits, EPSILON};
use crate::raytracing::math::Vec3;
use crate::raytracing::ray::Ray;

const HALF_EXTENT: f64 = 0.5;

/// Intersects the bounded unit square lying in the local XZ plane.
pub fn intersect(ray: &Ray) -> LocalHits {
    let mut hits = LocalHits::new();

    // normal is +Y, so the dot products reduce to the y components
    let denominator = ray.direction.y;
    if denominator.abs() < f64::EPSILON {
        return hits;
    }
    let t = -ray.origin.y / denominator;
    if !t.is_finite() || t <= EPSILON {
        return hits;
    }

    let point = ray.at(t);
    if point.x.abs() > HALF_EXTENT || point.z.abs() > HALF_EXTENT {
        return hits;
    }

    hits.push(LocalHit {
        t,
        normal: Vec3::y_axis(),
        is_entering: true,
        surface_index: 0,
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::primitive::{HitPoint, Primitive, Shape};
    use float_cmp::approx_eq;

    #[test]
    fn ten_by_ten_plane_hit_from_above() {
        let plane = Primitive::new(Shape::Plane, Vec3::zero(), Vec3::zero(), Vec3::new(10.0, 1.0, 10.0));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hits: Vec<HitPoint> = plane.hit(&ray).collect();
        assert_eq!(hits.len(), 1);
        assert!(approx_eq!(f64, hits[0].t, 5.0, epsilon = 1e-9));
        assert!(hits[0].normal.distance(Vec3::y_axis()) < 1e-9);
        assert!(hits[0].is_entering);
    }

    #[test]
    fn plane_is_bounded() {
        let plane = Primitive::new(Shape::Plane, Vec3::zero(), Vec3::zero(), Vec3::new(10.0, 1.0, 10.0));
        let ray = Ray::new(Vec3::new(5.5, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(plane.hit(&ray).count(), 0);
    }

    #[test]
    fn parallel_and_receding_rays_miss() {
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::x_axis());
        let receding = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::y_axis());
        assert!(intersect(&parallel).is_empty());
        assert!(intersect(&receding).is_empty());
    }

    #[test]
    fn ray_leaving_the_surface_does_not_hit_it() {
        let ray = Ray::new(Vec3::zero(), Vec3::y_axis());
        assert!(intersect(&ray).is_empty());
    }
}
