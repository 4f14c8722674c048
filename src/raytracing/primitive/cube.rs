use super::{LocalHit, LocalHits, EPSILON};
use crate::raytracing::math::Vec3;
use crate::raytracing::ray::Ray;

const PARALLEL_EPSILON: f64 = 1e-9;

/// Outward normal of each face, indexed by surface index.
pub const FACE_NORMALS: [Vec3; 6] = [
    Vec3 { x: 0.0, y: 1.0, z: 0.0 },
    Vec3 { x: 0.0, y: -1.0, z: 0.0 },
    Vec3 { x: 1.0, y: 0.0, z: 0.0 },
    Vec3 { x: -1.0, y: 0.0, z: 0.0 },
    Vec3 { x: 0.0, y: 0.0, z: 1.0 },
    Vec3 { x: 0.0, y: 0.0, z: -1.0 },
];

/// Intersects the axis aligned cube [-1, 1]³ with the slab method.
///
/// Each face is the half-space `n · p <= 1`: the ray enters the face plane when moving
/// against the normal and exits when moving along it.
pub fn intersect(ray: &Ray) -> LocalHits {
    let mut hits = LocalHits::new();

    let mut t_in = f64::NEG_INFINITY;
    let mut t_out = f64::INFINITY;
    let mut in_surface = 0;
    let mut out_surface = 0;

    for (surface, normal) in FACE_NORMALS.iter().enumerate() {
        let numerator = 1.0 - normal.dot(ray.origin);
        let denominator = normal.dot(ray.direction);

        if denominator.abs() < PARALLEL_EPSILON {
            // parallel to the face: either always inside its half-space or never
            if numerator < 0.0 {
                return hits;
            }
            continue;
        }

        let t = numerator / denominator;
        if denominator > 0.0 {
            if t < t_out {
                t_out = t;
                out_surface = surface;
            }
        } else if t > t_in {
            t_in = t;
            in_surface = surface;
        }
    }

    if !t_in.is_finite() || !t_out.is_finite() || t_in >= t_out {
        return hits;
    }

    if t_in > EPSILON {
        hits.push(LocalHit {
            t: t_in,
            normal: FACE_NORMALS[in_surface],
            is_entering: true,
            surface_index: in_surface,
        });
    }
    if t_out > EPSILON {
        hits.push(LocalHit {
            t: t_out,
            normal: FACE_NORMALS[out_surface],
            is_entering: false,
            surface_index: out_surface,
        });
    }
    hits
}
