use super::{LocalHit, LocalHits, EPSILON};
use crate::raytracing::ray::Ray;

/// Intersects the unit sphere centered at the origin.
///
/// Substituting the ray into x² + y² + z² = 1 gives a t² + b t + c = 0 with
/// a = |D|², b = 2 (O·D), c = |O|² - 1.
pub fn intersect(ray: &Ray) -> LocalHits {
    let mut hits = LocalHits::new();

    let a = ray.direction.squared_len();
    if a < f64::EPSILON {
        return hits;
    }
    let b = 2.0 * ray.origin.dot(ray.direction);
    let c = ray.origin.squared_len() - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return hits;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t0 = (-b - sqrt_discriminant) / (2.0 * a);
    let t1 = (-b + sqrt_discriminant) / (2.0 * a);

    for (t, is_entering) in [(t0, true), (t1, false)] {
        if t > EPSILON {
            hits.push(LocalHit {
                t,
                normal: ray.at(t).normalize(),
                is_entering,
                surface_index: 0,
            });
        }
    }
    hits
}
