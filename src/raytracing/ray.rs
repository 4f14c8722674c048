use super::math::{Mat4, Vec3};
use super::primitive::Primitive;

/// A parametric line together with the stack of primitives it currently travels inside.
///
/// The last element of `inside` is the current medium. The stack is owned by the ray, so
/// every transformed or spawned ray carries its own copy.
#[derive(Debug, Clone)]
pub struct Ray<'a> {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inside: Vec<&'a Primitive>,
}

impl<'a> Ray<'a> {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray<'a> {
        Ray {
            origin,
            direction,
            inside: Vec::new(),
        }
    }

    pub fn with_medium(origin: Vec3, direction: Vec3, inside: Vec<&'a Primitive>) -> Ray<'a> {
        Ray {
            origin,
            direction,
            inside,
        }
    }

    pub fn at(self: &Self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed through `matrix`: origin as a point, direction as a vector.
    pub fn transformed(&self, matrix: &Mat4) -> Ray<'a> {
        Ray {
            origin: matrix.transform_point(self.origin),
            direction: matrix.transform_vector(self.direction),
            inside: self.inside.clone(),
        }
    }

    pub fn current_medium(&self) -> Option<&'a Primitive> {
        self.inside.last().copied()
    }

    /// Refraction index of the medium the ray travels in, vacuum when outside everything.
    pub fn medium_refraction_index(&self) -> f64 {
        self.current_medium()
            .map(|primitive| primitive.material().surface().refraction_index())
            .unwrap_or(1.0)
    }

    /// Medium stack after crossing the surface of `primitive`.
    pub fn crossing(&self, primitive: &'a Primitive, entering: bool) -> Vec<&'a Primitive> {
        let mut inside = self.inside.clone();
        if entering {
            inside.push(primitive);
        } else if let Some(index) = inside
            .iter()
            .rposition(|candidate| std::ptr::eq(*candidate, primitive))
        {
            inside.remove(index);
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::primitive::Shape;

    #[test]
    fn transform_copies_the_medium_stack() {
        let glass = Primitive::unit(Shape::Sphere);
        let ray = Ray::with_medium(Vec3::zero(), Vec3::x_axis(), vec![&glass]);
        let mut local = ray.transformed(&Mat4::translate(Vec3::one()));
        local.inside.clear();
        assert_eq!(ray.inside.len(), 1);
        assert_eq!(local.origin, Vec3::one());
        assert_eq!(local.direction, Vec3::x_axis());
    }

    #[test]
    fn crossing_pushes_and_removes_by_identity() {
        let outer = Primitive::unit(Shape::Sphere);
        let inner = Primitive::unit(Shape::Cube);
        let ray = Ray::with_medium(Vec3::zero(), Vec3::x_axis(), vec![&outer]);

        let entered = ray.crossing(&inner, true);
        assert_eq!(entered.len(), 2);
        assert!(std::ptr::eq(entered[1], &inner));

        // leaving the outer object while still inside the inner one
        let inside_inner = Ray::with_medium(Vec3::zero(), Vec3::x_axis(), entered);
        let left = inside_inner.crossing(&outer, false);
        assert_eq!(left.len(), 1);
        assert!(std::ptr::eq(left[0], &inner));

        // leaving something we never entered is a no-op
        assert_eq!(ray.crossing(&inner, false).len(), 1);
    }

    #[test]
    fn vacuum_when_the_stack_is_empty() {
        let ray = Ray::new(Vec3::zero(), Vec3::z_axis());
        assert_eq!(ray.medium_refraction_index(), 1.0);
    }
}
