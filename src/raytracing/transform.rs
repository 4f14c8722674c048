use log::warn;

use super::math::{Mat4, Vec3};

/// Placement of a primitive in the world: position, Euler rotation (radians) and scale,
/// together with the matrices derived from them.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    local_to_world: Mat4,
    world_to_local: Mat4,
    // transpose of world_to_local, brings normals back to world space
    normal_to_world: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::new(Vec3::zero(), Vec3::zero(), Vec3::one())
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Transform {
        let mut transform = Transform {
            position,
            rotation,
            scale,
            local_to_world: Mat4::identity(),
            world_to_local: Mat4::identity(),
            normal_to_world: Mat4::identity(),
        };
        transform.rebuild();
        transform
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.rebuild();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.rebuild();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.rebuild();
    }

    pub fn local_to_world(&self) -> &Mat4 {
        &self.local_to_world
    }

    pub fn world_to_local(&self) -> &Mat4 {
        &self.world_to_local
    }

    // scale first, then rotate, then move in place
    fn rebuild(&mut self) {
        self.local_to_world = Mat4::scale(self.scale)
            .then(&Mat4::rotate_euler(self.rotation))
            .then(&Mat4::translate(self.position));

        match self.local_to_world.inverse() {
            Some(inverse) => {
                self.world_to_local = inverse;
                self.normal_to_world = inverse.transpose();
            }
            None => warn!(
                "singular transform (position {:?}, rotation {:?}, scale {:?}), keeping the previous inverse",
                self.position, self.rotation, self.scale
            ),
        }
    }

    pub fn point_to_world(&self, point: Vec3) -> Vec3 {
        self.local_to_world.transform_point(point)
    }

    /// Maps a local normal to a unit world normal, correct under non-uniform scale.
    pub fn normal_to_world(&self, normal: Vec3) -> Vec3 {
        self.normal_to_world.transform_vector(normal).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_local_space() {
        let transform = Transform::new(
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(0.4, 0.2, -0.9),
            Vec3::new(2.0, 0.5, 1.5),
        );
        let p = Vec3::new(-0.3, 0.8, 4.0);
        let back = transform.point_to_world(transform.world_to_local().transform_point(p));
        assert!(back.distance(p) < 1e-9);
    }

    #[test]
    fn normals_stay_perpendicular_under_non_uniform_scale() {
        // a slanted plane x + y = 0 squashed along y
        let transform = Transform::new(Vec3::zero(), Vec3::zero(), Vec3::new(1.0, 4.0, 1.0));
        let local_normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let local_tangent = Vec3::new(1.0, -1.0, 0.0);
        let world_tangent = transform.local_to_world().transform_vector(local_tangent);
        let world_normal = transform.normal_to_world(local_normal);
        assert!(world_normal.dot(world_tangent).abs() < 1e-9);
        assert!((world_normal.len() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singular_scale_keeps_previous_inverse() {
        let mut transform = Transform::new(Vec3::new(0.0, 1.0, 0.0), Vec3::zero(), Vec3::one());
        let before = *transform.world_to_local();
        transform.set_scale(Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(*transform.world_to_local(), before);
    }
}
