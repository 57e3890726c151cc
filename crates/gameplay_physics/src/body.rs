//! Rigid-body access
//!
//! Movement logic only needs a body's linear velocity and rotation.
//! `RigidBodyAccess` exposes those two and derives the usual helpers
//! (speeds, flat vectors projected on the body's up axis, facing) on top.

use gameplay_math::{Quat, Vec3};

/// Read/write access to a simulated body
pub trait RigidBodyAccess {
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    /// Body up axis
    fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Body forward axis
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    fn speed(&self) -> f32 {
        self.linear_velocity().length()
    }

    /// Keep the direction, change the magnitude
    fn set_speed(&mut self, speed: f32) {
        let direction = self.linear_velocity().normalize_or_zero();
        self.set_linear_velocity(direction * speed);
    }

    fn speed_direction(&self) -> Vec3 {
        self.linear_velocity().normalize_or_zero()
    }

    /// Keep the magnitude, change the direction
    fn set_speed_direction(&mut self, direction: Vec3) {
        let speed = self.speed();
        self.set_linear_velocity(direction.normalize_or_zero() * speed);
    }

    /// Velocity projected on the plane orthogonal to the body's up axis
    fn flat_velocity(&self) -> Vec3 {
        self.linear_velocity().project_on_plane(self.up())
    }

    fn set_flat_velocity(&mut self, velocity: Vec3) {
        let up = self.up();
        self.set_linear_velocity(velocity.project_on_plane(up));
    }

    fn flat_speed(&self) -> f32 {
        self.flat_velocity().length()
    }

    fn set_flat_speed(&mut self, speed: f32) {
        let direction = self.flat_velocity().normalize_or_zero();
        self.set_linear_velocity(direction * speed);
    }

    fn flat_speed_direction(&self) -> Vec3 {
        self.flat_velocity().normalize_or_zero()
    }

    /// Forward axis projected on the plane orthogonal to the body's up axis
    fn forward_flat(&self) -> Vec3 {
        self.forward().project_on_plane(self.up())
    }

    /// Face `direction` with world up as reference
    fn set_forward(&mut self, direction: Vec3) {
        self.set_rotation(Quat::look_rotation(direction, Vec3::Y));
    }

    /// Face `direction` flattened onto the body's current horizontal plane
    fn set_forward_flat(&mut self, direction: Vec3) {
        let flat = direction.project_on_plane(self.up());
        self.set_rotation(Quat::look_rotation(flat, Vec3::Y));
    }
}

/// Standalone body integrated by hand, for tools and tests
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
}

impl KinematicBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Advance the position by the current velocity
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl RigidBodyAccess for KinematicBody {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_velocity_drops_vertical_part() {
        let body = KinematicBody::new().with_velocity(Vec3::new(3.0, -2.0, 4.0));
        assert_relative_eq!(body.speed(), 29f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(body.flat_speed(), 5.0, epsilon = 1e-5);
        assert_eq!(body.flat_velocity().y, 0.0);
    }

    #[test]
    fn test_speed_setters() {
        let mut body = KinematicBody::new().with_velocity(Vec3::new(0.0, 0.0, 2.0));
        body.set_speed(5.0);
        assert_relative_eq!(body.linear_velocity().z, 5.0, epsilon = 1e-5);

        body.set_speed_direction(Vec3::X);
        assert_relative_eq!(body.linear_velocity().x, 5.0, epsilon = 1e-5);

        body.set_flat_velocity(Vec3::new(1.0, 7.0, 0.0));
        assert_eq!(body.linear_velocity(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_forward_setters() {
        let mut body = KinematicBody::new();
        assert_eq!(body.forward(), Vec3::Z);

        body.set_forward(Vec3::X);
        let f = body.forward();
        assert_relative_eq!(f.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(body.up().y, 1.0, epsilon = 1e-5);

        body.set_forward_flat(Vec3::new(0.0, 5.0, -1.0));
        let f = body.forward_flat().normalize();
        assert_relative_eq!(f.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_integrate() {
        let mut body = KinematicBody::new().with_velocity(Vec3::new(1.0, 0.0, 0.0));
        body.integrate(0.5);
        assert_eq!(body.position, Vec3::new(0.5, 0.0, 0.0));
    }
}
