//! Effective gravity

use gameplay_math::Vec3;
use serde::{Deserialize, Serialize};

/// How a body's effective gravity is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityModel {
    /// Always the world gravity
    #[default]
    World,
    /// Into the floor once a floor is found: `-floor_normal * |world gravity|`
    SurfaceRelative,
}

impl GravityModel {
    /// Effective gravity given the world gravity and the current floor normal
    pub fn resolve(self, world: Vec3, floor_normal: Option<Vec3>) -> Vec3 {
        match (self, floor_normal) {
            (Self::SurfaceRelative, Some(normal)) => -normal.normalize_or_zero() * world.length(),
            _ => world,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_world_ignores_floor() {
        let g = Vec3::new(0.0, -9.81, 0.0);
        assert_eq!(GravityModel::World.resolve(g, Some(Vec3::X)), g);
        assert_eq!(GravityModel::SurfaceRelative.resolve(g, None), g);
    }

    #[test]
    fn test_surface_relative_follows_slope() {
        let g = Vec3::new(0.0, -9.81, 0.0);
        let slope = Vec3::new(0.0, 1.0, 1.0).normalize();
        let resolved = GravityModel::SurfaceRelative.resolve(g, Some(slope));

        assert_relative_eq!(resolved.length(), 9.81, epsilon = 1e-4);
        assert_relative_eq!(resolved.normalize().dot(slope), -1.0, epsilon = 1e-5);
    }
}
