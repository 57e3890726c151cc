//! Unit quaternion rotations
//!
//! Only what surface movement needs: heading and tilt construction, a
//! facing rotation, and capped rotation toward a target.

use crate::vector::Vec3;
use core::ops::Mul;

/// Rotation as a unit quaternion
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    fn from_parts(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// `angle` radians around `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::from_parts(axis.normalize() * sin, cos)
    }

    /// Rotation around Y (radians). A positive heading turns +Z toward +X.
    pub fn from_rotation_y(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, angle)
    }

    /// Shortest rotation taking direction `from` onto direction `to`
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let (from, to) = (from.normalize(), to.normalize());
        let cos = from.dot(to);
        if cos >= 1.0 - 1e-5 {
            return Self::IDENTITY;
        }
        if cos <= -1.0 + 1e-5 {
            let mut axis = from.cross(Vec3::X);
            if axis.length_squared() < 1e-6 {
                axis = from.cross(Vec3::Z);
            }
            return Self::from_axis_angle(axis, core::f32::consts::PI);
        }
        // Half-way vector: the rotation by twice the angle between from and half
        let half = (from + to).normalize();
        Self::from_parts(from.cross(half), from.dot(half))
    }

    /// Rotation whose +Z looks along `forward` with +Y as close to `up` as possible.
    ///
    /// Degenerate inputs fall back to the shortest arc from +Z.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let f = forward.normalize_or_zero();
        if f == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let r = up.cross(f).normalize_or_zero();
        if r == Vec3::ZERO {
            return Self::from_rotation_arc(Vec3::Z, f);
        }
        // Swing +Z onto f, then twist about f until the swung +Y meets the wanted up
        let swing = Self::from_rotation_arc(Vec3::Z, f);
        let up = f.cross(r);
        let swung_up = swing * Vec3::Y;
        let twist = f.dot(swung_up.cross(up)).atan2(swung_up.dot(up));
        (Self::from_axis_angle(f, twist) * swing).normalized()
    }

    fn normalized(self) -> Self {
        let len = self.dot(self).sqrt();
        if len > 0.0 {
            Self::from_parts(self.vector() / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    fn dot(self, other: Self) -> f32 {
        self.vector().dot(other.vector()) + self.w * other.w
    }

    /// Angle between two rotations in degrees
    pub fn angle_between(self, other: Self) -> f32 {
        let cos = self.dot(other).abs().min(1.0);
        if cos > 1.0 - 1e-6 {
            return 0.0;
        }
        crate::degrees(cos.acos() * 2.0)
    }

    /// Rotate toward `target` by at most `max_degrees`
    pub fn rotate_towards(self, target: Self, max_degrees: f32) -> Self {
        let step = max_degrees.abs();
        let angle = self.angle_between(target);
        if angle <= step {
            return target;
        }
        // Same hemisphere, so the interpolation takes the short way
        let target = if self.dot(target) < 0.0 {
            Self::from_parts(-target.vector(), -target.w)
        } else {
            target
        };
        let t = step / angle;
        let theta = crate::radians(angle) * 0.5;
        let (a, b) = (((1.0 - t) * theta).sin(), (t * theta).sin());
        let sin = theta.sin();
        Self::from_parts(
            (self.vector() * a + target.vector() * b) / sin,
            (self.w * a + target.w * b) / sin,
        )
        .normalized()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Hamilton product: `a * b` applies `b` first
impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.vector(), rhs.vector());
        Self::from_parts(
            b * self.w + a * rhs.w + a.cross(b),
            self.w * rhs.w - a.dot(b),
        )
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let q = self.vector();
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radians;
    use approx::assert_relative_eq;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn test_heading_turns_forward_toward_x() {
        let q = Quat::from_rotation_y(radians(90.0));
        assert!(close(q * Vec3::Z, Vec3::X));
    }

    #[test]
    fn test_rotation_arc_tilts_up_onto_normal() {
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let q = Quat::from_rotation_arc(Vec3::Y, normal);
        assert!(close(q * Vec3::Y, normal));

        let flip = Quat::from_rotation_arc(Vec3::Y, Vec3::NEG_Y);
        assert!(close(flip * Vec3::Y, Vec3::NEG_Y));
    }

    #[test]
    fn test_look_rotation() {
        let q = Quat::look_rotation(Vec3::X, Vec3::Y);
        assert!(close(q * Vec3::Z, Vec3::X));
        assert!(close(q * Vec3::Y, Vec3::Y));

        let back = Quat::look_rotation(Vec3::NEG_Z, Vec3::Y);
        assert!(close(back * Vec3::Z, Vec3::NEG_Z));

        assert_eq!(Quat::look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
    }

    #[test]
    fn test_look_rotation_diagonal_keeps_up() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let q = Quat::look_rotation(forward, Vec3::Y);
        assert!(close(q * Vec3::Z, forward));
        assert!(close(q * Vec3::Y, Vec3::Y));

        let slope = Vec3::new(0.0, 0.5, 1.0).normalize();
        let q = Quat::look_rotation(slope, Vec3::Y);
        assert!(close(q * Vec3::Z, slope));
        assert_relative_eq!((q * Vec3::X).y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_product_applies_right_first() {
        let yaw = Quat::from_rotation_y(radians(90.0));
        let tilt = Quat::from_rotation_arc(Vec3::Y, Vec3::NEG_Z);
        // yaw sends +X to -Z, tilt then sends -Z to -Y
        assert!(close((tilt * yaw) * Vec3::X, Vec3::NEG_Y));
        assert_eq!(Quat::default() * yaw, yaw);
    }

    #[test]
    fn test_rotate_towards_is_capped() {
        let from = Quat::IDENTITY;
        let to = Quat::from_rotation_y(radians(90.0));

        let step = from.rotate_towards(to, 30.0);
        assert_relative_eq!(from.angle_between(step), 30.0, epsilon = 1e-2);

        let done = from.rotate_towards(to, 120.0);
        assert_eq!(done, to);
    }
}
