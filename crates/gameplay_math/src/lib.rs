//! # gameplay_math - Gameplay Math
//!
//! Stateless math used by the gameplay layers:
//! - `Vec3` / `Quat` with a Y-up, Z-forward convention
//! - `Interval`, a numeric range classifier with inner/outer mode and
//!   per-bound strictness
//! - angle helpers working in degrees (signed angle around an axis,
//!   capped linear and angular steps)

pub mod interval;
pub mod quaternion;
pub mod vector;

pub use interval::*;
pub use quaternion::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Drop every decimal digit past `digits` (toward zero)
///
/// Used to keep float jitter out of idle/moving decisions.
#[inline]
pub fn truncate(value: f32, digits: u8) -> f32 {
    let scale = 10f32.powi(digits as i32);
    (value * scale).trunc() / scale
}

/// Step `current` toward `target` by at most `max_step`, never overshooting
#[inline]
pub fn move_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let step = max_step.abs();
    if (target - current).abs() <= step {
        target
    } else if current < target {
        current + step
    } else {
        current - step
    }
}

/// Shortest signed difference `to - from` in degrees, in `[-180, 180)`
#[inline]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Step an angle (degrees) toward `target` along the shortest arc.
///
/// Lands exactly on `target` once within `max_step`.
pub fn move_towards_angle(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = delta_angle(current, target);
    let step = max_step.abs();
    if delta.abs() <= step {
        return target;
    }
    wrap_angle(current + step.copysign(delta))
}

/// Wrap an angle in degrees into `[-180, 180]`
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    if (-180.0..=180.0).contains(&angle) {
        angle
    } else {
        (angle + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Unsigned angle between two vectors in degrees, `0` if either is degenerate
pub fn angle_between(from: Vec3, to: Vec3) -> f32 {
    let denom = (from.length_squared() * to.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    let cos = clamp(from.dot(to) / denom, -1.0, 1.0);
    degrees(cos.acos())
}

/// Signed angle from `from` to `to` in degrees, around `axis`.
///
/// The sign is taken from `axis . (from x to)`; a zero projection counts as
/// positive, so antiparallel vectors yield `+180`.
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = angle_between(from, to);
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::interval::Interval;
    pub use crate::quaternion::Quat;
    pub use crate::vector::Vec3;
    pub use crate::{
        angle_between, clamp, degrees, delta_angle, move_towards, move_towards_angle, radians,
        signed_angle, truncate, wrap_angle,
    };
}
