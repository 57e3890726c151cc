//! Floor/wall classification of contact points
//!
//! Each contact normal is measured against the gravity direction with a
//! signed angle around world up. A floor normal points against gravity and
//! measures about ±180°, a wall about ±90°. Angles inside the floor interval
//! (an outer interval such as `(-inf, -120] ∪ [120, inf)`) are floor points.
//! The primary floor point is the one whose normal is closest to straight
//! up against gravity.

use crate::contact::{ColliderId, ContactPoint};
use gameplay_math::{signed_angle, Interval, Vec3};

/// Signed angle (degrees) between a contact normal and gravity, around world up
pub fn contact_angle(normal: Vec3, gravity: Vec3) -> f32 {
    signed_angle(normal, gravity, Vec3::Y)
}

/// Floor and wall points of one physics tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSets {
    floor: Vec<ContactPoint>,
    walls: Vec<ContactPoint>,
}

impl ContactSets {
    /// Floor points, primary first
    pub fn floor_points(&self) -> &[ContactPoint] {
        &self.floor
    }

    pub fn wall_points(&self) -> &[ContactPoint] {
        &self.walls
    }

    pub fn has_floor(&self) -> bool {
        !self.floor.is_empty()
    }

    pub fn primary_floor(&self) -> Option<&ContactPoint> {
        self.floor.first()
    }

    /// Normal of the primary floor point, zero without floor
    pub fn floor_normal(&self) -> Vec3 {
        self.primary_floor().map_or(Vec3::ZERO, |p| p.normal)
    }

    /// Collider under the primary floor point
    pub fn floor_object(&self) -> Option<ColliderId> {
        self.primary_floor().map(|p| p.other)
    }
}

/// Splits contact points into floor and wall sets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactClassifier {
    floor_interval: Interval,
}

impl Default for ContactClassifier {
    fn default() -> Self {
        Self::new(Interval::outer(-120.0, 120.0))
    }
}

impl ContactClassifier {
    pub fn new(floor_interval: Interval) -> Self {
        Self { floor_interval }
    }

    pub fn floor_interval(&self) -> Interval {
        self.floor_interval
    }

    pub fn set_floor_interval(&mut self, interval: Interval) {
        self.floor_interval = interval;
    }

    pub fn is_floor(&self, normal: Vec3, gravity: Vec3) -> bool {
        self.floor_interval.check_value(contact_angle(normal, gravity))
    }

    /// Classify `points` against `gravity`.
    ///
    /// Floor points are sorted by deviation from straight up (`180 - |angle|`),
    /// ties keep input order. Wall points keep input order.
    pub fn classify<'a>(
        &self,
        points: impl IntoIterator<Item = &'a ContactPoint>,
        gravity: Vec3,
    ) -> ContactSets {
        let mut floor = Vec::new();
        let mut walls = Vec::new();

        for point in points {
            let angle = contact_angle(point.normal, gravity);
            if self.floor_interval.check_value(angle) {
                floor.push((180.0 - angle.abs(), *point));
            } else {
                walls.push(*point);
            }
        }

        floor.sort_by(|a, b| a.0.total_cmp(&b.0));

        ContactSets {
            floor: floor.into_iter().map(|(_, p)| p).collect(),
            walls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    fn point(normal: Vec3, id: u64) -> ContactPoint {
        ContactPoint::new(Vec3::ZERO, normal.normalize(), ColliderId(id))
    }

    #[test]
    fn test_contact_angles() {
        assert_relative_eq!(contact_angle(Vec3::Y, GRAVITY), 180.0, epsilon = 1e-4);
        assert_relative_eq!(contact_angle(Vec3::X, GRAVITY).abs(), 90.0, epsilon = 1e-4);
        assert_relative_eq!(contact_angle(Vec3::NEG_Y, GRAVITY), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_floor_and_walls() {
        let classifier = ContactClassifier::default();
        let points = [
            point(Vec3::X, 1),
            point(Vec3::new(0.0, 1.0, 0.3), 2),
            point(Vec3::Y, 3),
            point(Vec3::NEG_Y, 4),
        ];
        let sets = classifier.classify(&points, GRAVITY);

        assert!(sets.has_floor());
        assert_eq!(sets.floor_points().len(), 2);
        // Flat ground first, the slope second
        assert_eq!(sets.floor_object(), Some(ColliderId(3)));
        assert_eq!(sets.floor_points()[1].other, ColliderId(2));
        assert_eq!(sets.floor_normal(), Vec3::Y);

        let walls: Vec<_> = sets.wall_points().iter().map(|p| p.other).collect();
        assert_eq!(walls, [ColliderId(1), ColliderId(4)]);
    }

    #[test]
    fn test_slope_limit() {
        let classifier = ContactClassifier::new(Interval::outer(-100.0, 100.0));
        // 30° slope passes, 85° (almost a wall) does not
        let gentle = Vec3::new(30f32.to_radians().sin(), 30f32.to_radians().cos(), 0.0);
        let steep = Vec3::new(85f32.to_radians().sin(), 85f32.to_radians().cos(), 0.0);
        assert!(classifier.is_floor(gentle, GRAVITY));
        assert!(!classifier.is_floor(steep, GRAVITY));
    }

    #[test]
    fn test_no_points_no_floor() {
        let sets = ContactClassifier::default().classify(std::iter::empty(), GRAVITY);
        assert!(!sets.has_floor());
        assert_eq!(sets.floor_normal(), Vec3::ZERO);
        assert_eq!(sets.floor_object(), None);
    }
}
