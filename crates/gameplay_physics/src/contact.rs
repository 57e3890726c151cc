//! Contact data and the per-collider collision registry
//!
//! A body keeps one `Collision` per touching collider. Enter and stay
//! events replace the stored snapshot for that collider, exit removes it.
//! Classification later reads every contact point of every stored collision.

use gameplay_core::LOG_TARGET;
use gameplay_math::Vec3;

/// Identity of a collider as reported by the contact source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// A single contact point in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Contact position
    pub point: Vec3,
    /// Contact normal, pointing toward the owning body
    pub normal: Vec3,
    /// Collider on the other side of the contact
    pub other: ColliderId,
}

impl ContactPoint {
    pub fn new(point: Vec3, normal: Vec3, other: ColliderId) -> Self {
        Self { point, normal, other }
    }
}

/// All contact points against one collider
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    /// The touching collider
    pub collider: ColliderId,
    /// Contact points, empty when only bounding volumes overlap
    pub contacts: Vec<ContactPoint>,
}

impl Collision {
    /// Collision without contact points
    pub fn new(collider: ColliderId) -> Self {
        Self {
            collider,
            contacts: Vec::new(),
        }
    }

    /// Add a contact point against this collision's collider
    pub fn with_contact(mut self, point: Vec3, normal: Vec3) -> Self {
        self.contacts.push(ContactPoint::new(point, normal, self.collider));
        self
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Get the average contact normal
    pub fn average_normal(&self) -> Option<Vec3> {
        if self.contacts.is_empty() {
            return None;
        }
        let sum = self
            .contacts
            .iter()
            .fold(Vec3::ZERO, |acc, c| acc + c.normal);
        let normal = sum.normalize_or_zero();
        (normal != Vec3::ZERO).then_some(normal)
    }
}

/// Collisions currently touching a body, keyed by collider
#[derive(Debug, Clone, Default)]
pub struct ContactRegistry {
    collisions: Vec<Collision>,
}

impl ContactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collision started. A repeated enter replaces the stored snapshot.
    pub fn register(&mut self, collision: Collision) {
        match self.position(collision.collider) {
            Some(i) => self.collisions[i] = collision,
            None => self.collisions.push(collision),
        }
    }

    /// Collision continues. Returns `false` if the collider was unknown;
    /// the collision is stored anyway.
    pub fn update(&mut self, collision: Collision) -> bool {
        match self.position(collision.collider) {
            Some(i) => {
                self.collisions[i] = collision;
                true
            }
            None => {
                log::error!(
                    target: LOG_TARGET,
                    "stay event for unregistered collision with {:?}",
                    collision.collider
                );
                self.collisions.push(collision);
                false
            }
        }
    }

    /// Collision ended. Returns `false` if the collider was unknown.
    pub fn unregister(&mut self, collider: ColliderId) -> bool {
        match self.position(collider) {
            Some(i) => {
                self.collisions.remove(i);
                true
            }
            None => {
                log::error!(
                    target: LOG_TARGET,
                    "unregistering unknown collision with {:?}",
                    collider
                );
                false
            }
        }
    }

    pub fn get(&self, collider: ColliderId) -> Option<&Collision> {
        self.collisions.iter().find(|c| c.collider == collider)
    }

    pub fn contains(&self, collider: ColliderId) -> bool {
        self.position(collider).is_some()
    }

    pub fn len(&self) -> usize {
        self.collisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    pub fn clear(&mut self) {
        self.collisions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collision> {
        self.collisions.iter()
    }

    /// Every contact point of every stored collision
    pub fn contact_points(&self) -> impl Iterator<Item = &ContactPoint> {
        self.collisions.iter().flat_map(|c| c.contacts.iter())
    }

    fn position(&self, collider: ColliderId) -> Option<usize> {
        self.collisions.iter().position(|c| c.collider == collider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground(id: u64, y: f32) -> Collision {
        Collision::new(ColliderId(id)).with_contact(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }

    #[test]
    fn test_register_replaces_same_collider() {
        let mut registry = ContactRegistry::new();
        registry.register(ground(1, 0.0));
        registry.register(ground(2, 0.0));
        registry.register(ground(1, 0.5));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(ColliderId(1)).unwrap().contacts[0].point.y, 0.5);
    }

    #[test]
    fn test_stay_updates_in_place() {
        let mut registry = ContactRegistry::new();
        registry.register(ground(1, 0.0));

        let moved = ground(1, 0.0).with_contact(Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        assert!(registry.update(moved));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.contact_points().count(), 2);
    }

    #[test]
    fn test_unknown_stay_and_exit_are_tolerated() {
        let mut registry = ContactRegistry::new();
        assert!(!registry.update(ground(7, 0.0)));
        assert!(registry.contains(ColliderId(7)));

        assert!(!registry.unregister(ColliderId(9)));
        assert!(registry.unregister(ColliderId(7)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_average_normal() {
        let collision = Collision::new(ColliderId(1))
            .with_contact(Vec3::ZERO, Vec3::Y)
            .with_contact(Vec3::ZERO, Vec3::X);
        let n = collision.average_normal().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n.x - n.y).abs() < 1e-6);

        assert_eq!(Collision::new(ColliderId(2)).average_normal(), None);
        assert_eq!(collision.contacts[1].other, ColliderId(1));
    }
}
