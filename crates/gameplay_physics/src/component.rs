//! Per-body contact tracking and floor state
//!
//! `PhysicsComponent` receives collision enter/stay/exit events between
//! ticks, and on every physics tick rebuilds the floor and wall sets from
//! the full set of stored contact points.

use crate::classify::{ContactClassifier, ContactSets};
use crate::config::PhysicsSettings;
use crate::contact::{ColliderId, Collision, ContactPoint, ContactRegistry};
use gameplay_math::Vec3;

/// Contact registry, classified contact sets and effective gravity of one body
#[derive(Debug, Clone)]
pub struct PhysicsComponent {
    settings: PhysicsSettings,
    classifier: ContactClassifier,
    contacts: ContactRegistry,
    sets: ContactSets,
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self::new(PhysicsSettings::default())
    }
}

impl PhysicsComponent {
    pub fn new(settings: PhysicsSettings) -> Self {
        Self {
            classifier: ContactClassifier::new(settings.floor_interval),
            settings,
            contacts: ContactRegistry::new(),
            sets: ContactSets::default(),
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    pub fn classifier(&self) -> &ContactClassifier {
        &self.classifier
    }

    pub fn contacts(&self) -> &ContactRegistry {
        &self.contacts
    }

    // ---------------------------------------------------------------------
    // Collision events
    // ---------------------------------------------------------------------

    pub fn on_collision_enter(&mut self, collision: Collision) {
        self.contacts.register(collision);
    }

    pub fn on_collision_stay(&mut self, collision: Collision) {
        self.contacts.update(collision);
    }

    pub fn on_collision_exit(&mut self, collider: ColliderId) {
        self.contacts.unregister(collider);
    }

    /// Rebuild the floor and wall sets. Call once at the start of each physics tick.
    pub fn update_contacts(&mut self) {
        self.sets = self
            .classifier
            .classify(self.contacts.contact_points(), self.settings.gravity);
    }

    // ---------------------------------------------------------------------
    // Floor state (as of the last `update_contacts`)
    // ---------------------------------------------------------------------

    pub fn contact_sets(&self) -> &ContactSets {
        &self.sets
    }

    pub fn has_floor(&self) -> bool {
        self.sets.has_floor()
    }

    /// Primary floor normal, zero without floor
    pub fn floor_normal(&self) -> Vec3 {
        self.sets.floor_normal()
    }

    pub fn floor_object(&self) -> Option<ColliderId> {
        self.sets.floor_object()
    }

    pub fn floor_points(&self) -> &[ContactPoint] {
        self.sets.floor_points()
    }

    pub fn wall_points(&self) -> &[ContactPoint] {
        self.sets.wall_points()
    }

    pub fn world_gravity(&self) -> Vec3 {
        self.settings.gravity
    }

    /// Gravity under the configured model and current floor
    pub fn gravity(&self) -> Vec3 {
        let floor = self.has_floor().then(|| self.floor_normal());
        self.settings.gravity_model.resolve(self.settings.gravity, floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::GravityModel;
    use approx::assert_relative_eq;

    fn slope() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.5).normalize()
    }

    #[test]
    fn test_sets_follow_events_after_update() {
        let mut physics = PhysicsComponent::default();
        physics.on_collision_enter(Collision::new(ColliderId(1)).with_contact(Vec3::ZERO, Vec3::Y));

        // Not classified until the tick
        assert!(!physics.has_floor());
        physics.update_contacts();
        assert!(physics.has_floor());
        assert_eq!(physics.floor_object(), Some(ColliderId(1)));

        physics.on_collision_exit(ColliderId(1));
        physics.update_contacts();
        assert!(!physics.has_floor());
        assert_eq!(physics.floor_normal(), Vec3::ZERO);
    }

    #[test]
    fn test_walls_are_not_floor() {
        let mut physics = PhysicsComponent::default();
        physics.on_collision_enter(Collision::new(ColliderId(2)).with_contact(Vec3::ZERO, Vec3::NEG_Z));
        physics.update_contacts();

        assert!(!physics.has_floor());
        assert_eq!(physics.wall_points().len(), 1);
    }

    #[test]
    fn test_surface_relative_gravity() {
        let settings = PhysicsSettings::default().with_gravity_model(GravityModel::SurfaceRelative);
        let mut physics = PhysicsComponent::new(settings);
        assert_eq!(physics.gravity(), physics.world_gravity());

        physics.on_collision_enter(Collision::new(ColliderId(1)).with_contact(Vec3::ZERO, slope()));
        physics.update_contacts();

        let g = physics.gravity();
        assert_relative_eq!(g.length(), 9.81, epsilon = 1e-4);
        assert_relative_eq!(g.normalize().dot(slope()), -1.0, epsilon = 1e-5);
    }
}
