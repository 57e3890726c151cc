//! Rapier 3D adapter
//!
//! Bridges a Rapier world to the engine-agnostic contact and body types:
//! `RapierBody` implements [`RigidBodyAccess`] over a `RigidBody`, and
//! `RapierContactSync` turns the narrow phase's touching pairs into
//! enter/stay/exit events for one collider.

use crate::body::RigidBodyAccess;
use crate::component::PhysicsComponent;
use crate::contact::{ColliderId, Collision, ContactPoint};
use crate::error::{PhysicsError, Result};
use gameplay_math::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude as rapier;
use std::collections::HashSet;

/// Stable id of a Rapier collider handle
pub fn collider_id(handle: rapier::ColliderHandle) -> ColliderId {
    let (index, generation) = handle.into_raw_parts();
    ColliderId((generation as u64) << 32 | index as u64)
}

/// Rapier handle back from a [`collider_id`]
pub fn collider_handle(id: ColliderId) -> rapier::ColliderHandle {
    rapier::ColliderHandle::from_raw_parts(id.0 as u32, (id.0 >> 32) as u32)
}

fn to_vec3(v: &rapier::Vector<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Contacts of `pair` as seen from collider `own`.
///
/// Points are in world space and normals point toward `own`. Returns `None`
/// if `own` is not part of the pair or is missing from `colliders`.
pub fn collision_from_contact_pair(
    pair: &rapier::ContactPair,
    own: rapier::ColliderHandle,
    colliders: &rapier::ColliderSet,
) -> Option<Collision> {
    let own_is_first = if pair.collider1 == own {
        true
    } else if pair.collider2 == own {
        false
    } else {
        return None;
    };
    let other = if own_is_first { pair.collider2 } else { pair.collider1 };
    let position = colliders.get(own)?.position();

    let mut collision = Collision::new(collider_id(other));
    for manifold in &pair.manifolds {
        // Manifold normals point from collider1 to collider2
        let normal = to_vec3(&manifold.data.normal);
        let normal = if own_is_first { -normal } else { normal };

        for contact in &manifold.points {
            let local = if own_is_first { contact.local_p1 } else { contact.local_p2 };
            let world = position * local;
            collision.contacts.push(ContactPoint::new(
                Vec3::new(world.x, world.y, world.z),
                normal,
                collision.collider,
            ));
        }
    }
    Some(collision)
}

/// [`RigidBodyAccess`] over a Rapier rigid body
pub struct RapierBody<'a> {
    body: &'a mut rapier::RigidBody,
}

impl<'a> RapierBody<'a> {
    pub fn new(body: &'a mut rapier::RigidBody) -> Self {
        Self { body }
    }

    /// Borrow a body out of a set
    pub fn from_set(bodies: &'a mut rapier::RigidBodySet, handle: rapier::RigidBodyHandle) -> Result<Self> {
        bodies
            .get_mut(handle)
            .map(Self::new)
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    pub fn position(&self) -> Vec3 {
        to_vec3(self.body.translation())
    }
}

impl RigidBodyAccess for RapierBody<'_> {
    fn linear_velocity(&self) -> Vec3 {
        to_vec3(self.body.linvel())
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.body
            .set_linvel(rapier::Vector::new(velocity.x, velocity.y, velocity.z), true);
    }

    fn rotation(&self) -> Quat {
        let rot = self.body.rotation();
        Quat::new(rot.i, rot.j, rot.k, rot.w)
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.body.set_rotation(
            UnitQuaternion::from_quaternion(Quaternion::new(
                rotation.w, rotation.x, rotation.y, rotation.z,
            )),
            true,
        );
    }
}

/// Feeds one collider's Rapier contacts into a [`PhysicsComponent`]
#[derive(Debug, Clone)]
pub struct RapierContactSync {
    collider: rapier::ColliderHandle,
    touching: HashSet<rapier::ColliderHandle>,
}

impl RapierContactSync {
    pub fn new(collider: rapier::ColliderHandle) -> Self {
        Self {
            collider,
            touching: HashSet::new(),
        }
    }

    pub fn collider(&self) -> rapier::ColliderHandle {
        self.collider
    }

    /// Number of colliders touching after the last sync
    pub fn touching_count(&self) -> usize {
        self.touching.len()
    }

    /// Diff the narrow phase against the previous sync and emit
    /// enter/stay/exit events. Call after each pipeline step.
    pub fn sync(
        &mut self,
        narrow_phase: &rapier::NarrowPhase,
        colliders: &rapier::ColliderSet,
        physics: &mut PhysicsComponent,
    ) -> Result<()> {
        if colliders.get(self.collider).is_none() {
            return Err(PhysicsError::ColliderNotFound(self.collider));
        }

        let mut now = HashSet::new();
        for pair in narrow_phase.contact_pairs_with(self.collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            let Some(collision) = collision_from_contact_pair(pair, self.collider, colliders) else {
                continue;
            };
            let other = collider_handle(collision.collider);
            if self.touching.contains(&other) {
                physics.on_collision_stay(collision);
            } else {
                physics.on_collision_enter(collision);
            }
            now.insert(other);
        }

        for gone in self.touching.difference(&now) {
            physics.on_collision_exit(collider_id(*gone));
        }
        self.touching = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_collider_id_roundtrip() {
        let handle = rapier::ColliderHandle::from_raw_parts(7, 3);
        let id = collider_id(handle);
        assert_eq!(id, ColliderId(3 << 32 | 7));
        assert_eq!(collider_handle(id), handle);
    }

    #[test]
    fn test_rapier_body_access() {
        let mut bodies = rapier::RigidBodySet::new();
        let handle = bodies.insert(rapier::RigidBodyBuilder::dynamic().build());

        let mut body = RapierBody::from_set(&mut bodies, handle).unwrap();
        body.set_linear_velocity(Vec3::new(1.0, 2.0, 3.0));
        body.set_forward(Vec3::X);

        assert_eq!(body.linear_velocity(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(body.forward().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(body.flat_speed(), 10f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_missing_body() {
        let mut bodies = rapier::RigidBodySet::new();
        let handle = bodies.insert(rapier::RigidBodyBuilder::dynamic().build());
        bodies.remove(
            handle,
            &mut rapier::IslandManager::new(),
            &mut rapier::ColliderSet::new(),
            &mut rapier::ImpulseJointSet::new(),
            &mut rapier::MultibodyJointSet::new(),
            true,
        );
        assert!(matches!(
            RapierBody::from_set(&mut bodies, handle),
            Err(PhysicsError::BodyNotFound(_))
        ));
    }
}
