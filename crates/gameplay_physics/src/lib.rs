//! # gameplay_physics - Surface Physics
//!
//! Contact bookkeeping and character movement for gameplay components:
//!
//! - **Contacts**: per-collider contact points fed by enter/stay/exit events
//! - **Classification**: floor and wall sets from the angle between each
//!   contact normal and gravity
//! - **Gravity**: world gravity or gravity pulled toward the floor surface
//! - **Pedestrian movement**: a Stand/Walk/TurnInPlace/NoFloor state machine
//!   running on the internal states of a gameplay component
//! - **Rapier**: body access and contact sync for a Rapier 3D world
//!
//! # Example
//!
//! ```ignore
//! use gameplay_physics::prelude::*;
//!
//! let mut registry = ComponentRegistry::new();
//! let mut walker = PedestrianMovement::spawn(
//!     &mut registry,
//!     "walker",
//!     PedestrianConfig::default(),
//!     PhysicsSettings::default(),
//! )?;
//!
//! walker.set_input_speed(2.0);
//! walker.on_collision_enter(ground_collision);
//! let state = walker.fixed_update(&mut registry, &mut body, 1.0 / 60.0)?;
//! ```

pub mod body;
pub mod classify;
pub mod component;
pub mod config;
pub mod contact;
pub mod error;
pub mod gravity;
pub mod pedestrian;
pub mod rapier;

pub use body::*;
pub use classify::*;
pub use component::*;
pub use config::*;
pub use contact::*;
pub use error::*;
pub use gravity::*;
pub use pedestrian::*;
pub use rapier::{collider_handle, collider_id, RapierBody, RapierContactSync};

pub mod prelude {
    //! Common imports for surface physics
    pub use crate::body::{KinematicBody, RigidBodyAccess};
    pub use crate::classify::{ContactClassifier, ContactSets};
    pub use crate::component::PhysicsComponent;
    pub use crate::config::{PedestrianConfig, PhysicsSettings};
    pub use crate::contact::{ColliderId, Collision, ContactPoint, ContactRegistry};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::gravity::GravityModel;
    pub use crate::pedestrian::{MovementState, PedestrianMovement};
    pub use crate::rapier::{RapierBody, RapierContactSync};
    pub use gameplay_components::ComponentRegistry;
}
