//! Pedestrian surface movement
//!
//! A walking character driven by a desired speed and heading. Movement is a
//! state machine over the internal states of the driven component:
//!
//! | From        | Condition                                  | To          |
//! |-------------|--------------------------------------------|-------------|
//! | any         | no floor                                   | NoFloor     |
//! | Default     | floor                                      | Walk        |
//! | NoFloor     | floor regained                             | Walk        |
//! | Walk        | wall ahead                                 | Stand       |
//! | Walk        | not moving and no wish to walk             | Stand       |
//! | Stand       | heading differs from the desired one       | TurnInPlace |
//! | Stand       | wants to walk, no wall ahead               | Walk        |
//! | TurnInPlace | desired heading reached                    | Stand       |
//!
//! Each physics tick either switches state or runs the physics of the
//! current state, never both.

use crate::body::RigidBodyAccess;
use crate::component::PhysicsComponent;
use crate::config::{PedestrianConfig, PhysicsSettings};
use crate::contact::{ColliderId, Collision};
use crate::error::{PhysicsError, Result};
use crate::gravity::GravityModel;
use gameplay_components::{
    AnimatedState, ComponentError, ComponentHandle, ComponentRegistry, GameplayComponent,
    InternalStates, SliderDesc,
};
use gameplay_core::{log_message, MessageKind, LOG_TARGET};
use gameplay_math::{
    clamp, move_towards, move_towards_angle, radians, signed_angle, truncate, Interval, Quat, Vec3,
};
use std::fmt;

/// Slider fed with the normalized walking speed
pub const SPEED_SLIDER: usize = 0;

/// Driver parameter name of the speed slider
pub const SPEED_SLIDER_NAME: &str = "speed";

const SPEED_DIGITS: u8 = 3;

/// Walls whose normal is at least 90° away from the walking direction block it
const BLOCKING_WALL: Interval = Interval::outer(-90.0, 90.0);

/// Movement states, by internal state index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    #[default]
    Default = 0,
    Stand = 1,
    Walk = 2,
    NoFloor = 3,
    TurnInPlace = 4,
}

impl MovementState {
    /// All states in index order
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::Stand,
        Self::Walk,
        Self::NoFloor,
        Self::TurnInPlace,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Stand => "Stand",
            Self::Walk => "Walk",
            Self::NoFloor => "NoFloor",
            Self::TurnInPlace => "TurnInPlace",
        }
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Surface movement controller for one pedestrian
#[derive(Debug)]
pub struct PedestrianMovement {
    component: ComponentHandle,
    config: PedestrianConfig,
    physics: PhysicsComponent,
    desired_speed: f32,
    desired_direction: f32,
    current_direction: f32,
    airborne_time: f32,
}

impl PedestrianMovement {
    /// A component with the movement states and the speed slider
    pub fn build_component(name: impl Into<String>) -> Result<GameplayComponent> {
        let states = InternalStates::from_names(MovementState::ALL.iter().map(|s| s.name()))?;
        let animation =
            AnimatedState::new(Vec::new()).with_slider(&SliderDesc::new(SPEED_SLIDER_NAME, 0.1));
        Ok(GameplayComponent::new(name)
            .with_states(states)
            .with_animation(animation))
    }

    /// Drive an existing component.
    ///
    /// The component needs at least the five movement states. Gravity is
    /// always surface-relative, the floor interval comes from `config`.
    pub fn new(
        registry: &ComponentRegistry,
        component: ComponentHandle,
        config: PedestrianConfig,
        settings: PhysicsSettings,
    ) -> Result<Self> {
        config.validate()?;
        settings.validate()?;

        let target = registry.resolve(component)?;
        let count = target.states().map_or(0, InternalStates::len);
        if count < MovementState::ALL.len() {
            return Err(PhysicsError::InvalidConfig(format!(
                "'{}' has {} internal states, movement needs {}",
                target.name(),
                count,
                MovementState::ALL.len()
            )));
        }
        if target.slider(SPEED_SLIDER).is_none() {
            log_message(
                target.name(),
                MessageKind::Warning,
                "no speed slider, walking speed is not reported",
            );
        }

        let settings = settings
            .with_floor_interval(config.floor_interval)
            .with_gravity_model(GravityModel::SurfaceRelative);

        Ok(Self {
            component,
            config,
            physics: PhysicsComponent::new(settings),
            desired_speed: 0.0,
            desired_direction: 0.0,
            current_direction: 0.0,
            airborne_time: 0.0,
        })
    }

    /// Build, insert and drive a new movement component
    pub fn spawn(
        registry: &mut ComponentRegistry,
        name: impl Into<String>,
        config: PedestrianConfig,
        settings: PhysicsSettings,
    ) -> Result<Self> {
        let handle = registry.insert(Self::build_component(name)?);
        Self::new(registry, handle, config, settings)
    }

    pub fn component(&self) -> ComponentHandle {
        self.component
    }

    pub fn config(&self) -> &PedestrianConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsComponent {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsComponent {
        &mut self.physics
    }

    /// Current movement state of the driven component
    pub fn state(&self, registry: &ComponentRegistry) -> Option<MovementState> {
        registry
            .get(self.component)
            .and_then(|c| MovementState::from_index(c.internal_state_id()))
    }

    // ---------------------------------------------------------------------
    // Inputs and tuning
    // ---------------------------------------------------------------------

    /// Desired speed, clamped by the speed restraint
    pub fn set_input_speed(&mut self, speed: f32) {
        self.desired_speed = self.config.speed_restraint.clamp_value(speed);
    }

    pub fn input_speed(&self) -> f32 {
        self.desired_speed
    }

    /// Desired heading in degrees from +Z, clamped to `[-180, 180]`
    pub fn set_input_direction(&mut self, degrees: f32) {
        self.desired_direction = clamp(degrees, -180.0, 180.0);
    }

    pub fn input_direction(&self) -> f32 {
        self.desired_direction
    }

    /// Heading the body currently follows
    pub fn current_direction(&self) -> f32 {
        self.current_direction
    }

    pub fn airborne_time(&self) -> f32 {
        self.airborne_time
    }

    pub fn speed_restraint(&self) -> Interval {
        self.config.speed_restraint
    }

    pub fn movement_acceleration(&self) -> f32 {
        self.config.movement_acceleration
    }

    pub fn set_movement_acceleration(&mut self, acceleration: f32) {
        self.config.movement_acceleration = acceleration;
    }

    pub fn rotation_speed(&self) -> f32 {
        self.config.rotation_speed
    }

    pub fn set_rotation_speed(&mut self, degrees_per_second: f32) {
        self.config.rotation_speed = degrees_per_second;
    }

    // ---------------------------------------------------------------------
    // Contacts
    // ---------------------------------------------------------------------

    pub fn on_collision_enter(&mut self, collision: Collision) {
        self.physics.on_collision_enter(collision);
    }

    pub fn on_collision_stay(&mut self, collision: Collision) {
        self.physics.on_collision_stay(collision);
    }

    pub fn on_collision_exit(&mut self, collider: ColliderId) {
        self.physics.on_collision_exit(collider);
    }

    // ---------------------------------------------------------------------
    // Predicates
    // ---------------------------------------------------------------------

    pub fn has_floor(&self) -> bool {
        self.physics.has_floor()
    }

    pub fn wants_to_walk(&self) -> bool {
        self.has_floor() && truncate(self.desired_speed, SPEED_DIGITS) > self.config.idle_threshold
    }

    pub fn is_walking(&self, body: &dyn RigidBodyAccess) -> bool {
        self.has_floor() && truncate(body.flat_speed(), SPEED_DIGITS) > self.config.idle_threshold
    }

    pub fn wants_to_turn(&self) -> bool {
        self.has_floor() && self.desired_direction != self.current_direction
    }

    /// No wall faces against `direction`
    pub fn can_walk_in_direction(&self, direction: Vec3) -> bool {
        if !self.has_floor() {
            return false;
        }
        let direction = direction.normalize_or_zero();
        !self
            .physics
            .wall_points()
            .iter()
            .any(|p| BLOCKING_WALL.check_value(signed_angle(direction, p.normal, Vec3::Y)))
    }

    /// Orientation standing on the current floor, facing `heading` degrees
    pub fn target_rotation(&self, heading: f32) -> Quat {
        let up = if self.has_floor() {
            self.physics.floor_normal()
        } else {
            Vec3::Y
        };
        Quat::from_rotation_arc(Vec3::Y, up) * Quat::from_rotation_y(radians(heading))
    }

    /// Direction a walk toward the desired heading would take
    pub fn walk_direction(&self) -> Vec3 {
        self.target_rotation(self.desired_direction) * Vec3::Z
    }

    /// State the machine moves to from `current`, given the latest contacts
    pub fn next_state(&self, current: MovementState, body: &dyn RigidBodyAccess) -> MovementState {
        use MovementState::*;

        if !self.has_floor() {
            return NoFloor;
        }
        match current {
            Default | NoFloor => Walk,
            Walk => {
                if !self.can_walk_in_direction(self.walk_direction()) {
                    Stand
                } else if !self.is_walking(body) && !self.wants_to_walk() {
                    Stand
                } else {
                    Walk
                }
            }
            Stand => {
                if self.wants_to_turn() {
                    TurnInPlace
                } else if self.wants_to_walk() && self.can_walk_in_direction(self.walk_direction()) {
                    Walk
                } else {
                    Stand
                }
            }
            TurnInPlace => {
                if self.wants_to_turn() {
                    TurnInPlace
                } else {
                    Stand
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Physics tick
    // ---------------------------------------------------------------------

    /// Run one physics tick and return the resulting state
    pub fn fixed_update(
        &mut self,
        registry: &mut ComponentRegistry,
        body: &mut dyn RigidBodyAccess,
        dt: f32,
    ) -> Result<MovementState> {
        self.physics.update_contacts();

        let component = registry.resolve(self.component)?;
        let index = component.internal_state_id();
        let current = MovementState::from_index(index).unwrap_or_else(|| {
            log::error!(
                target: LOG_TARGET,
                "[{}] internal state {} is not a movement state, restarting",
                component.name(),
                index
            );
            MovementState::Default
        });

        let next = self.next_state(current, &*body);
        if next != current || next.index() != index {
            self.switch(registry, current, next)?;
            return Ok(next);
        }

        match current {
            MovementState::Walk => self.walk(registry, body, dt)?,
            MovementState::TurnInPlace => self.turn_in_place(body, dt),
            MovementState::NoFloor => self.fall(registry, body, dt),
            MovementState::Default | MovementState::Stand => {}
        }
        Ok(current)
    }

    fn switch(
        &self,
        registry: &mut ComponentRegistry,
        from: MovementState,
        to: MovementState,
    ) -> Result<()> {
        let component = registry
            .get_mut(self.component)
            .ok_or(ComponentError::StaleHandle)?;
        if let Err(e) = component.switch_state(to.index()) {
            log::error!(
                target: LOG_TARGET,
                "[{}] cannot switch movement state {} -> {}: {}",
                component.name(),
                from,
                to,
                e
            );
            return Err(e.into());
        }
        log::debug!(target: LOG_TARGET, "[{}] {} -> {}", component.name(), from, to);
        Ok(())
    }

    fn walk(
        &mut self,
        registry: &mut ComponentRegistry,
        body: &mut dyn RigidBodyAccess,
        dt: f32,
    ) -> Result<()> {
        self.current_direction = self.desired_direction;
        let target = self.target_rotation(self.current_direction);
        body.set_rotation(
            body.rotation()
                .rotate_towards(target, self.config.rotation_speed * dt),
        );

        let flat_speed = truncate(body.flat_speed(), SPEED_DIGITS);
        let speed = move_towards(
            flat_speed,
            self.desired_speed,
            self.config.movement_acceleration * dt,
        );
        let floor_normal = self.physics.floor_normal();
        body.set_linear_velocity(body.forward() * speed - floor_normal * (self.config.floor_bias * speed));

        let fill = self
            .config
            .speed_restraint
            .percentage(truncate(body.flat_speed(), SPEED_DIGITS));
        if let Some(component) = registry.get_mut(self.component) {
            if component.slider(SPEED_SLIDER).is_some() {
                component.set_slider_target(SPEED_SLIDER, fill)?;
            }
        }
        Ok(())
    }

    fn turn_in_place(&mut self, body: &mut dyn RigidBodyAccess, dt: f32) {
        self.current_direction = move_towards_angle(
            self.current_direction,
            self.desired_direction,
            self.config.rotation_speed * dt,
        );
        body.set_rotation(self.target_rotation(self.current_direction));
    }

    fn fall(&mut self, registry: &ComponentRegistry, body: &mut dyn RigidBodyAccess, dt: f32) {
        if self.airborne_time < self.config.max_airborne_time {
            self.airborne_time += dt;
            body.set_linear_velocity(self.physics.gravity());
        } else {
            self.airborne_time = 0.0;
            if let Some(component) = registry.get(self.component) {
                log_message(
                    component.name(),
                    MessageKind::Notification,
                    format_args!(
                        "airborne for over {}s, timer restarted",
                        self.config.max_airborne_time
                    ),
                );
            }
        }
    }
}
