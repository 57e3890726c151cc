//! Pedestrian movement scenarios on a hand-integrated body and on a Rapier world

use approx::assert_relative_eq;
use gameplay_components::ComponentRegistry;
use gameplay_math::Vec3;
use gameplay_physics::prelude::*;
use gameplay_physics::SPEED_SLIDER;
use rapier3d::prelude as rapier;

const DT: f32 = 0.02;

fn setup(config: PedestrianConfig) -> (ComponentRegistry, PedestrianMovement) {
    let mut registry = ComponentRegistry::new();
    let movement =
        PedestrianMovement::spawn(&mut registry, "walker", config, PhysicsSettings::default())
            .unwrap();
    (registry, movement)
}

fn ground() -> Collision {
    Collision::new(ColliderId(1)).with_contact(Vec3::ZERO, Vec3::Y)
}

fn wall_ahead() -> Collision {
    Collision::new(ColliderId(2)).with_contact(Vec3::new(0.0, 0.5, 1.0), Vec3::NEG_Z)
}

fn tick(
    registry: &mut ComponentRegistry,
    movement: &mut PedestrianMovement,
    body: &mut KinematicBody,
) -> MovementState {
    let state = movement.fixed_update(registry, body, DT).unwrap();
    body.integrate(DT);
    state
}

#[test]
fn test_no_floor_from_every_state() {
    for start in MovementState::ALL {
        let (mut registry, mut movement) = setup(PedestrianConfig::default());
        registry.go_to_state(movement.component(), start.index()).unwrap();
        let mut body = KinematicBody::new();

        assert_eq!(
            tick(&mut registry, &mut movement, &mut body),
            MovementState::NoFloor,
            "from {}",
            start
        );
        assert_eq!(movement.state(&registry), Some(MovementState::NoFloor));
    }
}

#[test]
fn test_settles_into_stand() {
    let (mut registry, mut movement) = setup(PedestrianConfig::default());
    movement.on_collision_enter(ground());
    let mut body = KinematicBody::new();

    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Walk);
    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Stand);
    for _ in 0..10 {
        assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Stand);
    }
    assert_eq!(body.flat_speed(), 0.0);
}

#[test]
fn test_walk_accelerates_to_desired_speed() {
    let (mut registry, mut movement) = setup(PedestrianConfig::default());
    movement.on_collision_enter(ground());
    movement.set_input_speed(2.0);
    let mut body = KinematicBody::new();

    let mut last = 0.0;
    for _ in 0..30 {
        assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Walk);
        let speed = body.flat_speed();
        assert!(speed >= last, "speed dropped from {} to {}", last, speed);
        last = speed;
    }
    assert_relative_eq!(last, 2.0, epsilon = 1e-3);
    assert!(body.forward().z > 0.99);

    // Contacts stay put, the body sticks to the floor
    assert!(body.linear_velocity().y < 0.0);
}

#[test]
fn test_wall_keeps_standing() {
    let (mut registry, mut movement) = setup(PedestrianConfig::default());
    registry
        .go_to_state(movement.component(), MovementState::Stand.index())
        .unwrap();
    movement.on_collision_enter(ground());
    movement.on_collision_enter(wall_ahead());
    movement.set_input_speed(2.0);
    let mut body = KinematicBody::new();

    for _ in 0..5 {
        assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Stand);
    }

    movement.on_collision_exit(ColliderId(2));
    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Walk);
}

#[test]
fn test_walking_into_wall_stops() {
    let (mut registry, mut movement) = setup(PedestrianConfig::default());
    movement.on_collision_enter(ground());
    movement.set_input_speed(2.0);
    let mut body = KinematicBody::new();

    for _ in 0..5 {
        tick(&mut registry, &mut movement, &mut body);
    }
    assert_eq!(movement.state(&registry), Some(MovementState::Walk));

    movement.on_collision_enter(wall_ahead());
    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Stand);
}

#[test]
fn test_turn_in_place() {
    let config = PedestrianConfig::default().with_rotation_speed(360.0);
    let (mut registry, mut movement) = setup(config);
    registry
        .go_to_state(movement.component(), MovementState::Stand.index())
        .unwrap();
    movement.on_collision_enter(ground());
    movement.set_input_direction(90.0);
    let mut body = KinematicBody::new();

    assert_eq!(
        tick(&mut registry, &mut movement, &mut body),
        MovementState::TurnInPlace
    );

    let mut ticks = 0;
    while movement.state(&registry) == Some(MovementState::TurnInPlace) {
        tick(&mut registry, &mut movement, &mut body);
        ticks += 1;
        assert!(ticks < 100, "never finished turning");
    }

    assert_eq!(movement.state(&registry), Some(MovementState::Stand));
    assert_eq!(movement.current_direction(), 90.0);
    assert_relative_eq!(body.forward().x, 1.0, epsilon = 1e-4);
    assert_eq!(body.flat_speed(), 0.0);
}

#[test]
fn test_airborne_timer_restarts() {
    let config = PedestrianConfig::default().with_max_airborne_time(0.05);
    let (mut registry, mut movement) = setup(config);
    registry
        .go_to_state(movement.component(), MovementState::NoFloor.index())
        .unwrap();
    let mut body = KinematicBody::new();

    tick(&mut registry, &mut movement, &mut body);
    assert_relative_eq!(movement.airborne_time(), 0.02, epsilon = 1e-6);
    assert_relative_eq!(body.linear_velocity().y, -9.81, epsilon = 1e-5);

    tick(&mut registry, &mut movement, &mut body);
    tick(&mut registry, &mut movement, &mut body);
    assert_relative_eq!(movement.airborne_time(), 0.06, epsilon = 1e-6);

    tick(&mut registry, &mut movement, &mut body);
    assert_eq!(movement.airborne_time(), 0.0);
    assert_eq!(movement.state(&registry), Some(MovementState::NoFloor));
}

#[test]
fn test_landing_resumes_walk() {
    let (mut registry, mut movement) = setup(PedestrianConfig::default());
    let mut body = KinematicBody::new();

    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::NoFloor);
    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::NoFloor);

    movement.on_collision_enter(ground());
    assert_eq!(tick(&mut registry, &mut movement, &mut body), MovementState::Walk);
}

#[test]
fn test_speed_slider_follows_walk() {
    let (mut registry, mut movement) = setup(PedestrianConfig::default());
    movement.on_collision_enter(ground());
    movement.set_input_speed(2.0);
    let mut body = KinematicBody::new();

    for _ in 0..30 {
        tick(&mut registry, &mut movement, &mut body);
        registry.update(DT);
    }

    let slider = registry
        .get(movement.component())
        .and_then(|c| c.slider(SPEED_SLIDER))
        .unwrap();
    assert_relative_eq!(slider.target(), 0.4, epsilon = 1e-3);
    assert!(slider.position() > 0.0);
    assert!(slider.position() <= slider.target());
}

#[test]
fn test_rapier_ball_finds_floor() {
    let mut bodies = rapier::RigidBodySet::new();
    let mut colliders = rapier::ColliderSet::new();

    let ground = rapier::ColliderBuilder::cuboid(10.0, 0.5, 10.0)
        .translation(rapier::Vector::new(0.0, -0.5, 0.0))
        .build();
    colliders.insert(ground);

    let ball = bodies.insert(
        rapier::RigidBodyBuilder::dynamic()
            .translation(rapier::Vector::new(0.0, 0.6, 0.0))
            .build(),
    );
    let ball_collider = colliders.insert_with_parent(
        rapier::ColliderBuilder::ball(0.5).build(),
        ball,
        &mut bodies,
    );

    let mut pipeline = rapier::PhysicsPipeline::new();
    let mut islands = rapier::IslandManager::new();
    let mut broad_phase = rapier::DefaultBroadPhase::new();
    let mut narrow_phase = rapier::NarrowPhase::new();
    let mut impulse_joints = rapier::ImpulseJointSet::new();
    let mut multibody_joints = rapier::MultibodyJointSet::new();
    let mut ccd_solver = rapier::CCDSolver::new();
    let gravity = rapier::Vector::new(0.0, -9.81, 0.0);
    let params = rapier::IntegrationParameters::default();

    let mut physics = PhysicsComponent::default();
    let mut sync = RapierContactSync::new(ball_collider);

    for _ in 0..60 {
        pipeline.step(
            &gravity,
            &params,
            &mut islands,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &mut impulse_joints,
            &mut multibody_joints,
            &mut ccd_solver,
            None,
            &(),
            &(),
        );
        sync.sync(&narrow_phase, &colliders, &mut physics).unwrap();
    }
    physics.update_contacts();

    assert_eq!(sync.touching_count(), 1);
    assert!(physics.has_floor());
    assert!(physics.floor_normal().y > 0.99);

    let body = RapierBody::from_set(&mut bodies, ball).unwrap();
    assert!(body.position().y > 0.0);
}
