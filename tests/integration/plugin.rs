use approx::assert_relative_eq;
use bevy::prelude::*;
use nalgebra::Vector3;
use pretty_assertions::assert_eq;
use race_pilot::components::{
    ArcadeBodyConfig, ArcadeBodyState, ControlInputs, ControlOutput, FollowPath, PilotComponent,
    RacePath, SeekPilot, SeekPilotConfig, SpatialComponent,
};
use std::sync::Arc;

use crate::common::{
    assert_controls_valid, assert_spatial_valid, oval_route, racer_at, simulate_duration,
    straight_route, TestAppBuilder, ALTITUDE,
};

#[test]
fn test_straight_route_needs_only_throttle() {
    let mut app = TestAppBuilder::new()
        .with_route(straight_route(5000.0))
        .with_racer(racer_at(Vector3::new(0.0, 0.0, ALTITUDE), 150.0))
        .build();

    simulate_duration(&mut app, 2.0, 1.0 / 60.0);

    let racer = app.racer(0);
    let spatial = app.get::<SpatialComponent>(racer).unwrap();
    assert_spatial_valid(spatial);
    assert!(spatial.position.x > 300.0);
    assert_relative_eq!(spatial.position.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(spatial.position.z, ALTITUDE, epsilon = 1e-9);

    let controls = app.get::<ControlInputs>(racer).unwrap().0;
    assert_relative_eq!(controls.pitch, 0.0, epsilon = 1e-12);
    assert_relative_eq!(controls.yaw, 0.0, epsilon = 1e-12);
    assert_relative_eq!(controls.roll, 0.0, epsilon = 1e-12);
    assert!(controls.throttle > 0.0);
}

#[test]
fn test_pilot_attaches_to_linked_path() {
    let mut app = TestAppBuilder::new()
        .with_route(straight_route(2000.0))
        .with_racer(racer_at(Vector3::new(0.0, 0.0, ALTITUDE), 150.0))
        .build();
    let (racer, path) = (app.racer(0), app.path());

    assert!(app.get::<PilotComponent>(racer).unwrap().0.track().is_none());
    app.run_steps(1);

    let track = app.get::<RacePath>(path).unwrap().track();
    let pilot = &app.get::<PilotComponent>(racer).unwrap().0;
    assert_eq!(pilot.name(), "path_follower");
    assert!(Arc::ptr_eq(pilot.track().unwrap(), &track));
}

#[test]
fn test_route_edit_reattaches_pilot() {
    let mut app = TestAppBuilder::new()
        .with_route(straight_route(2000.0))
        .with_racer(racer_at(Vector3::new(0.0, 0.0, ALTITUDE), 150.0))
        .build();
    let (racer, path) = (app.racer(0), app.path());
    app.run_steps(10);

    app.get_mut::<RacePath>(path)
        .unwrap()
        .push_control_point(Vector3::new(2000.0, 2000.0, ALTITUDE));
    let edited = app.get::<RacePath>(path).unwrap().track();
    assert!(!Arc::ptr_eq(
        app.get::<PilotComponent>(racer).unwrap().0.track().unwrap(),
        &edited
    ));

    app.run_steps(1);
    assert!(Arc::ptr_eq(
        app.get::<PilotComponent>(racer).unwrap().0.track().unwrap(),
        &edited
    ));
}

#[test]
fn test_missing_path_gives_neutral_controls() {
    let mut app = TestAppBuilder::new()
        .with_route(straight_route(2000.0))
        .with_racer(racer_at(Vector3::new(0.0, 30.0, ALTITUDE), 150.0))
        .build();
    let (racer, path) = (app.racer(0), app.path());
    app.run_steps(5);
    assert!(!app.get::<ControlInputs>(racer).unwrap().0.is_neutral());

    app.world_mut().despawn(path);
    app.run_steps(1);

    assert_eq!(app.get::<ControlInputs>(racer).unwrap().0, ControlOutput::neutral());
    assert!(app.get::<PilotComponent>(racer).unwrap().0.track().is_none());
}

#[test]
fn test_pilot_without_body_holds_neutral() {
    let mut app = TestAppBuilder::new().build();
    let pilot = app
        .world_mut()
        .spawn((
            PilotComponent::new(SeekPilot::with_target(
                SeekPilotConfig::default(),
                Vector3::new(1000.0, 0.0, ALTITUDE),
            )),
            ControlInputs(ControlOutput {
                pitch: 0.3,
                ..Default::default()
            }),
        ))
        .id();

    app.run_steps(1);
    assert!(app.get::<ControlInputs>(pilot).unwrap().0.is_neutral());
}

#[test]
fn test_seek_pilot_closes_on_target() {
    let target = Vector3::new(0.0, 3000.0, ALTITUDE);
    let spatial = SpatialComponent::flying(Vector3::new(0.0, 0.0, ALTITUDE), 0.0, 150.0);
    let start_distance = (target - spatial.position).norm();
    let body = ArcadeBodyConfig::default();

    let mut app = TestAppBuilder::new().build();
    let seeker = app
        .world_mut()
        .spawn((
            PilotComponent::new(SeekPilot::with_target(SeekPilotConfig::default(), target)),
            ControlInputs::default(),
            ArcadeBodyState::trimmed(&body, 150.0),
            body,
            spatial,
        ))
        .id();

    simulate_duration(&mut app, 10.0, 1.0 / 60.0);

    let spatial = app.get::<SpatialComponent>(seeker).unwrap();
    assert_spatial_valid(spatial);
    assert!((target - spatial.position).norm() < start_distance);
}

#[test]
fn test_oval_circuit_stays_well_behaved() {
    let route = oval_route();
    let start = route.control_points[0];
    let mut app = TestAppBuilder::new()
        .with_route(route)
        .with_racer(racer_at(start, 180.0))
        .build();
    let racer = app.racer(0);
    let max_input = racer_at(start, 180.0).pilot.max_input;

    let mut travelled = 0.0;
    let mut previous = start;
    for _ in 0..60 {
        app.run_steps(30);

        let spatial = app.get::<SpatialComponent>(racer).unwrap();
        assert_spatial_valid(spatial);
        travelled += (spatial.position - previous).norm();
        previous = spatial.position;

        assert_controls_valid(&app.get::<ControlInputs>(racer).unwrap().0, max_input);
        let throttle = app.get::<ArcadeBodyState>(racer).unwrap().throttle;
        assert!((0.0..=1.0).contains(&throttle));
    }

    assert!(travelled > 1000.0);
    assert!(app.get::<FollowPath>(racer).is_some());
}

#[test]
fn test_seek_pilot_linked_to_path_keeps_steering() {
    let target = Vector3::new(0.0, 3000.0, ALTITUDE);
    let body = ArcadeBodyConfig::default();
    let mut app = TestAppBuilder::new()
        .with_route(straight_route(2000.0))
        .build();
    let path = app.path();
    let seeker = app
        .world_mut()
        .spawn((
            PilotComponent::new(SeekPilot::with_target(SeekPilotConfig::default(), target)),
            FollowPath { path },
            ControlInputs::default(),
            ArcadeBodyState::trimmed(&body, 150.0),
            body,
            SpatialComponent::flying(Vector3::new(0.0, 0.0, ALTITUDE), 0.0, 150.0),
        ))
        .id();

    app.run_steps(10);

    let track = app.get::<RacePath>(path).unwrap().track();
    let pilot = &app.get::<PilotComponent>(seeker).unwrap().0;
    assert!(Arc::ptr_eq(pilot.track().unwrap(), &track));
    assert!(app.get::<ControlInputs>(seeker).unwrap().0.yaw > 0.0);
}
