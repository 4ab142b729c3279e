use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use race_pilot::{
    components::{
        pilot::nearest_waypoint, ArcadeBodyConfig, ArcadeBodyState, KinematicState,
        PathFollower, PathFollowerConfig, Pilot, RacePath, SpatialComponent, Track,
    },
    systems::update_body,
};
use std::sync::Arc;

use crate::common::{
    assert_controls_valid, hairpin_route, random_body, random_route, straight_route, ALTITUDE,
};

const DT: f64 = 1.0 / 60.0;

#[test]
fn test_window_keeps_follower_on_its_own_leg() {
    let track = RacePath::from_config(&hairpin_route()).track();
    let mut follower = PathFollower::with_track(PathFollowerConfig::default(), Arc::clone(&track));

    // the return leg runs at y = 20, so y = 16 is closer to it than to the outbound leg
    let drifting = Vector3::new(500.0, 16.0, ALTITUDE);
    let outbound_end = 50;
    assert!(nearest_waypoint(&track, &drifting) > 2 * outbound_end);

    let start = KinematicState::from_attitude(
        Vector3::new(200.0, 0.0, ALTITUDE),
        &UnitQuaternion::identity(),
        150.0,
    );
    follower.step(Some(&start), DT);

    let mut previous = follower.telemetry().unwrap().closest_index;
    for step in 0..30 {
        let position = Vector3::new(200.0 + 20.0 * step as f64, 16.0, ALTITUDE);
        let body = KinematicState::from_attitude(position, &UnitQuaternion::identity(), 150.0);
        follower.step(Some(&body), DT);

        let closest = follower.telemetry().unwrap().closest_index;
        assert!(closest <= outbound_end, "jumped to waypoint {} at x = {}", closest, position.x);
        assert!(closest >= previous);
        previous = closest;
    }
}

#[test]
fn test_random_routes_are_well_formed() {
    for seed in 0..20 {
        let route = random_route(seed);
        let track = Track::from_control_points(
            &route.control_points,
            route.subdivisions_per_segment,
            route.looped,
        );

        let segments = if route.looped {
            route.control_points.len()
        } else {
            route.control_points.len() - 1
        };
        assert_eq!(track.len(), segments * route.subdivisions_per_segment + 1);

        for pair in track.waypoints().windows(2) {
            assert!(pair[1].distance >= pair[0].distance, "seed {}", seed);
        }
        if route.looped {
            let first = track.waypoints()[0].position;
            let last = track.waypoints()[track.len() - 1].position;
            assert_relative_eq!(first, last, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_random_bodies_get_bounded_controls() {
    let config = PathFollowerConfig::default();

    for seed in 0..20 {
        let route = random_route(seed);
        let track = Arc::new(Track::from_control_points(
            &route.control_points,
            route.subdivisions_per_segment,
            route.looped,
        ));
        let mut follower = PathFollower::with_track(config, Arc::clone(&track));
        let mut rng = ChaCha8Rng::seed_from_u64(seed + 1000);

        for index in (0..track.len()).step_by(7) {
            let body = random_body(&mut rng, &track.waypoints()[index].position);
            let output = follower.tick(Some(&body), DT);
            assert_controls_valid(&output, config.max_input);
        }
    }
}

#[test]
fn test_old_handle_survives_route_edit() {
    let mut path = RacePath::from_config(&straight_route(1000.0));
    let mut follower = PathFollower::new(PathFollowerConfig::default());
    follower.initialize(Some(path.track()));

    path.push_control_point(Vector3::new(1000.0, 1000.0, ALTITUDE));
    assert!(!Arc::ptr_eq(follower.track().unwrap(), &path.track()));

    let body = KinematicState::from_attitude(
        Vector3::new(300.0, 5.0, ALTITUDE),
        &UnitQuaternion::identity(),
        200.0,
    );
    let output = follower.tick(Some(&body), DT);
    assert!(output.yaw < 0.0);

    follower.initialize(Some(path.track()));
    assert!(Arc::ptr_eq(follower.track().unwrap(), &path.track()));
    assert!(!follower.state().has_last_closest);
}

#[test]
fn test_closed_loop_straight_flight() {
    let track = RacePath::from_config(&straight_route(5000.0)).track();
    let pilot_config = PathFollowerConfig::default();
    let body_config = ArcadeBodyConfig::default();
    let mut follower = PathFollower::with_track(pilot_config, track);

    let mut spatial = SpatialComponent::flying(Vector3::new(0.0, 0.0, ALTITUDE), 0.0, 150.0);
    let mut state = ArcadeBodyState::trimmed(&body_config, 150.0);

    for _ in 0..300 {
        let body = KinematicState::from_spatial(&spatial);
        let output = follower.tick(Some(&body), DT);
        assert_relative_eq!(output.pitch, 0.0, epsilon = 1e-12);
        assert_relative_eq!(output.yaw, 0.0, epsilon = 1e-12);
        assert_relative_eq!(output.roll, 0.0, epsilon = 1e-12);
        update_body(&mut spatial, &mut state, &body_config, &output, DT);
    }

    assert!(spatial.position.x > 150.0 * 300.0 * DT);
    assert_relative_eq!(spatial.position.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(spatial.position.z, ALTITUDE, epsilon = 1e-9);
    assert!(spatial.speed() > 150.0);
}

#[test]
fn test_offset_start_makes_progress() {
    let track = RacePath::from_config(&straight_route(20000.0)).track();
    let pilot_config = PathFollowerConfig::default();
    let body_config = ArcadeBodyConfig::default();
    let mut follower = PathFollower::with_track(pilot_config, track);

    let mut spatial = SpatialComponent::flying(Vector3::new(0.0, 60.0, ALTITUDE), 0.0, 180.0);
    let mut state = ArcadeBodyState::trimmed(&body_config, 180.0);

    for _ in 0..60 * 20 {
        let body = KinematicState::from_spatial(&spatial);
        let output = follower.tick(Some(&body), DT);
        update_body(&mut spatial, &mut state, &body_config, &output, DT);
    }

    assert!(spatial.position.iter().all(|c| c.is_finite()));
    assert!(spatial.attitude.coords.iter().all(|c| c.is_finite()));
    assert!(spatial.position.x > 1000.0, "stalled at {:?}", spatial.position);
}
