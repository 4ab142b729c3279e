use bevy::{log::LogPlugin, prelude::*};
use nalgebra::Vector3;
use std::env;

use race_pilot::{
    components::{ControlInputs, FollowPath, PilotComponent, RacePath, SpatialComponent, Track},
    plugins::{path_follower_bundle, RacePilotPlugin},
    resources::{ConfigFile, ScenarioConfig},
    utils::SimError,
};

/// Ticks between progress reports
const REPORT_INTERVAL: u64 = 600;

fn main() -> Result<(), SimError> {
    let scenario = match env::args().nth(1) {
        Some(path) => ScenarioConfig::load(&path)?,
        None => ScenarioConfig::default(),
    };

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(RacePilotPlugin::new(scenario.simulation.clone()));

    let racer = spawn_scenario(app.world_mut(), &scenario)?;
    let ticks = scenario.simulation.max_ticks.unwrap_or(REPORT_INTERVAL * 10);
    info!(
        "Running race demo for {} ticks ({:.1} s simulated)",
        ticks,
        ticks as f64 * scenario.simulation.time_step
    );

    for tick in 1..=ticks {
        app.world_mut().run_schedule(FixedUpdate);
        if tick % REPORT_INTERVAL == 0 || tick == ticks {
            report(app.world_mut(), racer, tick);
        }
    }

    Ok(())
}

/// Spawns the route and a path-following body on its first waypoint.
fn spawn_scenario(world: &mut World, scenario: &ScenarioConfig) -> Result<Entity, SimError> {
    let path = RacePath::from_config(&scenario.route);
    let track = path.track();
    let Some(start) = track.get(0).copied() else {
        return Err(SimError::InvalidArguments(
            "route needs at least two control points".to_string(),
        ));
    };

    let path_entity = world.spawn(path).id();
    let spatial = SpatialComponent::new(
        start.position,
        start.forward() * scenario.start_speed,
        start.orientation,
        Vector3::zeros(),
    );

    let racer = world
        .spawn(path_follower_bundle(
            path_entity,
            scenario.follower,
            scenario.body,
            spatial,
        ))
        .id();

    info!(
        "Spawned racer at {:?} on a {:.0} m route",
        start.position,
        track.total_length()
    );
    Ok(racer)
}

fn report(world: &mut World, racer: Entity, tick: u64) {
    let Some(spatial) = world.get::<SpatialComponent>(racer).cloned() else {
        warn!("Racer {:?} disappeared", racer);
        return;
    };
    let controls = world.get::<ControlInputs>(racer).map(|inputs| inputs.0);
    let track = world
        .get::<FollowPath>(racer)
        .and_then(|follow| world.get::<RacePath>(follow.path))
        .map(RacePath::track);
    let pilot_name = world
        .get::<PilotComponent>(racer)
        .map(|pilot| pilot.0.name().to_string());

    let off_route = track
        .as_deref()
        .map(|track| distance_to_route(track, &spatial.position));

    info!(
        "tick {} [{}]: position {:.0?}, speed {:.1} m/s, off route {:.1?} m, controls {:.2?}",
        tick,
        pilot_name.unwrap_or_default(),
        spatial.position.as_slice(),
        spatial.speed(),
        off_route,
        controls
    );
}

fn distance_to_route(track: &Track, position: &Vector3<f64>) -> f64 {
    track
        .waypoints()
        .iter()
        .map(|waypoint| (waypoint.position - position).norm())
        .fold(f64::INFINITY, f64::min)
}
