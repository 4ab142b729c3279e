use bevy::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::components::{
    ControlInputs, FollowPath, KinematicState, Pilot, PilotComponent, RacePath, SpatialComponent,
    Track,
};
use crate::resources::SimulationConfig;

/// Entities already reported as missing a path or a body, so each gap is warned about once.
#[derive(Debug, Default)]
pub struct MissingLinks {
    paths: HashSet<Entity>,
    bodies: HashSet<Entity>,
}

impl MissingLinks {
    /// Records whether `entity` is missing its path; true only on the tick it goes missing.
    fn path_missing(&mut self, entity: Entity, missing: bool) -> bool {
        track_transition(&mut self.paths, entity, missing)
    }

    /// Records whether `entity` is missing its body; true only on the tick it goes missing.
    fn body_missing(&mut self, entity: Entity, missing: bool) -> bool {
        track_transition(&mut self.bodies, entity, missing)
    }
}

fn track_transition(set: &mut HashSet<Entity>, entity: Entity, missing: bool) -> bool {
    if missing {
        set.insert(entity)
    } else {
        set.remove(&entity);
        false
    }
}

/// Ticks every pilot once per fixed step and stores its output in `ControlInputs`.
///
/// Pilots linked to a `RacePath` are re-initialized whenever the path publishes a new track,
/// which covers both first attachment and route edits.
pub fn pilot_system(
    mut pilots: Query<(
        Entity,
        &mut PilotComponent,
        &mut ControlInputs,
        Option<&SpatialComponent>,
        Option<&FollowPath>,
    )>,
    paths: Query<&RacePath>,
    sim: Res<SimulationConfig>,
    mut missing: Local<MissingLinks>,
) {
    let dt = sim.time_step;

    for (entity, mut pilot, mut inputs, spatial, follow) in pilots.iter_mut() {
        if let Some(follow) = follow {
            let track = paths.get(follow.path).ok().map(RacePath::track);
            if missing.path_missing(entity, track.is_none()) {
                warn!("{:?} follows missing path entity {:?}", entity, follow.path);
            } else if track.is_none() {
                debug!("{:?} still follows missing path entity {:?}", entity, follow.path);
            }
            sync_track(pilot.0.as_mut(), track);
        }

        let body = spatial.map(KinematicState::from_spatial);
        if missing.body_missing(entity, body.is_none()) {
            warn!("{:?} has no spatial state, holding neutral controls", entity);
        } else if body.is_none() {
            debug!("{:?} still has no spatial state", entity);
        }

        inputs.0 = pilot.0.tick(body.as_ref(), dt);
    }
}

/// Re-initializes `pilot` if `track` is not the handle it currently holds.
///
/// Returns true when the pilot was re-initialized.
pub fn sync_track(pilot: &mut dyn Pilot, track: Option<Arc<Track>>) -> bool {
    let current = pilot.track();
    let stale = match (current, track.as_ref()) {
        (Some(current), Some(track)) => !Arc::ptr_eq(current, track),
        (None, None) => false,
        _ => true,
    };

    if stale {
        info!("Re-initializing {} pilot", pilot.name());
        pilot.initialize(track);
    }
    stale
}
