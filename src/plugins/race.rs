use bevy::prelude::*;

use crate::components::{
    ArcadeBodyConfig, ArcadeBodyState, ControlInputs, FollowPath, PathFollower,
    PathFollowerConfig, PilotComponent, SpatialComponent,
};
use crate::resources::SimulationConfig;
use crate::systems::{arcade_body_system, pilot_system};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum RacePilotSet {
    /// Pilots read body state and write control inputs
    Pilot,
    /// Bodies integrate the control inputs
    Body,
}

/// Runs pilots and arcade bodies on the fixed timestep, pilots first.
pub struct RacePilotPlugin {
    config: SimulationConfig,
}

impl RacePilotPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        RacePilotPlugin { config }
    }
}

impl Default for RacePilotPlugin {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Plugin for RacePilotPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .configure_sets(
                FixedUpdate,
                (RacePilotSet::Pilot, RacePilotSet::Body).chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    pilot_system.in_set(RacePilotSet::Pilot),
                    arcade_body_system.in_set(RacePilotSet::Body),
                ),
            );

        app.init_resource::<Time<Fixed>>()
            .insert_resource(Time::<Fixed>::from_seconds(self.config.time_step));
    }
}

/// Components for an arcade body flown along the path held by `path`.
///
/// The pilot attaches to the path's track on its first tick. The body starts with the throttle
/// that holds its initial speed.
pub fn path_follower_bundle(
    path: Entity,
    pilot_config: PathFollowerConfig,
    body_config: ArcadeBodyConfig,
    spatial: SpatialComponent,
) -> impl Bundle {
    let state = ArcadeBodyState::trimmed(&body_config, spatial.speed());
    (
        PilotComponent::new(PathFollower::new(pilot_config)),
        FollowPath { path },
        ControlInputs::default(),
        spatial,
        body_config,
        state,
    )
}
