mod config;
mod follower;
mod manual;
mod seek;

pub use config::{PathFollowerConfig, SeekPilotConfig};
pub use follower::{
    nearest_waypoint, nearest_waypoint_around, target_index_by_distance, FollowerState,
    FollowerTelemetry, PathFollower,
};
pub use manual::ManualPilot;
pub use seek::SeekPilot;

use bevy::prelude::{Component, Entity};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::components::{SpatialComponent, Track};

/// Normalized control axes produced by a pilot each tick.
///
/// Positive pitch raises the nose, positive yaw turns the nose right, positive roll lowers the
/// right wing. `throttle` is a change request, not an absolute setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlOutput {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub throttle: f64,
}

impl ControlOutput {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite()
            && self.yaw.is_finite()
            && self.roll.is_finite()
            && self.throttle.is_finite()
    }
}

/// Latest pilot output for a body, consumed by the body integrator.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInputs(pub ControlOutput);

/// Read-only snapshot of the steered body taken at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    /// Position in world space [m]
    pub position: Vector3<f64>,
    /// Unit body axes in world space
    pub forward: Vector3<f64>,
    pub right: Vector3<f64>,
    pub up: Vector3<f64>,
    /// Scalar speed [m/s]
    pub speed: f64,
}

impl KinematicState {
    /// Snapshot from a body-to-world attitude with FRD body axes.
    pub fn from_attitude(position: Vector3<f64>, attitude: &UnitQuaternion<f64>, speed: f64) -> Self {
        Self {
            position,
            forward: attitude * Vector3::x(),
            right: attitude * Vector3::y(),
            up: attitude * -Vector3::z(),
            speed,
        }
    }

    pub fn from_spatial(spatial: &SpatialComponent) -> Self {
        Self::from_attitude(spatial.position, &spatial.attitude, spatial.velocity.norm())
    }

    /// Expresses a world direction in the body frame as (right, up, forward).
    pub fn to_local(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            direction.dot(&self.right),
            direction.dot(&self.up),
            direction.dot(&self.forward),
        )
    }
}

/// A steering strategy sharing one input/output contract with the host body.
pub trait Pilot: Send + Sync {
    /// (Re)attaches the pilot, discarding any per-body state.
    fn initialize(&mut self, track: Option<Arc<Track>>);

    /// Computes the control axes for one tick. A missing body yields neutral output.
    fn tick(&mut self, body: Option<&KinematicState>, dt: f64) -> ControlOutput;

    /// Track handed to the last `initialize`. The host compares it against the linked path's
    /// current track to decide whether to re-initialize.
    fn track(&self) -> Option<&Arc<Track>>;

    fn name(&self) -> &str;
}

/// Pilot driving the entity it is attached to.
#[derive(Component)]
pub struct PilotComponent(pub Box<dyn Pilot>);

impl PilotComponent {
    pub fn new<P: Pilot + 'static>(pilot: P) -> Self {
        Self(Box::new(pilot))
    }
}

/// Links a piloted body to the entity holding its `RacePath`.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowPath {
    pub path: Entity,
}
