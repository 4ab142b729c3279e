use std::sync::Arc;

use crate::components::pilot::{ControlOutput, KinematicState, Pilot};
use crate::components::Track;
use crate::utils::clamp_symmetric;

/// Passes externally supplied axes through to the body, clamped to [-1, 1].
///
/// Stands in for a human player or a scripted input source.
#[derive(Debug, Clone, Default)]
pub struct ManualPilot {
    axes: ControlOutput,
    track: Option<Arc<Track>>,
}

impl ManualPilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_axes(&mut self, axes: ControlOutput) {
        self.axes = ControlOutput {
            pitch: clamp_symmetric(axes.pitch, 1.0),
            yaw: clamp_symmetric(axes.yaw, 1.0),
            roll: clamp_symmetric(axes.roll, 1.0),
            throttle: clamp_symmetric(axes.throttle, 1.0),
        };
    }

    pub fn axes(&self) -> ControlOutput {
        self.axes
    }
}

impl Pilot for ManualPilot {
    fn initialize(&mut self, track: Option<Arc<Track>>) {
        self.axes = ControlOutput::neutral();
        self.track = track;
    }

    fn tick(&mut self, body: Option<&KinematicState>, _dt: f64) -> ControlOutput {
        match body {
            Some(_) => self.axes,
            None => ControlOutput::neutral(),
        }
    }

    fn track(&self) -> Option<&Arc<Track>> {
        self.track.as_ref()
    }

    fn name(&self) -> &str {
        "manual"
    }
}
