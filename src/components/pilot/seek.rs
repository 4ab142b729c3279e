use bevy::log::debug;
use nalgebra::Vector3;
use std::sync::Arc;

use crate::components::pilot::{ControlOutput, KinematicState, Pilot, SeekPilotConfig};
use crate::components::Track;
use crate::utils::{clamp_symmetric, MIN_TARGET_SPEED, TARGET_EPSILON_SQ};

/// Flies directly at a fixed point with proportional pitch and yaw.
#[derive(Debug, Clone)]
pub struct SeekPilot {
    config: SeekPilotConfig,
    target: Option<Vector3<f64>>,
    track: Option<Arc<Track>>,
}

impl SeekPilot {
    pub fn new(config: SeekPilotConfig) -> Self {
        Self {
            config,
            target: None,
            track: None,
        }
    }

    pub fn with_target(config: SeekPilotConfig, target: Vector3<f64>) -> Self {
        Self {
            config,
            target: Some(target),
            track: None,
        }
    }

    pub fn config(&self) -> &SeekPilotConfig {
        &self.config
    }

    pub fn target(&self) -> Option<Vector3<f64>> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<Vector3<f64>>) {
        self.target = target;
    }
}

impl Pilot for SeekPilot {
    /// The track is only held so the host can tell it was delivered; the target stays as set.
    fn initialize(&mut self, track: Option<Arc<Track>>) {
        self.track = track;
    }

    fn tick(&mut self, body: Option<&KinematicState>, _dt: f64) -> ControlOutput {
        let (Some(body), Some(target)) = (body, self.target) else {
            return ControlOutput::neutral();
        };

        let to_target = target - body.position;
        if to_target.norm_squared() < TARGET_EPSILON_SQ {
            debug!("Seek target reached, holding neutral");
            return ControlOutput::neutral();
        }

        let local = body.to_local(&to_target.normalize());
        let yaw = clamp_symmetric(local.x * self.config.yaw_gain, 1.0);
        let pitch = clamp_symmetric(local.y * self.config.pitch_gain, 1.0);
        let roll = clamp_symmetric(yaw * self.config.roll_from_yaw_factor, 1.0);

        let desired_speed = self.config.desired_speed;
        let throttle = if desired_speed <= MIN_TARGET_SPEED {
            0.0
        } else {
            clamp_symmetric(
                (desired_speed - body.speed) / desired_speed * self.config.throttle_gain,
                1.0,
            )
        };

        ControlOutput {
            pitch,
            yaw,
            roll,
            throttle,
        }
    }

    fn track(&self) -> Option<&Arc<Track>> {
        self.track.as_ref()
    }

    fn name(&self) -> &str {
        "seek"
    }
}
