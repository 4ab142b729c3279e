use serde::{Deserialize, Serialize};

use crate::resources::config::{loader::ensure_finite, ConfigError, ConfigFile};
use crate::utils::{inverse_lerp, lerp, MIN_TARGET_SPEED};

/// Tuning for the path-following pilot. Angles are in degrees, distances in metres and
/// speeds in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathFollowerConfig {
    // Look-ahead
    /// Look-ahead used at zero speed and in the tightest turns
    pub min_look_ahead: f64,
    /// Look-ahead used at or above the reference speed on straights
    pub max_look_ahead: f64,
    /// Speed at which the look-ahead reaches its maximum
    pub look_ahead_reference_speed: f64,

    // Waypoint search window around the previous closest index
    pub search_backward_count: usize,
    pub search_forward_count: usize,

    // Pitch / yaw
    pub pitch_gain: f64,
    pub pitch_integral_gain: f64,
    pub yaw_gain: f64,
    pub yaw_integral_gain: f64,
    /// Sign multipliers for hosts with different axis conventions
    pub pitch_sign: f64,
    pub yaw_sign: f64,
    pub roll_sign: f64,

    // Bank (roll)
    /// Degrees of desired bank per degree of yaw error
    pub bank_from_yaw_gain: f64,
    pub max_bank_angle: f64,
    /// Roll input per degree of bank error
    pub bank_control_gain: f64,
    /// Direct roll assist from yaw error (scaled by 0.01 per degree)
    pub roll_from_yaw_factor: f64,

    // Limits
    pub max_input: f64,
    pub dead_zone_angle: f64,

    // Sharp turns
    pub sharp_turn_angle: f64,
    pub sharp_turn_pitch_multiplier: f64,
    /// Heading deviation at which the governor commands the minimum turn speed
    pub max_turn_angle: f64,

    // Lateral offset
    /// Radians of yaw correction per metre of lateral offset
    pub lateral_yaw_gain: f64,
    pub max_lateral_error: f64,
    /// Lateral offset at which the governor commands the minimum turn speed
    pub big_lateral_error: f64,

    // Speed
    pub cruise_speed: f64,
    pub min_turn_speed: f64,
    pub throttle_gain: f64,

    /// Blend weight of the direction to the next waypoint against the look-ahead target.
    /// Zero aims purely at the look-ahead target. Off by default because the tuned gains
    /// above assume pure pursuit. Around 0.6 tightens tracking on short segments at the cost
    /// of earlier, sharper corrections.
    pub near_segment_weight: f64,
}

impl Default for PathFollowerConfig {
    fn default() -> Self {
        Self {
            min_look_ahead: 40.0,
            max_look_ahead: 120.0,
            look_ahead_reference_speed: 220.0,
            search_backward_count: 5,
            search_forward_count: 30,
            pitch_gain: 2.0,
            pitch_integral_gain: 0.1,
            yaw_gain: 0.3,
            yaw_integral_gain: 0.05,
            pitch_sign: 1.0,
            yaw_sign: 1.0,
            roll_sign: 1.0,
            bank_from_yaw_gain: 1.0,
            max_bank_angle: 60.0,
            bank_control_gain: 0.02,
            roll_from_yaw_factor: 0.8,
            max_input: 0.7,
            dead_zone_angle: 1.0,
            sharp_turn_angle: 20.0,
            sharp_turn_pitch_multiplier: 2.0,
            max_turn_angle: 60.0,
            lateral_yaw_gain: 0.02,
            max_lateral_error: 80.0,
            big_lateral_error: 40.0,
            cruise_speed: 220.0,
            min_turn_speed: 140.0,
            throttle_gain: 0.5,
            near_segment_weight: 0.0,
        }
    }
}

impl PathFollowerConfig {
    /// How far a heading deviation (degrees) lies between the sharp-turn and max-turn angles,
    /// in [0, 1].
    pub fn turn_sharpness(&self, heading_deviation: f64) -> f64 {
        if self.max_turn_angle > self.sharp_turn_angle {
            inverse_lerp(self.sharp_turn_angle, self.max_turn_angle, heading_deviation)
        } else if heading_deviation >= self.sharp_turn_angle {
            1.0
        } else {
            0.0
        }
    }

    /// Target speed for a heading deviation (degrees) and lateral offset (metres).
    ///
    /// The more severe of the two pulls the target from cruise speed down towards the minimum
    /// turn speed.
    pub fn governed_speed(&self, heading_deviation: f64, lateral_offset: f64) -> f64 {
        let turn = if self.max_turn_angle > 0.01 {
            inverse_lerp(0.0, self.max_turn_angle, heading_deviation.abs())
        } else {
            0.0
        };
        let drift = if self.big_lateral_error > 0.01 {
            inverse_lerp(0.0, self.big_lateral_error, lateral_offset.abs())
        } else {
            0.0
        };

        lerp(self.cruise_speed, self.min_turn_speed, turn.max(drift)).max(MIN_TARGET_SPEED)
    }
}

impl ConfigFile for PathFollowerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("min_look_ahead", self.min_look_ahead),
            ("max_look_ahead", self.max_look_ahead),
            ("look_ahead_reference_speed", self.look_ahead_reference_speed),
            ("pitch_gain", self.pitch_gain),
            ("pitch_integral_gain", self.pitch_integral_gain),
            ("yaw_gain", self.yaw_gain),
            ("yaw_integral_gain", self.yaw_integral_gain),
            ("pitch_sign", self.pitch_sign),
            ("yaw_sign", self.yaw_sign),
            ("roll_sign", self.roll_sign),
            ("bank_from_yaw_gain", self.bank_from_yaw_gain),
            ("max_bank_angle", self.max_bank_angle),
            ("bank_control_gain", self.bank_control_gain),
            ("roll_from_yaw_factor", self.roll_from_yaw_factor),
            ("max_input", self.max_input),
            ("dead_zone_angle", self.dead_zone_angle),
            ("sharp_turn_angle", self.sharp_turn_angle),
            ("sharp_turn_pitch_multiplier", self.sharp_turn_pitch_multiplier),
            ("max_turn_angle", self.max_turn_angle),
            ("lateral_yaw_gain", self.lateral_yaw_gain),
            ("max_lateral_error", self.max_lateral_error),
            ("big_lateral_error", self.big_lateral_error),
            ("cruise_speed", self.cruise_speed),
            ("min_turn_speed", self.min_turn_speed),
            ("throttle_gain", self.throttle_gain),
            ("near_segment_weight", self.near_segment_weight),
        ];
        for (name, value) in values {
            ensure_finite(name, value)?;
        }

        let invalid = |msg: String| -> Result<(), ConfigError> {
            Err(ConfigError::ValidationError(msg))
        };

        if self.max_input <= 0.0 || self.max_input > 1.0 {
            return invalid(format!("max_input must be in (0, 1], got {}", self.max_input));
        }
        if self.min_look_ahead < 0.0 {
            return invalid(format!(
                "min_look_ahead must not be negative, got {}",
                self.min_look_ahead
            ));
        }
        if self.min_look_ahead > self.max_look_ahead {
            return invalid(format!(
                "min_look_ahead ({}) exceeds max_look_ahead ({})",
                self.min_look_ahead, self.max_look_ahead
            ));
        }
        if self.cruise_speed <= 0.0 {
            return invalid(format!(
                "cruise_speed must be positive, got {}",
                self.cruise_speed
            ));
        }
        if self.min_turn_speed > self.cruise_speed {
            return invalid(format!(
                "min_turn_speed ({}) exceeds cruise_speed ({})",
                self.min_turn_speed, self.cruise_speed
            ));
        }
        if self.dead_zone_angle < 0.0 {
            return invalid(format!(
                "dead_zone_angle must not be negative, got {}",
                self.dead_zone_angle
            ));
        }
        if !(0.0..=1.0).contains(&self.near_segment_weight) {
            return invalid(format!(
                "near_segment_weight must be in [0, 1], got {}",
                self.near_segment_weight
            ));
        }
        Ok(())
    }
}

/// Tuning for the seek pilot, which flies straight at a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekPilotConfig {
    pub pitch_gain: f64,
    pub yaw_gain: f64,
    /// Roll input per unit of yaw input
    pub roll_from_yaw_factor: f64,
    pub desired_speed: f64,
    pub throttle_gain: f64,
}

impl Default for SeekPilotConfig {
    fn default() -> Self {
        Self {
            pitch_gain: 2.0,
            yaw_gain: 2.0,
            roll_from_yaw_factor: 1.0,
            desired_speed: 200.0,
            throttle_gain: 0.5,
        }
    }
}

impl ConfigFile for SeekPilotConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("pitch_gain", self.pitch_gain)?;
        ensure_finite("yaw_gain", self.yaw_gain)?;
        ensure_finite("roll_from_yaw_factor", self.roll_from_yaw_factor)?;
        ensure_finite("desired_speed", self.desired_speed)?;
        ensure_finite("throttle_gain", self.throttle_gain)?;
        Ok(())
    }
}
