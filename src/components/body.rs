use bevy::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::resources::config::{loader::ensure_finite, ConfigError, ConfigFile};
use crate::utils::deg_to_rad;

/// Rate/throttle/drag model for a kinematic body.
///
/// Each control axis maps linearly to a body rotation rate, throttle moves towards the
/// commanded change at a limited rate, and speed follows thrust against linear drag. The
/// velocity always points along the body forward axis.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeBodyConfig {
    /// Pitch rate at full input (deg/s)
    pub pitch_rate: f64,
    /// Yaw rate at full input (deg/s)
    pub yaw_rate: f64,
    /// Roll rate at full input (deg/s)
    pub roll_rate: f64,
    /// Forward acceleration at full throttle [m/s²]
    pub thrust_acceleration: f64,
    /// Linear drag coefficient [1/s]
    pub drag: f64,
    /// Throttle change per second at full throttle input
    pub throttle_rate: f64,
    pub min_throttle: f64,
}

impl Default for ArcadeBodyConfig {
    fn default() -> Self {
        Self {
            pitch_rate: 90.0,
            yaw_rate: 25.0,
            roll_rate: 45.0,
            thrust_acceleration: 60.0,
            drag: 0.25,
            throttle_rate: 0.5,
            min_throttle: 0.0,
        }
    }
}

impl ArcadeBodyConfig {
    /// Body-frame (roll, pitch, yaw) rate at full input [rad/s]
    pub fn rates(&self) -> (f64, f64, f64) {
        (
            deg_to_rad(self.roll_rate),
            deg_to_rad(self.pitch_rate),
            deg_to_rad(self.yaw_rate),
        )
    }

    /// Speed at which drag balances full thrust [m/s]
    pub fn terminal_speed(&self) -> f64 {
        if self.drag > 0.0 {
            self.thrust_acceleration / self.drag
        } else {
            f64::INFINITY
        }
    }
}

impl ConfigFile for ArcadeBodyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("pitch_rate", self.pitch_rate)?;
        ensure_finite("yaw_rate", self.yaw_rate)?;
        ensure_finite("roll_rate", self.roll_rate)?;
        ensure_finite("thrust_acceleration", self.thrust_acceleration)?;
        ensure_finite("drag", self.drag)?;
        ensure_finite("throttle_rate", self.throttle_rate)?;
        ensure_finite("min_throttle", self.min_throttle)?;

        if self.drag < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "drag must not be negative, got {}",
                self.drag
            )));
        }
        if !(0.0..=1.0).contains(&self.min_throttle) {
            return Err(ConfigError::ValidationError(format!(
                "min_throttle must be in [0, 1], got {}",
                self.min_throttle
            )));
        }
        Ok(())
    }
}

/// Mutable engine state of an arcade body
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcadeBodyState {
    /// Current throttle setting in [min_throttle, 1]
    pub throttle: f64,
}

impl ArcadeBodyState {
    pub fn with_throttle(throttle: f64) -> Self {
        Self {
            throttle: throttle.clamp(0.0, 1.0),
        }
    }

    /// Throttle that holds `speed` against drag
    pub fn trimmed(config: &ArcadeBodyConfig, speed: f64) -> Self {
        let throttle = if config.thrust_acceleration > 0.0 {
            config.drag * speed / config.thrust_acceleration
        } else {
            0.0
        };
        Self {
            throttle: throttle.clamp(config.min_throttle, 1.0),
        }
    }
}
