use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::resources::config::{loader::ensure_finite, ConfigError, ConfigFile};
use crate::utils::DEFAULT_TIMESTEP;

/// Fixed control tick shared by pilots and bodies.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per control tick
    pub time_step: f64,
    /// Number of ticks to run before stopping (headless runs only)
    pub max_ticks: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIMESTEP,
            max_ticks: None,
        }
    }
}

impl ConfigFile for SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("time_step", self.time_step)?;
        if self.time_step <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        Ok(())
    }
}
