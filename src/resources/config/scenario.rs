use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::components::{ArcadeBodyConfig, PathFollowerConfig, RouteConfig};
use crate::resources::config::{loader::ensure_finite, ConfigError, ConfigFile, SimulationConfig};

/// A complete headless run: route, pilot tuning, body model and timing.
///
/// Every section is optional in the file and falls back to its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    pub route: RouteConfig,
    pub follower: PathFollowerConfig,
    pub body: ArcadeBodyConfig,
    /// Speed of the body when it is placed on the first waypoint [m/s]
    pub start_speed: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                max_ticks: Some(60 * 120),
                ..Default::default()
            },
            route: RouteConfig {
                control_points: default_circuit(),
                subdivisions_per_segment: 20,
                looped: true,
            },
            follower: PathFollowerConfig::default(),
            body: ArcadeBodyConfig::default(),
            start_speed: 180.0,
        }
    }
}

/// Rounded rectangle circuit at 300 m altitude with a climb on the back straight
fn default_circuit() -> Vec<Vector3<f64>> {
    vec![
        Vector3::new(0.0, 0.0, -300.0),
        Vector3::new(2000.0, 0.0, -300.0),
        Vector3::new(3000.0, 800.0, -300.0),
        Vector3::new(2000.0, 1600.0, -350.0),
        Vector3::new(0.0, 1600.0, -350.0),
        Vector3::new(-1000.0, 800.0, -300.0),
    ]
}

impl ConfigFile for ScenarioConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.route.validate()?;
        self.follower.validate()?;
        self.body.validate()?;

        ensure_finite("start_speed", self.start_speed)?;
        if self.start_speed < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "start_speed must not be negative, got {}",
                self.start_speed
            )));
        }
        Ok(())
    }
}
