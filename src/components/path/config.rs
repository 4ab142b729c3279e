use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::components::path::MIN_SUBDIVISIONS;
use crate::resources::config::{loader::ensure_finite, ConfigError, ConfigFile};

/// Route definition as authored in level configuration.
///
/// ```yaml
/// control_points:
///   - [0.0, 0.0, -100.0]
///   - [500.0, 0.0, -120.0]
///   - [500.0, 400.0, -100.0]
/// subdivisions_per_segment: 10
/// looped: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Ordered control points in world space [m]
    pub control_points: Vec<Vector3<f64>>,
    /// Spline samples per segment (at least 2)
    #[serde(default = "default_subdivisions")]
    pub subdivisions_per_segment: usize,
    /// Close the route back onto the first control point
    #[serde(default)]
    pub looped: bool,
}

fn default_subdivisions() -> usize {
    10
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            control_points: Vec::new(),
            subdivisions_per_segment: default_subdivisions(),
            looped: false,
        }
    }
}

impl ConfigFile for RouteConfig {
    /// Fewer than two control points is allowed here; such a route simply builds no waypoints.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.subdivisions_per_segment < MIN_SUBDIVISIONS {
            return Err(ConfigError::ValidationError(format!(
                "subdivisions_per_segment must be at least {}, got {}",
                MIN_SUBDIVISIONS, self.subdivisions_per_segment
            )));
        }
        for (index, point) in self.control_points.iter().enumerate() {
            for value in point.iter() {
                ensure_finite(&format!("control_points[{}]", index), *value)?;
            }
        }
        Ok(())
    }
}
