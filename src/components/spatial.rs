use bevy::prelude::Component;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Component for storing spatial state of an entity
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialComponent {
    /// Position in world space (NED) [m]
    pub position: Vector3<f64>,

    /// Linear velocity in world space [m/s]
    pub velocity: Vector3<f64>,

    /// Attitude quaternion (rotation from FRD body to world frame)
    pub attitude: UnitQuaternion<f64>,

    /// Angular velocity in body frame [rad/s]
    pub angular_velocity: Vector3<f64>,
}

impl Default for SpatialComponent {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl SpatialComponent {
    /// Create a new spatial component with initial values
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            angular_velocity,
        }
    }

    /// Create a new spatial component at a specific position
    pub fn at_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Level body at `position` flying along `heading` (radians from north) at `speed`
    pub fn flying(position: Vector3<f64>, heading: f64, speed: f64) -> Self {
        let attitude = UnitQuaternion::from_euler_angles(0.0, 0.0, heading);
        Self {
            position,
            velocity: attitude * Vector3::x() * speed,
            attitude,
            angular_velocity: Vector3::zeros(),
        }
    }

    pub fn forward(&self) -> Vector3<f64> {
        self.attitude * Vector3::x()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}
