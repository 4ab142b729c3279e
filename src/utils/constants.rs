use nalgebra::Vector3;

/// World frame is NED: x north, y east, z down.
pub const WORLD_UP: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);
pub const WORLD_DOWN: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);
pub const WORLD_NORTH: Vector3<f64> = Vector3::new(1.0, 0.0, 0.0);
pub const WORLD_EAST: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);

/// Squared length below which a direction is treated as degenerate
pub const DIRECTION_EPSILON_SQ: f64 = 1e-9;

/// Squared distance below which a steering target counts as coincident
pub const TARGET_EPSILON_SQ: f64 = 1e-4;

/// Squared segment length below which projection onto a segment is skipped
pub const SEGMENT_EPSILON_SQ: f64 = 1e-4;

/// Speed floor used by the speed governor to avoid dividing by zero (m/s)
pub const MIN_TARGET_SPEED: f64 = 0.1;

pub const DEFAULT_TIMESTEP: f64 = 1.0 / 60.0; // Control tick (s)
