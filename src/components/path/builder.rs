use nalgebra::{UnitQuaternion, Vector3};

use crate::components::path::Waypoint;
use crate::utils::{look_rotation, wrap_index, DIRECTION_EPSILON_SQ, WORLD_NORTH};

/// Smallest number of samples taken per spline segment
pub const MIN_SUBDIVISIONS: usize = 2;

/// Samples a Catmull-Rom spline through `control_points` into arc-length indexed waypoints.
///
/// Open paths clamp neighbour indices at the ends; looped paths wrap them and close the
/// curve back onto the first control point, so the final waypoint coincides with the first
/// and carries the total path length.
///
/// Returns an empty sequence when fewer than two control points are given. The output is a
/// pure function of the inputs.
pub fn build_waypoints(
    control_points: &[Vector3<f64>],
    subdivisions_per_segment: usize,
    looped: bool,
) -> Vec<Waypoint> {
    let count = control_points.len();
    if count < 2 {
        return Vec::new();
    }

    let subdivisions = subdivisions_per_segment.max(MIN_SUBDIVISIONS);
    let segment_count = if looped { count } else { count - 1 };

    let mut positions = Vec::with_capacity(segment_count * subdivisions + 1);
    for segment in 0..segment_count {
        let i = segment as isize;
        let p0 = control_point(control_points, i - 1, looped);
        let p1 = control_point(control_points, i, looped);
        let p2 = control_point(control_points, i + 1, looped);
        let p3 = control_point(control_points, i + 2, looped);

        // t = 0 repeats the previous segment's t = 1 sample
        let first_step = if segment > 0 { 1 } else { 0 };
        for step in first_step..=subdivisions {
            let t = step as f64 / subdivisions as f64;
            positions.push(catmull_rom(&p0, &p1, &p2, &p3, t));
        }
    }

    let mut distance = 0.0;
    let mut waypoints = Vec::with_capacity(positions.len());
    for (index, position) in positions.iter().enumerate() {
        if index > 0 {
            distance += (position - positions[index - 1]).norm();
        }
        waypoints.push(Waypoint {
            position: *position,
            distance,
            orientation: heading_at(&positions, index, looped),
        });
    }

    waypoints
}

/// Standard uniform Catmull-Rom blend between `p1` (t = 0) and `p2` (t = 1)
pub fn catmull_rom(
    p0: &Vector3<f64>,
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    p3: &Vector3<f64>,
    t: f64,
) -> Vector3<f64> {
    let (p0, p1, p2, p3) = (*p0, *p1, *p2, *p3);
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

fn control_point(points: &[Vector3<f64>], index: isize, looped: bool) -> Vector3<f64> {
    let count = points.len();
    let index = if looped {
        wrap_index(index, count)
    } else {
        index.clamp(0, count as isize - 1) as usize
    };
    points[index]
}

/// Heading from the previous to the next sample, falling back to world north when the
/// neighbours coincide.
fn heading_at(positions: &[Vector3<f64>], index: usize, looped: bool) -> UnitQuaternion<f64> {
    let count = positions.len();
    let (prev, next) = if looped {
        (
            wrap_index(index as isize - 1, count),
            wrap_index(index as isize + 1, count),
        )
    } else {
        (index.saturating_sub(1), (index + 1).min(count - 1))
    };

    let direction = positions[next] - positions[prev];
    if direction.norm_squared() < DIRECTION_EPSILON_SQ {
        look_rotation(&WORLD_NORTH)
    } else {
        look_rotation(&direction)
    }
}
