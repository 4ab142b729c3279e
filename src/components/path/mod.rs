mod builder;
mod config;

pub use builder::{build_waypoints, catmull_rom, MIN_SUBDIVISIONS};
pub use config::RouteConfig;

use bevy::log::info;
use bevy::prelude::Component;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A sampled point on a smoothed route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position in world space [m]
    pub position: Vector3<f64>,
    /// Cumulative arc length from the first waypoint [m]
    pub distance: f64,
    /// Heading of the route at this point (body to world, FRD body axes)
    pub orientation: UnitQuaternion<f64>,
}

impl Waypoint {
    pub fn forward(&self) -> Vector3<f64> {
        self.orientation * Vector3::x()
    }

    pub fn right(&self) -> Vector3<f64> {
        self.orientation * Vector3::y()
    }

    pub fn up(&self) -> Vector3<f64> {
        self.orientation * -Vector3::z()
    }
}

/// Immutable waypoint sequence produced by a rebuild, shared with followers as `Arc<Track>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    waypoints: Vec<Waypoint>,
    looped: bool,
}

impl Track {
    pub fn new(waypoints: Vec<Waypoint>, looped: bool) -> Self {
        Self { waypoints, looped }
    }

    /// Builds a track directly from control points.
    pub fn from_control_points(
        control_points: &[Vector3<f64>],
        subdivisions_per_segment: usize,
        looped: bool,
    ) -> Self {
        Self::new(
            build_waypoints(control_points, subdivisions_per_segment, looped),
            looped,
        )
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Arc length of the whole route [m]
    pub fn total_length(&self) -> f64 {
        self.waypoints.last().map_or(0.0, |w| w.distance)
    }

    /// Index after `index`, wrapping on loops and clamping at the end of open paths.
    pub fn next_index(&self, index: usize) -> usize {
        let count = self.waypoints.len();
        if count == 0 {
            return 0;
        }
        if self.looped {
            (index + 1) % count
        } else {
            (index + 1).min(count - 1)
        }
    }
}

/// Route definition attached to an entity.
///
/// Editing operations rebuild immediately and publish a fresh `Arc<Track>`; followers holding
/// the previous handle keep a complete, consistent sequence until they re-attach.
#[derive(Component, Debug, Clone)]
pub struct RacePath {
    control_points: Vec<Vector3<f64>>,
    subdivisions_per_segment: usize,
    looped: bool,
    track: Arc<Track>,
}

impl Default for RacePath {
    fn default() -> Self {
        Self::new(Vec::new(), 10, false)
    }
}

impl RacePath {
    pub fn new(control_points: Vec<Vector3<f64>>, subdivisions_per_segment: usize, looped: bool) -> Self {
        let mut path = Self {
            control_points,
            subdivisions_per_segment,
            looped,
            track: Arc::new(Track::default()),
        };
        path.rebuild();
        path
    }

    pub fn from_config(config: &RouteConfig) -> Self {
        Self::new(
            config.control_points.clone(),
            config.subdivisions_per_segment,
            config.looped,
        )
    }

    /// Regenerates the waypoint sequence and swaps it in as a new handle.
    pub fn rebuild(&mut self) {
        let track = Track::from_control_points(
            &self.control_points,
            self.subdivisions_per_segment,
            self.looped,
        );
        info!(
            "Rebuilt race path: {} control points -> {} waypoints, length {:.1} m, looped: {}",
            self.control_points.len(),
            track.len(),
            track.total_length(),
            self.looped
        );
        self.track = Arc::new(track);
    }

    /// Shared handle to the current waypoint sequence
    pub fn track(&self) -> Arc<Track> {
        Arc::clone(&self.track)
    }

    pub fn control_points(&self) -> &[Vector3<f64>] {
        &self.control_points
    }

    pub fn subdivisions_per_segment(&self) -> usize {
        self.subdivisions_per_segment
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn set_control_points(&mut self, control_points: Vec<Vector3<f64>>) {
        self.control_points = control_points;
        self.rebuild();
    }

    pub fn push_control_point(&mut self, point: Vector3<f64>) {
        self.control_points.push(point);
        self.rebuild();
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
        self.rebuild();
    }

    pub fn set_subdivisions(&mut self, subdivisions_per_segment: usize) {
        self.subdivisions_per_segment = subdivisions_per_segment;
        self.rebuild();
    }
}
