use bevy::log::{debug, info};
use nalgebra::Vector3;
use std::sync::Arc;

use crate::components::pilot::{ControlOutput, KinematicState, PathFollowerConfig, Pilot};
use crate::components::Track;
use crate::utils::{
    bank_angle, clamp_symmetric, deg_to_rad, delta_angle_deg, lerp, rad_to_deg, wrap_index,
    DIRECTION_EPSILON_SQ, SEGMENT_EPSILON_SQ, TARGET_EPSILON_SQ,
};

/// Per-body tracking state, reset whenever the follower is (re)attached.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FollowerState {
    pub last_closest_index: usize,
    /// False until the first global nearest-waypoint scan has run
    pub has_last_closest: bool,
    /// Running sum of yaw error * dt [rad s]
    pub yaw_integral: f64,
    /// Running sum of pitch error * dt [rad s]
    pub pitch_integral: f64,
}

/// Intermediate values from the most recent tick, for logging and inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FollowerTelemetry {
    pub closest_index: usize,
    pub target_index: usize,
    /// Arc length of the body's projection onto the route [m]
    pub distance_along: f64,
    /// Signed offset from the route, positive to the right [m]
    pub lateral_offset: f64,
    pub look_ahead: f64,
    /// Angle between the body heading and the target (degrees)
    pub heading_deviation: f64,
    pub target_speed: f64,
}

/// Pure-pursuit pilot that flies a body along a `Track`.
///
/// Turns are flown by banking towards the look-ahead target and pulling pitch, with a small
/// direct yaw trim. The body's drift off the centreline feeds back into the yaw error, and
/// the speed governor slows down for sharp turns or large drift.
#[derive(Debug, Clone)]
pub struct PathFollower {
    config: PathFollowerConfig,
    track: Option<Arc<Track>>,
    state: FollowerState,
    output: ControlOutput,
    telemetry: Option<FollowerTelemetry>,
}

impl PathFollower {
    pub fn new(config: PathFollowerConfig) -> Self {
        Self {
            config,
            track: None,
            state: FollowerState::default(),
            output: ControlOutput::neutral(),
            telemetry: None,
        }
    }

    pub fn with_track(config: PathFollowerConfig, track: Arc<Track>) -> Self {
        let mut follower = Self::new(config);
        follower.attach(track);
        follower
    }

    /// Attaches to a track and starts over with a global waypoint search.
    pub fn attach(&mut self, track: Arc<Track>) {
        info!(
            "Path follower attached to track with {} waypoints ({:.1} m)",
            track.len(),
            track.total_length()
        );
        self.track = Some(track);
        self.reset();
    }

    pub fn detach(&mut self) {
        self.track = None;
        self.reset();
    }

    /// Clears tracking state and both integrators.
    pub fn reset(&mut self) {
        self.state = FollowerState::default();
        self.output = ControlOutput::neutral();
        self.telemetry = None;
    }

    pub fn config(&self) -> &PathFollowerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PathFollowerConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &FollowerState {
        &self.state
    }

    pub fn last_output(&self) -> ControlOutput {
        self.output
    }

    pub fn telemetry(&self) -> Option<&FollowerTelemetry> {
        self.telemetry.as_ref()
    }

    /// Runs one control tick. Any missing input produces neutral output.
    pub fn step(&mut self, body: Option<&KinematicState>, dt: f64) -> ControlOutput {
        let track = self.track.clone();
        let output = match (track, body) {
            (Some(track), Some(body)) if track.len() >= 2 => self.compute(&track, body, dt),
            _ => {
                self.telemetry = None;
                ControlOutput::neutral()
            }
        };
        self.output = output;
        output
    }

    fn compute(&mut self, track: &Track, body: &KinematicState, dt: f64) -> ControlOutput {
        let config = self.config;
        let waypoints = track.waypoints();

        // Current segment
        let closest = self.locate(track, &body.position);
        let next = track.next_index(closest);
        let a = waypoints[closest].position;
        let b = waypoints[next].position;

        let ab = b - a;
        let segment_length_sq = ab.norm_squared();
        let t = if segment_length_sq > SEGMENT_EPSILON_SQ {
            ((body.position - a).dot(&ab) / segment_length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let on_line = a + ab * t;
        let lateral_offset = (body.position - on_line).dot(&body.right);
        let distance_along = waypoints[closest].distance + t * segment_length_sq.sqrt();

        // Look-ahead target
        let look_ahead = self.look_ahead_distance(track, body.speed, closest, distance_along);
        let target_index = target_index_by_distance(track, closest, distance_along + look_ahead);
        let to_target = waypoints[target_index].position - body.position;
        if to_target.norm_squared() < TARGET_EPSILON_SQ {
            debug!("Look-ahead target coincides with body, holding neutral");
            self.telemetry = None;
            return ControlOutput::neutral();
        }
        let aim = self.aim_direction(&to_target.normalize(), &(b - body.position));

        // Heading error in the body frame
        let local = body.to_local(&aim);
        let yaw_to_target = local.x.atan2(local.z);
        let pitch_to_target = local.y.atan2(local.z);

        let lateral = lateral_offset.clamp(-config.max_lateral_error, config.max_lateral_error);
        let dead_zone = deg_to_rad(config.dead_zone_angle);
        let yaw_error = apply_dead_zone(yaw_to_target - lateral * config.lateral_yaw_gain, dead_zone);
        let pitch_error = apply_dead_zone(pitch_to_target, dead_zone);

        // Roll: bank into the turn
        let yaw_error_deg = rad_to_deg(yaw_error);
        let desired_bank = (yaw_error_deg * config.bank_from_yaw_gain)
            .clamp(-config.max_bank_angle, config.max_bank_angle);
        let current_bank = rad_to_deg(bank_angle(&body.right, &body.up));
        let bank_error = apply_dead_zone(
            delta_angle_deg(current_bank, desired_bank),
            config.dead_zone_angle,
        );
        let roll = clamp_symmetric(
            config.roll_sign
                * (bank_error * config.bank_control_gain
                    + yaw_error_deg * config.roll_from_yaw_factor * 0.01),
            config.max_input,
        );

        // Pitch: PI, stronger in sharp turns to hold the banked radius
        self.state.pitch_integral += pitch_error * dt;
        let heading_deviation = rad_to_deg(yaw_to_target).abs();
        let pitch_multiplier = lerp(
            1.0,
            config.sharp_turn_pitch_multiplier,
            config.turn_sharpness(heading_deviation),
        );
        let pitch = clamp_symmetric(
            config.pitch_sign
                * (config.pitch_gain * pitch_error
                    + config.pitch_integral_gain * self.state.pitch_integral)
                * pitch_multiplier,
            config.max_input,
        );

        // Yaw: PI trim
        self.state.yaw_integral += yaw_error * dt;
        let yaw = clamp_symmetric(
            config.yaw_sign
                * (config.yaw_gain * yaw_error + config.yaw_integral_gain * self.state.yaw_integral),
            config.max_input,
        );

        // Speed governor
        let target_speed = config.governed_speed(heading_deviation, lateral_offset);
        let throttle = clamp_symmetric(
            (target_speed - body.speed) / target_speed * config.throttle_gain,
            1.0,
        );

        let telemetry = FollowerTelemetry {
            closest_index: closest,
            target_index,
            distance_along,
            lateral_offset,
            look_ahead,
            heading_deviation,
            target_speed,
        };
        debug!("Path follower tick: {:?}", telemetry);
        self.telemetry = Some(telemetry);

        ControlOutput {
            pitch,
            yaw,
            roll,
            throttle,
        }
    }

    /// Nearest waypoint: global on the first tick, then only within the search window around
    /// the previous result so overlapping parts of the route cannot capture the body.
    fn locate(&mut self, track: &Track, position: &Vector3<f64>) -> usize {
        let closest = if self.state.has_last_closest {
            nearest_waypoint_around(
                track,
                position,
                self.state.last_closest_index,
                self.config.search_backward_count,
                self.config.search_forward_count,
            )
        } else {
            nearest_waypoint(track, position)
        };

        self.state.last_closest_index = closest;
        self.state.has_last_closest = true;
        closest
    }

    /// Speed-scaled look-ahead, shortened towards the minimum when the route ahead turns hard.
    fn look_ahead_distance(
        &self,
        track: &Track,
        speed: f64,
        closest: usize,
        distance_along: f64,
    ) -> f64 {
        let config = &self.config;
        let speed_fraction = if config.look_ahead_reference_speed > 0.0 {
            speed / config.look_ahead_reference_speed
        } else {
            1.0
        };
        let base = lerp(config.min_look_ahead, config.max_look_ahead, speed_fraction);

        let waypoints = track.waypoints();
        let provisional = target_index_by_distance(track, closest, distance_along + base);
        let upcoming_turn = rad_to_deg(
            waypoints[closest]
                .forward()
                .angle(&waypoints[provisional].forward()),
        );

        lerp(base, config.min_look_ahead, config.turn_sharpness(upcoming_turn))
    }

    /// Direction to steer along, optionally blended with the direction to the segment end.
    fn aim_direction(&self, to_target: &Vector3<f64>, to_next: &Vector3<f64>) -> Vector3<f64> {
        let weight = self.config.near_segment_weight;
        if weight <= 0.0 || to_next.norm_squared() < TARGET_EPSILON_SQ {
            return *to_target;
        }

        let blended = to_next.normalize() * weight + to_target * (1.0 - weight);
        if blended.norm_squared() < DIRECTION_EPSILON_SQ {
            *to_target
        } else {
            blended.normalize()
        }
    }
}

impl Pilot for PathFollower {
    fn initialize(&mut self, track: Option<Arc<Track>>) {
        match track {
            Some(track) => self.attach(track),
            None => self.detach(),
        }
    }

    fn tick(&mut self, body: Option<&KinematicState>, dt: f64) -> ControlOutput {
        self.step(body, dt)
    }

    fn track(&self) -> Option<&Arc<Track>> {
        self.track.as_ref()
    }

    fn name(&self) -> &str {
        "path_follower"
    }
}

fn apply_dead_zone(value: f64, dead_zone: f64) -> f64 {
    if value.abs() < dead_zone {
        0.0
    } else {
        value
    }
}

/// Index of the waypoint closest to `position` over the whole track.
pub fn nearest_waypoint(track: &Track, position: &Vector3<f64>) -> usize {
    let mut best_index = 0;
    let mut best_distance_sq = f64::MAX;

    for (index, waypoint) in track.waypoints().iter().enumerate() {
        let distance_sq = (position - waypoint.position).norm_squared();
        if distance_sq < best_distance_sq {
            best_distance_sq = distance_sq;
            best_index = index;
        }
    }

    best_index
}

/// Index of the waypoint closest to `position` within `[center - backward, center + forward]`.
///
/// The window wraps on looped tracks and is clamped on open ones. At least one waypoint ahead
/// is always searched.
pub fn nearest_waypoint_around(
    track: &Track,
    position: &Vector3<f64>,
    center: usize,
    backward: usize,
    forward: usize,
) -> usize {
    let waypoints = track.waypoints();
    let count = waypoints.len();
    if count == 0 {
        return 0;
    }

    let center = center.min(count - 1);
    let forward = forward.max(1);

    let candidates: Box<dyn Iterator<Item = usize>> = if track.is_looped() {
        let start = center as isize - backward as isize;
        let end = center as isize + forward as isize;
        Box::new((start..=end).map(move |index| wrap_index(index, count)))
    } else {
        let start = center.saturating_sub(backward);
        let end = (center + forward).min(count - 1);
        Box::new(start..=end)
    };

    let mut best_index = center;
    let mut best_distance_sq = f64::MAX;
    for index in candidates {
        let distance_sq = (position - waypoints[index].position).norm_squared();
        if distance_sq < best_distance_sq {
            best_distance_sq = distance_sq;
            best_index = index;
        }
    }

    best_index
}

/// First waypoint at or beyond `target_distance`, scanning forward from `closest`.
///
/// Looped tracks wrap the distance by the total length and continue from the start; open
/// tracks clamp to the last waypoint.
pub fn target_index_by_distance(track: &Track, closest: usize, target_distance: f64) -> usize {
    let waypoints = track.waypoints();
    let count = waypoints.len();
    if count == 0 {
        return 0;
    }

    let closest = closest.min(count - 1);
    let total_length = track.total_length();

    if track.is_looped() {
        if total_length <= 0.01 {
            return closest;
        }
        if target_distance <= total_length {
            return (closest..count)
                .find(|&index| waypoints[index].distance >= target_distance)
                .unwrap_or(count - 1);
        }

        let wrapped = target_distance.rem_euclid(total_length);
        (0..count)
            .find(|&index| waypoints[index].distance >= wrapped)
            .unwrap_or(closest)
    } else {
        let target_distance = target_distance.min(total_length);
        (closest..count)
            .find(|&index| waypoints[index].distance >= target_distance)
            .unwrap_or(count - 1)
    }
}
