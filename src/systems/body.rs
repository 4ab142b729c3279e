use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{
    ArcadeBodyConfig, ArcadeBodyState, ControlInputs, ControlOutput, SpatialComponent,
};
use crate::resources::SimulationConfig;

/// Integrates the latest control inputs of every arcade body over one fixed tick.
pub fn arcade_body_system(
    mut query: Query<(
        &mut SpatialComponent,
        &mut ArcadeBodyState,
        &ArcadeBodyConfig,
        &ControlInputs,
    )>,
    sim: Res<SimulationConfig>,
) {
    let dt = sim.time_step;

    query
        .par_iter_mut()
        .for_each(|(mut spatial, mut state, config, inputs)| {
            update_body(&mut spatial, &mut state, config, &inputs.0, dt);
        });
}

/// Advances a single body by `dt` seconds.
///
/// Rotation rates are applied in the body frame (roll about forward, pitch about right, yaw
/// about down), then the speed is updated from thrust and drag and the velocity is realigned
/// with the new forward axis.
pub fn update_body(
    spatial: &mut SpatialComponent,
    state: &mut ArcadeBodyState,
    config: &ArcadeBodyConfig,
    controls: &ControlOutput,
    dt: f64,
) {
    let controls = if controls.is_finite() {
        *controls
    } else {
        warn!("Discarding non-finite control inputs: {:?}", controls);
        ControlOutput::neutral()
    };

    state.throttle = (state.throttle + controls.throttle * config.throttle_rate * dt)
        .clamp(config.min_throttle, 1.0);

    let (roll_rate, pitch_rate, yaw_rate) = config.rates();
    let omega = Vector3::new(
        controls.roll * roll_rate,
        controls.pitch * pitch_rate,
        controls.yaw * yaw_rate,
    );
    spatial.angular_velocity = omega;
    if omega.norm() > 0.0 {
        let rotation = UnitQuaternion::from_scaled_axis(omega * dt);
        spatial.attitude =
            UnitQuaternion::from_quaternion((spatial.attitude * rotation).into_inner().normalize());
    }

    let speed = spatial.velocity.norm();
    let acceleration = state.throttle * config.thrust_acceleration - config.drag * speed;
    let new_speed = (speed + acceleration * dt).max(0.0);

    spatial.velocity = spatial.attitude * Vector3::x() * new_speed;
    spatial.position += spatial.velocity * dt;

    debug!(
        "Arcade body: position {:?}, speed {:.1}, throttle {:.2}",
        spatial.position, new_speed, state.throttle
    );
}
