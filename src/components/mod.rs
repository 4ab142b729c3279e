pub mod body;
pub mod path;
pub mod pilot;
pub mod spatial;

pub use body::{ArcadeBodyConfig, ArcadeBodyState};
pub use path::{build_waypoints, catmull_rom, RacePath, RouteConfig, Track, Waypoint};
pub use pilot::{
    ControlInputs, ControlOutput, FollowPath, FollowerState, FollowerTelemetry, KinematicState,
    ManualPilot, PathFollower, PathFollowerConfig, Pilot, PilotComponent, SeekPilot,
    SeekPilotConfig,
};
pub use spatial::SpatialComponent;
