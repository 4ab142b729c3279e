mod body;
mod pilot;

pub use body::{arcade_body_system, update_body};
pub use pilot::{pilot_system, sync_track};
