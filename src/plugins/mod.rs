mod race;

pub use race::{path_follower_bundle, RacePilotPlugin, RacePilotSet};
