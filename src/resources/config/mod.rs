pub mod loader;
pub mod scenario;
pub mod simulation;

pub use loader::{ConfigError, ConfigFile};
pub use scenario::ScenarioConfig;
pub use simulation::SimulationConfig;
