pub mod config;

pub use config::{ConfigError, ConfigFile, ScenarioConfig, SimulationConfig};
