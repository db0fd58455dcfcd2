pub mod config;
pub mod error;
pub mod types;

pub use config::{PairedLimit, SeedSetting, SimulationConfig};
pub use error::{Result, SimError};
