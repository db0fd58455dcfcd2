//! Simulation configuration
//!
//! The whole run is described by one [`SimulationConfig`], normally loaded
//! from a TOML file (see `data/simulation.toml`). Everything is validated
//! before the first tick; a config that passes [`SimulationConfig::validate`]
//! never produces a setup error later on.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::Tick;
use crate::network::location::{Direction, RouteStyle};

/// Shape of the single route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub style: RouteStyle,
    /// Highest position on the route (positions run `0..=length`)
    pub length: u32,
}

/// One train's starting state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Maximum number of passengers on board
    pub capacity: u32,
    /// Starting position on the route
    pub position: u32,
    /// Starting direction of travel
    pub direction: Direction,
}

/// Inclusive `[min, max]` bound on a passenger count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedLimit {
    pub min: u32,
    pub max: u32,
}

impl PairedLimit {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A limit that always yields exactly `count`
    pub fn exactly(count: u32) -> Self {
        Self::new(count, count)
    }
}

/// Passenger generation ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerConfig {
    /// Population created before the clock starts (tick 0)
    pub initial: PairedLimit,
    /// New arrivals generated at the start of every tick
    pub per_tick: PairedLimit,
}

/// How the random source is seeded
///
/// Stored in the config file as a single integer, matching the classic
/// convention: `-1` seeds from the wall clock, `0` leaves the generator
/// unseeded (fresh entropy every run), anything else is a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SeedSetting {
    WallClock,
    #[default]
    Unseeded,
    Fixed(u64),
}

impl From<i64> for SeedSetting {
    fn from(value: i64) -> Self {
        match value {
            -1 => SeedSetting::WallClock,
            0 => SeedSetting::Unseeded,
            seed => SeedSetting::Fixed(seed as u64),
        }
    }
}

impl From<SeedSetting> for i64 {
    fn from(value: SeedSetting) -> Self {
        match value {
            SeedSetting::WallClock => -1,
            SeedSetting::Unseeded => 0,
            SeedSetting::Fixed(seed) => seed as i64,
        }
    }
}

/// Complete, validated parameter set for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub route: RouteConfig,
    /// Station positions, in id order (station 1 first)
    pub stations: Vec<u32>,
    /// Train specifications, in id order (train 1 first)
    #[serde(default)]
    pub trains: Vec<TrainConfig>,
    pub passengers: PassengerConfig,
    /// Number of ticks to run
    pub ticks: Tick,
    #[serde(default)]
    pub seed: SeedSetting,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            route: RouteConfig {
                style: RouteStyle::Linear,
                length: 20,
            },
            stations: vec![0, 4, 9, 14, 20],
            trains: vec![
                TrainConfig {
                    capacity: 10,
                    position: 0,
                    direction: Direction::Outbound,
                },
                TrainConfig {
                    capacity: 10,
                    position: 20,
                    direction: Direction::Inbound,
                },
            ],
            passengers: PassengerConfig {
                initial: PairedLimit::new(5, 15),
                per_tick: PairedLimit::new(0, 4),
            },
            ticks: 100,
            seed: SeedSetting::Fixed(12345),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let length = self.route.length;
        if length == 0 {
            return Err(SimError::InvalidConfig(
                "route length must be positive".into(),
            ));
        }

        // Direction resolution is only defined for linear routes.
        if self.route.style == RouteStyle::Circular {
            return Err(SimError::UnsupportedRouteStyle(RouteStyle::Circular));
        }

        let mut seen = HashSet::new();
        for &position in &self.stations {
            if position > length {
                return Err(SimError::PositionOutOfRange { position, length });
            }
            if !seen.insert(position) {
                return Err(SimError::DuplicateStation(position));
            }
        }

        let valid_directions = self.route.style.platform_directions();
        for (index, train) in self.trains.iter().enumerate() {
            if train.capacity == 0 {
                return Err(SimError::InvalidConfig(format!(
                    "train {} must have a positive capacity",
                    index + 1
                )));
            }
            if train.position > length {
                return Err(SimError::PositionOutOfRange {
                    position: train.position,
                    length,
                });
            }
            if !valid_directions.contains(&train.direction) {
                return Err(SimError::InvalidConfig(format!(
                    "train {} cannot travel {} on a {} route",
                    index + 1,
                    train.direction,
                    self.route.style
                )));
            }
        }

        for (name, limit) in [
            ("initial", self.passengers.initial),
            ("per_tick", self.passengers.per_tick),
        ] {
            if limit.min > limit.max {
                return Err(SimError::InvalidConfig(format!(
                    "{} passenger minimum ({}) exceeds maximum ({})",
                    name, limit.min, limit.max
                )));
            }
        }

        let generates_passengers =
            self.passengers.initial.max > 0 || self.passengers.per_tick.max > 0;
        if generates_passengers && self.stations.len() < 2 {
            return Err(SimError::InvalidConfig(
                "passenger generation needs at least two stations".into(),
            ));
        }

        Ok(())
    }
}
