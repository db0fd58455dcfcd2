use thiserror::Error;

use crate::core::types::{PassengerId, StationId, TrainId};
use crate::network::location::{Direction, RouteStyle};
use crate::network::passenger::PassengerState;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} routes are not supported")]
    UnsupportedRouteStyle(RouteStyle),

    #[error("{station} has no {direction} platform")]
    NoPlatform {
        station: StationId,
        direction: Direction,
    },

    #[error("A station already exists at position {0}")]
    DuplicateStation(u32),

    #[error("Position {position} is off a route of length {length}")]
    PositionOutOfRange { position: u32, length: u32 },

    #[error("{0} cannot be both origin and destination")]
    SameStation(StationId),

    #[error("Station not found: {0}")]
    UnknownStation(StationId),

    #[error("Train not found: {0}")]
    UnknownTrain(TrainId),

    #[error("Passenger not found: {0}")]
    UnknownPassenger(PassengerId),

    #[error("{passenger} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        passenger: PassengerId,
        from: PassengerState,
        to: PassengerState,
    },

    #[error("{passenger} is travelling to {destination}, not {station}")]
    NotDestination {
        passenger: PassengerId,
        destination: StationId,
        station: StationId,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
