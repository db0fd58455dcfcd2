//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation tick counter (simulation time unit)
pub type Tick = u64;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Id for the entity stored at a zero-based index (ids are 1-based)
            pub fn from_index(index: usize) -> Self {
                Self(index as u32 + 1)
            }

            /// Zero-based storage index, `None` for the invalid id 0
            pub fn index(self) -> Option<usize> {
                (self.0 as usize).checked_sub(1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a route
    RouteId,
    "Route"
);
entity_id!(
    /// Station identifier, dense and assigned in insertion order
    StationId,
    "Station"
);
entity_id!(
    /// Train identifier, dense and assigned in insertion order
    TrainId,
    "Train"
);
entity_id!(
    /// Passenger identifier, also the key into the passenger registry
    PassengerId,
    "Passenger"
);
