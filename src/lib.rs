//! Railsim - discrete-time train network simulation
//!
//! Passengers appear at stations along a route, wait on the platform facing
//! their destination, ride capacity-limited trains and leave once they
//! arrive. Everything advances on one logical clock with one seeded random
//! source, so a fixed seed reproduces a run exactly.

pub mod core;
pub mod network;
pub mod simulation;

pub use crate::core::{Result, SimError, SimulationConfig};
pub use network::{Direction, Location, Passenger, PassengerState, Route, RouteStyle, Station, Train};
pub use simulation::{Simulation, SimulationStats};
