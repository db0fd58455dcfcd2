//! Route topology and the entities that live on it

pub mod location;
pub mod passenger;
pub mod route;
pub mod station;
pub mod train;

pub use location::{Direction, Location, RouteRef, RouteStyle};
pub use passenger::{Passenger, PassengerRegistry, PassengerState};
pub use route::Route;
pub use station::Station;
pub use train::{ArrivalReport, Train};
