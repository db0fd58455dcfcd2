//! Stations and their per-direction platforms
//!
//! Every station has exactly two platforms, one per travel direction of the
//! route style. A passenger waits on the platform for the direction that
//! leads to their destination and boards trains strictly first come, first
//! served.

use ahash::AHashMap;
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

use crate::core::error::{Result, SimError};
use crate::core::types::{PassengerId, StationId, Tick};
use crate::network::location::{Direction, Location, RouteRef, RouteStyle};
use crate::network::passenger::Passenger;
use crate::network::route::Route;
use crate::network::train::Train;

/// A fixed stop on the route
#[derive(Debug, Clone)]
pub struct Station {
    id: StationId,
    location: Location,
    platforms: AHashMap<Direction, VecDeque<PassengerId>>,
}

impl Station {
    pub fn new(id: StationId, route: RouteRef, position: u32) -> Self {
        let platforms = route
            .style
            .platform_directions()
            .into_iter()
            .map(|direction| (direction, VecDeque::new()))
            .collect();

        Self {
            id,
            location: Location::new(route, position, Direction::Stationary),
            platforms,
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn style(&self) -> RouteStyle {
        self.location.route().style
    }

    /// Queue a newly created passenger on the platform toward their destination
    ///
    /// Returns the platform direction chosen.
    pub(crate) fn enter(
        &mut self,
        passenger: &mut Passenger,
        destination: &Location,
        now: Tick,
    ) -> Result<Direction> {
        let station = self.id;
        let direction = Route::resolve_direction(&self.location, destination)?;
        let Some(platform) = self.platforms.get_mut(&direction) else {
            return Err(SimError::NoPlatform { station, direction });
        };

        passenger.enter_station(now)?;
        platform.push_back(passenger.id());

        debug!(
            "{} is waiting on {}'s {} platform heading to {}",
            passenger,
            station,
            direction,
            passenger.destination()
        );
        Ok(direction)
    }

    pub fn has_waiting_passenger(&self, direction: Direction) -> bool {
        self.platforms
            .get(&direction)
            .is_some_and(|platform| !platform.is_empty())
    }

    /// Take the passenger at the head of a platform queue
    pub(crate) fn next_waiting_passenger(&mut self, direction: Direction) -> Option<PassengerId> {
        self.platforms.get_mut(&direction)?.pop_front()
    }

    pub fn waiting_count(&self, direction: Direction) -> usize {
        self.platforms.get(&direction).map_or(0, VecDeque::len)
    }

    pub fn total_waiting(&self) -> usize {
        self.platforms.values().map(VecDeque::len).sum()
    }

    /// Passengers on one platform, head of the queue first
    pub fn waiting_passengers(&self, direction: Direction) -> impl Iterator<Item = PassengerId> + '_ {
        self.platforms
            .get(&direction)
            .into_iter()
            .flat_map(|platform| platform.iter().copied())
    }

    pub fn train_arrived(&self, train: &Train) {
        debug!(
            "{} arrived at {}'s {} platform",
            train,
            self,
            train.location().direction()
        );
    }

    /// Record a passenger stepping off `train` here
    ///
    /// Passengers are only let off at their destination, where they exit
    /// immediately. Anyone else is refused before any state changes, so they
    /// stay on the train.
    pub(crate) fn passenger_disembarked(
        &self,
        passenger: &mut Passenger,
        train: &Train,
        now: Tick,
    ) -> Result<()> {
        if passenger.destination() != self.id {
            return Err(SimError::NotDestination {
                passenger: passenger.id(),
                destination: passenger.destination(),
                station: self.id,
            });
        }

        passenger.disembark_train(now)?;
        debug!("{} got off {} at {}", passenger, train, self);
        self.exit(passenger, now)
    }

    fn exit(&self, passenger: &mut Passenger, now: Tick) -> Result<()> {
        passenger.exit_station(now)?;
        debug!(
            "{} arrived after waiting {} ticks and riding {} ticks; total travel time was {} ticks",
            passenger,
            passenger.time_waiting().unwrap_or_default(),
            passenger.time_riding().unwrap_or_default(),
            passenger.total_time().unwrap_or_default()
        );
        Ok(())
    }

    /// Human-readable snapshot of the station and its queues
    pub fn describe(&self) -> String {
        let mut description = format!("{} is {}\n", self, self.location);
        for direction in self.style().platform_directions() {
            let waiting: Vec<String> = self
                .waiting_passengers(direction)
                .map(|id| id.to_string())
                .collect();
            description.push_str(&format!("\t{}: [{}]\n", direction, waiting.join(", ")));
        }
        description
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TrainConfig;
    use crate::core::types::{RouteId, TrainId};

    fn route() -> RouteRef {
        RouteRef {
            id: RouteId(1),
            style: RouteStyle::Linear,
            length: 10,
        }
    }

    fn stop(id: u32, position: u32) -> Station {
        Station::new(StationId(id), route(), position)
    }

    #[test]
    fn test_station_has_two_platforms() {
        let station = stop(1, 5);
        assert_eq!(station.location().direction(), Direction::Stationary);
        assert!(!station.has_waiting_passenger(Direction::Outbound));
        assert!(!station.has_waiting_passenger(Direction::Inbound));
        assert_eq!(station.waiting_count(Direction::Clockwise), 0);
    }

    #[test]
    fn test_enter_selects_platform_by_destination() {
        let mut station = stop(2, 5);
        let east = stop(3, 8);
        let west = stop(1, 2);

        let mut going_out = Passenger::new(PassengerId(1), StationId(2), StationId(3));
        let mut going_in = Passenger::new(PassengerId(2), StationId(2), StationId(1));

        let out = station.enter(&mut going_out, east.location(), 1).unwrap();
        let back = station.enter(&mut going_in, west.location(), 1).unwrap();

        assert_eq!(out, Direction::Outbound);
        assert_eq!(back, Direction::Inbound);
        assert_eq!(station.waiting_count(Direction::Outbound), 1);
        assert_eq!(station.waiting_count(Direction::Inbound), 1);
        assert_eq!(going_out.time_entered(), Some(1));
    }

    #[test]
    fn test_enter_same_station_has_no_platform() {
        let mut station = stop(1, 5);
        let mut p = Passenger::new(PassengerId(1), StationId(1), StationId(1));
        let location = *station.location();
        assert!(matches!(
            station.enter(&mut p, &location, 0),
            Err(SimError::NoPlatform {
                direction: Direction::Stationary,
                ..
            })
        ));
        assert_eq!(p.time_entered(), None, "Rejected passenger is untouched");
    }

    #[test]
    fn test_platform_is_fifo() {
        let mut station = stop(1, 0);
        let destination = stop(2, 9);
        for id in 1..=3 {
            let mut p = Passenger::new(PassengerId(id), StationId(1), StationId(2));
            station.enter(&mut p, destination.location(), 0).unwrap();
        }

        let order: Vec<_> = station.waiting_passengers(Direction::Outbound).collect();
        assert_eq!(order, vec![PassengerId(1), PassengerId(2), PassengerId(3)]);

        assert_eq!(station.next_waiting_passenger(Direction::Outbound), Some(PassengerId(1)));
        assert_eq!(station.next_waiting_passenger(Direction::Outbound), Some(PassengerId(2)));
        assert_eq!(station.next_waiting_passenger(Direction::Outbound), Some(PassengerId(3)));
        assert_eq!(station.next_waiting_passenger(Direction::Outbound), None);
        assert_eq!(station.next_waiting_passenger(Direction::NotSpecified), None);
    }

    #[test]
    fn test_disembark_at_destination_exits() {
        let station = stop(2, 8);
        let train = Train::new(
            TrainId(1),
            route(),
            &TrainConfig {
                capacity: 2,
                position: 8,
                direction: Direction::Outbound,
            },
        );

        let mut p = Passenger::new(PassengerId(1), StationId(1), StationId(2));
        p.enter_station(1).unwrap();
        p.board_train(2).unwrap();
        p.depart().unwrap();

        station.passenger_disembarked(&mut p, &train, 8).unwrap();
        assert!(p.has_exited());
        assert_eq!(p.time_disembarked(), Some(8));
        assert_eq!(p.time_exited(), Some(8));
        assert_eq!(p.time_riding(), Some(6));
        assert_eq!(p.total_time(), Some(7));
    }

    #[test]
    fn test_disembark_elsewhere_is_refused() {
        let station = stop(3, 5);
        let train = Train::new(
            TrainId(1),
            route(),
            &TrainConfig {
                capacity: 2,
                position: 5,
                direction: Direction::Outbound,
            },
        );

        let mut p = Passenger::new(PassengerId(1), StationId(1), StationId(2));
        p.enter_station(1).unwrap();
        p.board_train(2).unwrap();
        p.depart().unwrap();

        assert!(matches!(
            station.passenger_disembarked(&mut p, &train, 4),
            Err(SimError::NotDestination { .. })
        ));
        assert_eq!(p.time_disembarked(), None);
    }

    #[test]
    fn test_describe_lists_platforms_in_order() {
        let mut station = stop(1, 0);
        let destination = stop(2, 9);
        let mut p = Passenger::new(PassengerId(4), StationId(1), StationId(2));
        station.enter(&mut p, destination.location(), 0).unwrap();

        let text = station.describe();
        assert!(text.starts_with("Station 1 is at position 0 on Route 1"));
        assert!(text.contains("outbound: [Passenger 4]"));
        assert!(text.contains("inbound: []"));
        assert!(text.find("outbound").unwrap() < text.find("inbound").unwrap());
    }
}
