//! The route: ordered stations and trains on one line
//!
//! Station and train ids are 1-based and handed out in insertion order, so
//! id `n` always lives at index `n - 1`. Lookups that miss return `None`.

use std::fmt;
use tracing::debug;

use crate::core::config::{RouteConfig, TrainConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::{RouteId, StationId, Tick, TrainId};
use crate::network::location::{Direction, Location, RouteRef, RouteStyle};
use crate::network::passenger::PassengerRegistry;
use crate::network::station::Station;
use crate::network::train::{ArrivalReport, Train};

#[derive(Debug, Clone)]
pub struct Route {
    id: RouteId,
    style: RouteStyle,
    length: u32,
    stations: Vec<Station>,
    trains: Vec<Train>,
}

impl Route {
    pub fn new(id: RouteId, config: &RouteConfig) -> Result<Self> {
        if config.length == 0 {
            return Err(SimError::InvalidConfig(
                "route length must be positive".into(),
            ));
        }
        Ok(Self {
            id,
            style: config.style,
            length: config.length,
            stations: Vec::new(),
            trains: Vec::new(),
        })
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn style(&self) -> RouteStyle {
        self.style
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Copyable handle used by locations on this route
    pub fn handle(&self) -> RouteRef {
        RouteRef {
            id: self.id,
            style: self.style,
            length: self.length,
        }
    }

    fn check_position(&self, position: u32) -> Result<()> {
        let in_range = match self.style {
            RouteStyle::Linear => position <= self.length,
            RouteStyle::Circular => position < self.length,
        };
        if in_range {
            Ok(())
        } else {
            Err(SimError::PositionOutOfRange {
                position,
                length: self.length,
            })
        }
    }

    /// Append a station at `position`, returning its new id
    pub fn add_station(&mut self, position: u32) -> Result<StationId> {
        self.check_position(position)?;
        if self
            .stations
            .iter()
            .any(|station| station.location().position() == position)
        {
            return Err(SimError::DuplicateStation(position));
        }

        let id = StationId::from_index(self.stations.len());
        self.stations.push(Station::new(id, self.handle(), position));
        debug!("Created {} at position {}", id, position);
        Ok(id)
    }

    /// Append a train, returning its new id
    pub fn add_train(&mut self, spec: &TrainConfig) -> Result<TrainId> {
        self.check_position(spec.position)?;
        if spec.capacity == 0 {
            return Err(SimError::InvalidConfig(
                "train capacity must be positive".into(),
            ));
        }
        if !self.style.platform_directions().contains(&spec.direction) {
            return Err(SimError::InvalidConfig(format!(
                "trains cannot travel {} on a {} route",
                spec.direction, self.style
            )));
        }

        let id = TrainId::from_index(self.trains.len());
        self.trains.push(Train::new(id, self.handle(), spec));
        debug!("Created {} with capacity {}", id, spec.capacity);
        Ok(id)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index()?)
    }

    pub(crate) fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.get_mut(id.index()?)
    }

    /// The station whose position equals `location`'s, if any
    pub fn station_at(&self, location: &Location) -> Option<&Station> {
        self.stations
            .iter()
            .find(|station| station.location() == location)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(id.index()?)
    }

    /// The first train (lowest id) whose position equals `location`'s, if any
    pub fn train_at(&self, location: &Location) -> Option<&Train> {
        self.trains.iter().find(|train| train.location() == location)
    }

    pub fn train_count(&self) -> usize {
        self.trains.len()
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// Direction needed to travel from one location to another
    ///
    /// Locations on different routes give [`Direction::NotApplicable`].
    /// Circular routes are rejected rather than guessed at.
    pub fn resolve_direction(from: &Location, to: &Location) -> Result<Direction> {
        if !from.same_route(to) {
            return Ok(Direction::NotApplicable);
        }

        match from.route().style {
            RouteStyle::Linear => Ok(match from.position().cmp(&to.position()) {
                std::cmp::Ordering::Less => Direction::Outbound,
                std::cmp::Ordering::Greater => Direction::Inbound,
                std::cmp::Ordering::Equal => Direction::Stationary,
            }),
            RouteStyle::Circular => Err(SimError::UnsupportedRouteStyle(RouteStyle::Circular)),
        }
    }

    /// Direction needed to travel between two stations on this route
    pub fn direction_between(&self, from: StationId, to: StationId) -> Result<Direction> {
        let origin = self.station(from).ok_or(SimError::UnknownStation(from))?;
        let destination = self.station(to).ok_or(SimError::UnknownStation(to))?;
        Self::resolve_direction(origin.location(), destination.location())
    }

    /// Move one train a single position
    pub(crate) fn move_train(&mut self, id: TrainId) -> Result<()> {
        let index = self.train_index(id)?;
        self.trains[index].move_one();
        Ok(())
    }

    /// Run the arrival sequence if the train is now at a station
    ///
    /// Returns `None` when the train is between stations.
    pub(crate) fn arrive(
        &mut self,
        id: TrainId,
        passengers: &mut PassengerRegistry,
        now: Tick,
    ) -> Result<Option<ArrivalReport>> {
        let index = self.train_index(id)?;
        let Route {
            stations, trains, ..
        } = self;
        let train = &mut trains[index];

        let Some(station) = stations
            .iter_mut()
            .find(|station| station.location() == train.location())
        else {
            return Ok(None);
        };

        train.at_station(station, passengers, now).map(Some)
    }

    fn train_index(&self, id: TrainId) -> Result<usize> {
        id.index()
            .filter(|&index| index < self.trains.len())
            .ok_or(SimError::UnknownTrain(id))
    }

    /// Human-readable snapshot of the route, its stations and trains
    pub fn describe(&self) -> String {
        let mut description = format!("{}: {}; length: {}\n", self, self.style, self.length);

        description.push_str(&format!(
            "\n{} station{}:\n",
            self.stations.len(),
            plural(self.stations.len())
        ));
        for station in &self.stations {
            description.push_str(&format!("\t{}", station.describe()));
        }

        description.push_str(&format!(
            "{} train{}:\n",
            self.trains.len(),
            plural(self.trains.len())
        ));
        for train in &self.trains {
            let at = self.station_at(train.location());
            description.push_str(&format!("\t{}", train.describe(at)));
        }
        description
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_route(id: u32, length: u32) -> Route {
        Route::new(
            RouteId(id),
            &RouteConfig {
                style: RouteStyle::Linear,
                length,
            },
        )
        .unwrap()
    }

    fn at(route: &Route, position: u32) -> Location {
        Location::new(route.handle(), position, Direction::NotSpecified)
    }

    fn outbound_train(capacity: u32, position: u32) -> TrainConfig {
        TrainConfig {
            capacity,
            position,
            direction: Direction::Outbound,
        }
    }

    #[test]
    fn test_zero_length_route_rejected() {
        let result = Route::new(
            RouteId(1),
            &RouteConfig {
                style: RouteStyle::Linear,
                length: 0,
            },
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_resolve_direction_linear() {
        let route = linear_route(1, 10);
        assert_eq!(
            Route::resolve_direction(&at(&route, 3), &at(&route, 3)).unwrap(),
            Direction::Stationary
        );
        assert_eq!(
            Route::resolve_direction(&at(&route, 3), &at(&route, 5)).unwrap(),
            Direction::Outbound
        );
        assert_eq!(
            Route::resolve_direction(&at(&route, 5), &at(&route, 1)).unwrap(),
            Direction::Inbound
        );
    }

    #[test]
    fn test_resolve_direction_across_routes() {
        let first = linear_route(1, 10);
        let second = linear_route(2, 10);
        assert_eq!(
            Route::resolve_direction(&at(&first, 3), &at(&second, 5)).unwrap(),
            Direction::NotApplicable
        );
    }

    #[test]
    fn test_resolve_direction_circular_unsupported() {
        let route = Route::new(
            RouteId(1),
            &RouteConfig {
                style: RouteStyle::Circular,
                length: 10,
            },
        )
        .unwrap();
        assert!(matches!(
            Route::resolve_direction(&at(&route, 1), &at(&route, 4)),
            Err(SimError::UnsupportedRouteStyle(RouteStyle::Circular))
        ));
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut route = linear_route(1, 10);
        // Inserted out of position order on purpose
        assert_eq!(route.add_station(8).unwrap(), StationId(1));
        assert_eq!(route.add_station(2).unwrap(), StationId(2));
        assert_eq!(route.add_station(5).unwrap(), StationId(3));

        assert_eq!(route.station(StationId(1)).unwrap().location().position(), 8);
        assert_eq!(route.station(StationId(2)).unwrap().location().position(), 2);
        assert_eq!(route.station_count(), 3);
    }

    #[test]
    fn test_lookup_misses_are_none() {
        let mut route = linear_route(1, 10);
        route.add_station(2).unwrap();
        route.add_train(&outbound_train(2, 0)).unwrap();

        assert!(route.station(StationId(0)).is_none());
        assert!(route.station(StationId(2)).is_none());
        assert!(route.train(TrainId(0)).is_none());
        assert!(route.train(TrainId(2)).is_none());
        assert!(route.station_at(&at(&route, 3)).is_none());
        assert!(route.train_at(&at(&route, 3)).is_none());
    }

    #[test]
    fn test_lookup_by_location_ignores_direction() {
        let mut route = linear_route(1, 10);
        route.add_station(2).unwrap();
        route.add_station(5).unwrap();
        route.add_train(&outbound_train(2, 5)).unwrap();

        let here = Location::new(route.handle(), 5, Direction::Inbound);
        assert_eq!(route.station_at(&here).map(Station::id), Some(StationId(2)));
        assert_eq!(route.train_at(&here).map(Train::id), Some(TrainId(1)));
    }

    #[test]
    fn test_rejects_bad_placements() {
        let mut route = linear_route(1, 10);
        route.add_station(4).unwrap();
        assert!(matches!(route.add_station(4), Err(SimError::DuplicateStation(4))));
        assert!(matches!(
            route.add_station(11),
            Err(SimError::PositionOutOfRange { .. })
        ));
        assert!(route.add_train(&outbound_train(0, 1)).is_err());
        assert!(route
            .add_train(&TrainConfig {
                capacity: 1,
                position: 1,
                direction: Direction::Clockwise,
            })
            .is_err());
    }

    #[test]
    fn test_direction_between_stations() {
        let mut route = linear_route(1, 10);
        let west = route.add_station(2).unwrap();
        let east = route.add_station(8).unwrap();
        assert_eq!(route.direction_between(west, east).unwrap(), Direction::Outbound);
        assert_eq!(route.direction_between(east, west).unwrap(), Direction::Inbound);
        assert!(matches!(
            route.direction_between(west, StationId(9)),
            Err(SimError::UnknownStation(StationId(9)))
        ));
    }

    #[test]
    fn test_arrive_between_stations_is_none() {
        let mut route = linear_route(1, 10);
        route.add_station(2).unwrap();
        let train = route.add_train(&outbound_train(2, 3)).unwrap();
        let mut passengers = PassengerRegistry::new();

        assert_eq!(route.arrive(train, &mut passengers, 1).unwrap(), None);
        assert!(matches!(
            route.arrive(TrainId(5), &mut passengers, 1),
            Err(SimError::UnknownTrain(TrainId(5)))
        ));
    }

    #[test]
    fn test_describe() {
        let mut route = linear_route(1, 10);
        route.add_station(2).unwrap();
        route.add_train(&outbound_train(2, 2)).unwrap();

        let text = route.describe();
        assert!(text.starts_with("Route 1: LINEAR; length: 10"));
        assert!(text.contains("1 station:"));
        assert!(text.contains("1 train:"));
        assert!(text.contains("Train 1 is at position 2 heading outbound on Route 1 at Station 1"));
    }
}
