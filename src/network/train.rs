//! Trains and the station arrival sequence
//!
//! A train moves one position per tick. When its new position coincides with
//! a station it runs the arrival sequence: open doors, let off passengers
//! whose destination this is, board waiting passengers from the platform
//! matching its direction (first come, first served, up to free capacity),
//! then close doors.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::core::config::TrainConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{PassengerId, StationId, Tick, TrainId};
use crate::network::location::{Location, RouteRef};
use crate::network::passenger::{Passenger, PassengerRegistry};
use crate::network::station::Station;

/// What happened during one train's stop at a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalReport {
    pub train: TrainId,
    pub station: StationId,
    /// Passengers who got off, in on-board order
    pub disembarked: Vec<PassengerId>,
    /// Passengers who got on, in platform order
    pub boarded: Vec<PassengerId>,
}

/// A capacity-limited train on the route
#[derive(Debug, Clone)]
pub struct Train {
    id: TrainId,
    capacity: u32,
    location: Location,
    onboard: Vec<PassengerId>,
}

impl Train {
    pub fn new(id: TrainId, route: RouteRef, spec: &TrainConfig) -> Self {
        Self {
            id,
            capacity: spec.capacity,
            location: Location::new(route, spec.position, spec.direction),
            onboard: Vec::with_capacity(spec.capacity as usize),
        }
    }

    pub fn id(&self) -> TrainId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn passenger_count(&self) -> usize {
        self.onboard.len()
    }

    pub fn free_seats(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.onboard.len())
    }

    pub fn is_full(&self) -> bool {
        self.free_seats() == 0
    }

    /// Passengers on board, in boarding order
    pub fn onboard(&self) -> &[PassengerId] {
        &self.onboard
    }

    /// Advance one position in the current direction
    pub fn move_one(&mut self) {
        self.location.advance();
        trace!("{} is moving to {}", self, self.location);
    }

    /// Let a passenger on; a full train leaves them where they are
    ///
    /// Returns `false` when there was no room.
    pub(crate) fn board(&mut self, passenger: &mut Passenger, now: Tick) -> Result<bool> {
        if self.is_full() {
            return Ok(false);
        }
        passenger.board_train(now)?;
        self.onboard.push(passenger.id());
        trace!("{} boarded {}", passenger, self);
        Ok(true)
    }

    /// Run the full arrival sequence at `station`
    pub(crate) fn at_station(
        &mut self,
        station: &mut Station,
        passengers: &mut PassengerRegistry,
        now: Tick,
    ) -> Result<ArrivalReport> {
        self.open_doors(station);
        let disembarked = self.offload_passengers(station, passengers, now)?;
        let boarded = self.board_passengers(station, passengers, now)?;
        self.close_doors(station, passengers, &boarded)?;

        Ok(ArrivalReport {
            train: self.id,
            station: station.id(),
            disembarked,
            boarded,
        })
    }

    fn open_doors(&self, station: &Station) {
        station.train_arrived(self);
    }

    fn offload_passengers(
        &mut self,
        station: &Station,
        passengers: &mut PassengerRegistry,
        now: Tick,
    ) -> Result<Vec<PassengerId>> {
        let mut arriving = Vec::new();
        for &id in &self.onboard {
            let passenger = passengers.get(id).ok_or(SimError::UnknownPassenger(id))?;
            if passenger.destination() == station.id() {
                arriving.push(id);
            }
        }

        for &id in &arriving {
            let passenger = passengers
                .get_mut(id)
                .ok_or(SimError::UnknownPassenger(id))?;
            station.passenger_disembarked(passenger, self, now)?;
        }
        self.onboard.retain(|id| !arriving.contains(id));

        Ok(arriving)
    }

    fn board_passengers(
        &mut self,
        station: &mut Station,
        passengers: &mut PassengerRegistry,
        now: Tick,
    ) -> Result<Vec<PassengerId>> {
        let direction = self.location.direction();
        let mut boarded = Vec::new();

        // The head of the queue only leaves the platform once it is aboard.
        loop {
            let Some(id) = station.waiting_passengers(direction).next() else {
                break;
            };
            let passenger = passengers
                .get_mut(id)
                .ok_or(SimError::UnknownPassenger(id))?;
            if !self.board(passenger, now)? {
                break;
            }
            station.next_waiting_passenger(direction);
            boarded.push(id);
        }

        Ok(boarded)
    }

    fn close_doors(
        &self,
        station: &Station,
        passengers: &mut PassengerRegistry,
        boarded: &[PassengerId],
    ) -> Result<()> {
        for &id in boarded {
            passengers
                .get_mut(id)
                .ok_or(SimError::UnknownPassenger(id))?
                .depart()?;
        }
        debug!(
            "{} departing {} with {} of {} seats taken",
            self,
            station,
            self.onboard.len(),
            self.capacity
        );
        Ok(())
    }

    /// Human-readable snapshot; `at` is the station the train is stopped at, if any
    pub fn describe(&self, at: Option<&Station>) -> String {
        let at_station = at.map_or_else(String::new, |station| format!(" at {}", station));
        let onboard: Vec<String> = self.onboard.iter().map(|id| id.to_string()).collect();
        format!(
            "{} is {}{}; capacity: {}; on-board: {}\n\tPassengers: [{}]\n",
            self,
            self.location,
            at_station,
            self.capacity,
            self.onboard.len(),
            onboard.join(", ")
        )
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RouteId;
    use crate::network::location::{Direction, RouteStyle};
    use crate::network::passenger::PassengerState;

    fn route() -> RouteRef {
        RouteRef {
            id: RouteId(1),
            style: RouteStyle::Linear,
            length: 10,
        }
    }

    fn train(capacity: u32, position: u32) -> Train {
        Train::new(
            TrainId(1),
            route(),
            &TrainConfig {
                capacity,
                position,
                direction: Direction::Outbound,
            },
        )
    }

    /// Registry with `count` passengers waiting at `origin` for `destination`
    fn queue_passengers(
        registry: &mut PassengerRegistry,
        origin: &mut Station,
        destination: &Station,
        count: usize,
        now: Tick,
    ) -> Vec<PassengerId> {
        (0..count)
            .map(|_| {
                let mut p = Passenger::new(registry.next_id(), origin.id(), destination.id());
                origin.enter(&mut p, destination.location(), now).unwrap();
                registry.insert(p)
            })
            .collect()
    }

    #[test]
    fn test_move_one() {
        let mut t = train(2, 2);
        t.move_one();
        assert_eq!(t.location().position(), 3);
    }

    #[test]
    fn test_full_train_refuses_boarding() {
        let mut registry = PassengerRegistry::new();
        let mut origin = Station::new(StationId(1), route(), 2);
        let destination = Station::new(StationId(2), route(), 8);
        let ids = queue_passengers(&mut registry, &mut origin, &destination, 2, 1);

        let mut t = train(1, 2);
        assert!(t.board(registry.get_mut(ids[0]).unwrap(), 2).unwrap());
        assert!(!t.board(registry.get_mut(ids[1]).unwrap(), 2).unwrap());

        assert_eq!(t.passenger_count(), 1);
        assert!(t.is_full());
        let refused = registry.get(ids[1]).unwrap();
        assert_eq!(refused.time_boarded(), None);
        assert_eq!(refused.state(), PassengerState::Waiting);
    }

    #[test]
    fn test_arrival_boards_up_to_capacity_in_order() {
        let mut registry = PassengerRegistry::new();
        let mut origin = Station::new(StationId(1), route(), 2);
        let destination = Station::new(StationId(2), route(), 8);
        let ids = queue_passengers(&mut registry, &mut origin, &destination, 3, 1);

        let mut t = train(2, 2);
        let report = t.at_station(&mut origin, &mut registry, 4).unwrap();

        assert_eq!(report.boarded, vec![ids[0], ids[1]]);
        assert!(report.disembarked.is_empty());
        assert_eq!(t.onboard(), &[ids[0], ids[1]]);
        assert_eq!(origin.waiting_count(Direction::Outbound), 1);

        let rider = registry.get(ids[0]).unwrap();
        assert_eq!(rider.state(), PassengerState::Riding);
        assert_eq!(rider.time_waiting(), Some(3));
    }

    #[test]
    fn test_full_train_leaves_queue_intact() {
        let mut registry = PassengerRegistry::new();
        let mut first = Station::new(StationId(1), route(), 2);
        let mut second = Station::new(StationId(2), route(), 5);
        let end = Station::new(StationId(3), route(), 8);
        let rider = queue_passengers(&mut registry, &mut first, &end, 1, 0);
        let waiting = queue_passengers(&mut registry, &mut second, &end, 1, 0);

        let mut t = train(1, 2);
        t.at_station(&mut first, &mut registry, 1).unwrap();
        let report = t.at_station(&mut second, &mut registry, 4).unwrap();

        assert!(report.boarded.is_empty());
        assert_eq!(t.onboard(), rider.as_slice());
        assert_eq!(
            second.waiting_passengers(Direction::Outbound).collect::<Vec<_>>(),
            waiting
        );
        assert_eq!(registry.get(waiting[0]).unwrap().state(), PassengerState::Waiting);
    }

    #[test]
    fn test_arrival_only_offloads_at_destination() {
        let mut registry = PassengerRegistry::new();
        let mut origin = Station::new(StationId(1), route(), 2);
        let mut middle = Station::new(StationId(2), route(), 5);
        let mut end = Station::new(StationId(3), route(), 8);
        let to_middle = queue_passengers(&mut registry, &mut origin, &middle, 1, 0);
        let to_end = queue_passengers(&mut registry, &mut origin, &end, 1, 0);

        let mut t = train(4, 2);
        t.at_station(&mut origin, &mut registry, 0).unwrap();

        let report = t.at_station(&mut middle, &mut registry, 3).unwrap();
        assert_eq!(report.disembarked, to_middle);
        assert_eq!(t.onboard(), to_end.as_slice());

        let report = t.at_station(&mut end, &mut registry, 6).unwrap();
        assert_eq!(report.disembarked, to_end);
        assert_eq!(t.passenger_count(), 0);

        let arrived = registry.get(to_end[0]).unwrap();
        assert!(arrived.has_exited());
        assert_eq!(arrived.time_riding(), Some(6));
    }

    #[test]
    fn test_arrival_ignores_other_platform() {
        let mut registry = PassengerRegistry::new();
        let mut station = Station::new(StationId(2), route(), 5);
        let west = Station::new(StationId(1), route(), 2);
        queue_passengers(&mut registry, &mut station, &west, 2, 0);

        let mut t = train(4, 5);
        let report = t.at_station(&mut station, &mut registry, 1).unwrap();
        assert!(report.boarded.is_empty(), "Outbound train skips inbound platform");
        assert_eq!(station.waiting_count(Direction::Inbound), 2);
    }

    #[test]
    fn test_describe() {
        let t = train(3, 2);
        let station = Station::new(StationId(1), route(), 2);
        let text = t.describe(Some(&station));
        assert!(text.starts_with("Train 1 is at position 2 heading outbound on Route 1 at Station 1"));
        assert!(text.contains("capacity: 3; on-board: 0"));
    }
}
