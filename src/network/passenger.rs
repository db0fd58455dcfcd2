//! Passengers and the registry that owns them
//!
//! A passenger moves strictly forward through its lifecycle:
//! `Created -> Waiting -> Boarded -> Riding -> Disembarked -> Exited`.
//! Every transition that happens at a station stamps the current tick and
//! recomputes the timer it affects. Stations and trains only ever hold
//! [`PassengerId`]s; the [`PassengerRegistry`] owns the passengers themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{Result, SimError};
use crate::core::types::{PassengerId, StationId, Tick};

/// Lifecycle stage of a passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassengerState {
    Created,
    /// Queued on an origin platform
    Waiting,
    /// Stepped on a train during the current stop
    Boarded,
    /// On a train that has left the boarding station
    Riding,
    Disembarked,
    /// Left the destination station; final
    Exited,
}

/// A single traveller between two stations on the route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    id: PassengerId,
    origin: StationId,
    destination: StationId,
    state: PassengerState,

    time_entered: Option<Tick>,
    time_boarded: Option<Tick>,
    time_disembarked: Option<Tick>,
    time_exited: Option<Tick>,

    time_waiting: Option<Tick>,
    time_riding: Option<Tick>,
    total_time: Option<Tick>,
}

impl Passenger {
    pub(crate) fn new(id: PassengerId, origin: StationId, destination: StationId) -> Self {
        Self {
            id,
            origin,
            destination,
            state: PassengerState::Created,
            time_entered: None,
            time_boarded: None,
            time_disembarked: None,
            time_exited: None,
            time_waiting: None,
            time_riding: None,
            total_time: None,
        }
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn origin(&self) -> StationId {
        self.origin
    }

    pub fn destination(&self) -> StationId {
        self.destination
    }

    pub fn state(&self) -> PassengerState {
        self.state
    }

    /// Tick the passenger entered the origin station
    pub fn time_entered(&self) -> Option<Tick> {
        self.time_entered
    }

    /// Tick the passenger got onto a train
    pub fn time_boarded(&self) -> Option<Tick> {
        self.time_boarded
    }

    /// Tick the passenger got off the train
    pub fn time_disembarked(&self) -> Option<Tick> {
        self.time_disembarked
    }

    /// Tick the passenger left the destination station
    pub fn time_exited(&self) -> Option<Tick> {
        self.time_exited
    }

    /// Ticks spent on the origin platform
    pub fn time_waiting(&self) -> Option<Tick> {
        self.time_waiting
    }

    /// Ticks spent on the train
    pub fn time_riding(&self) -> Option<Tick> {
        self.time_riding
    }

    /// Ticks from entering the origin to exiting the destination
    pub fn total_time(&self) -> Option<Tick> {
        self.total_time
    }

    pub fn has_exited(&self) -> bool {
        self.state == PassengerState::Exited
    }

    pub(crate) fn enter_station(&mut self, now: Tick) -> Result<()> {
        self.transition(PassengerState::Created, PassengerState::Waiting)?;
        self.time_entered = Some(now);
        self.calculate_time_waited();
        self.calculate_total_time();
        Ok(())
    }

    pub(crate) fn board_train(&mut self, now: Tick) -> Result<()> {
        self.transition(PassengerState::Waiting, PassengerState::Boarded)?;
        self.time_boarded = Some(now);
        self.calculate_time_waited();
        self.calculate_time_riding();
        Ok(())
    }

    /// The train carrying this passenger closed its doors
    pub(crate) fn depart(&mut self) -> Result<()> {
        self.transition(PassengerState::Boarded, PassengerState::Riding)
    }

    pub(crate) fn disembark_train(&mut self, now: Tick) -> Result<()> {
        self.transition(PassengerState::Riding, PassengerState::Disembarked)?;
        self.time_disembarked = Some(now);
        self.calculate_time_riding();
        Ok(())
    }

    pub(crate) fn exit_station(&mut self, now: Tick) -> Result<()> {
        self.transition(PassengerState::Disembarked, PassengerState::Exited)?;
        self.time_exited = Some(now);
        self.calculate_total_time();
        Ok(())
    }

    fn transition(&mut self, from: PassengerState, to: PassengerState) -> Result<()> {
        if self.state != from {
            return Err(SimError::InvalidTransition {
                passenger: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    fn calculate_time_waited(&mut self) {
        self.time_waiting = elapsed(self.time_entered, self.time_boarded);
    }

    fn calculate_time_riding(&mut self) {
        self.time_riding = elapsed(self.time_boarded, self.time_disembarked);
    }

    fn calculate_total_time(&mut self) {
        self.total_time = elapsed(self.time_entered, self.time_exited);
    }

    /// Human-readable snapshot of the passenger's journey and timers
    pub fn describe(&self) -> String {
        format!(
            "{}: {} to {}; times: start: {}, board: {}, disembark: {}, end: {}, waited: {}, rode: {}, total: {}",
            self.id,
            self.origin,
            self.destination,
            show(self.time_entered),
            show(self.time_boarded),
            show(self.time_disembarked),
            show(self.time_exited),
            show(self.time_waiting),
            show(self.time_riding),
            show(self.total_time),
        )
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Span between two stamps; unknown until both are recorded
fn elapsed(earlier: Option<Tick>, later: Option<Tick>) -> Option<Tick> {
    later?.checked_sub(earlier?)
}

fn show(time: Option<Tick>) -> String {
    time.map_or_else(|| "n/a".to_string(), |t| t.to_string())
}

/// Arena of every passenger created during a run, indexed by id
///
/// Passengers are never removed; exited passengers stay for statistics.
#[derive(Debug, Clone, Default)]
pub struct PassengerRegistry {
    passengers: Vec<Passenger>,
}

impl PassengerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next inserted passenger will receive
    pub(crate) fn next_id(&self) -> PassengerId {
        PassengerId::from_index(self.passengers.len())
    }

    pub(crate) fn insert(&mut self, passenger: Passenger) -> PassengerId {
        debug_assert_eq!(passenger.id(), self.next_id());
        let id = passenger.id();
        self.passengers.push(passenger);
        id
    }

    pub fn get(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(id.index()?)
    }

    pub(crate) fn get_mut(&mut self, id: PassengerId) -> Option<&mut Passenger> {
        self.passengers.get_mut(id.index()?)
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.iter()
    }

    /// Number of passengers currently in `state`
    pub fn count_in(&self, state: PassengerState) -> usize {
        self.passengers.iter().filter(|p| p.state == state).count()
    }
}
