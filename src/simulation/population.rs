//! Passenger generation
//!
//! All randomness in a run is drawn here, from the context's generator, in
//! a fixed order: the passenger count, then for each passenger its origin
//! followed by destination draws until one differs from the origin.

use rand::Rng;
use tracing::debug;

use crate::core::config::PairedLimit;
use crate::core::error::{Result, SimError};
use crate::core::types::{PassengerId, StationId};
use crate::network::passenger::Passenger;
use crate::network::route::{plural, Route};
use crate::simulation::context::SimulationContext;

/// How many passengers to create, uniformly within `[min, max]`
///
/// A fixed range (`min == max`) consumes no randomness.
pub fn passenger_count<R: Rng>(rng: &mut R, limit: PairedLimit) -> u32 {
    if limit.min >= limit.max {
        limit.min
    } else {
        rng.gen_range(limit.min..=limit.max)
    }
}

/// Uniform origin and uniform, distinct destination
///
/// Returns `None` when the route has fewer than two stations.
pub fn pick_journey<R: Rng>(rng: &mut R, station_count: usize) -> Option<(StationId, StationId)> {
    if station_count < 2 {
        return None;
    }
    let origin = rng.gen_range(0..station_count);
    let destination = loop {
        let candidate = rng.gen_range(0..station_count);
        if candidate != origin {
            break candidate;
        }
    };
    Some((StationId::from_index(origin), StationId::from_index(destination)))
}

/// Create a passenger at the current tick and queue them at their origin
pub fn spawn_passenger(
    route: &mut Route,
    context: &mut SimulationContext,
    origin: StationId,
    destination: StationId,
) -> Result<PassengerId> {
    if origin == destination {
        return Err(SimError::SameStation(origin));
    }
    let destination_location = *route
        .station(destination)
        .ok_or(SimError::UnknownStation(destination))?
        .location();
    let station = route
        .station_mut(origin)
        .ok_or(SimError::UnknownStation(origin))?;

    let mut passenger = Passenger::new(context.passengers.next_id(), origin, destination);
    station.enter(&mut passenger, &destination_location, context.tick)?;
    Ok(context.passengers.insert(passenger))
}

/// Create a random batch of passengers sized by `limit`
pub fn create_passengers(
    route: &mut Route,
    context: &mut SimulationContext,
    limit: PairedLimit,
) -> Result<Vec<PassengerId>> {
    let count = passenger_count(&mut context.rng, limit);
    debug!("Generating {} passenger{}", count, plural(count as usize));

    let mut created = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (origin, destination) = pick_journey(&mut context.rng, route.station_count())
            .ok_or_else(|| {
                SimError::InvalidConfig("passenger generation needs at least two stations".into())
            })?;
        created.push(spawn_passenger(route, context, origin, destination)?);
    }
    Ok(created)
}
