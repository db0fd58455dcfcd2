//! Tick orchestration
//!
//! Each tick runs in a fixed order:
//! 1. Advance the clock
//! 2. Generate this tick's passengers and queue them at their origins
//! 3. For every train in ascending id: move one position, then run the
//!    arrival sequence if a station sits at the new position
//!
//! Trains are processed one after another, so when two trains reach the same
//! station on the same tick the lower id boards first.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{PassengerId, StationId, Tick, TrainId};
use crate::network::passenger::{Passenger, PassengerRegistry};
use crate::network::route::Route;
use crate::network::train::ArrivalReport;
use crate::simulation::context::SimulationContext;
use crate::simulation::population::{create_passengers, spawn_passenger};
use crate::simulation::stats::SimulationStats;

/// What happened during one tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    pub created: Vec<PassengerId>,
    pub arrivals: Vec<ArrivalReport>,
}

pub struct Simulation {
    config: SimulationConfig,
    route: Route,
    context: SimulationContext,
}

impl Simulation {
    /// Build the route and the tick-0 population from a validated config
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut context = SimulationContext::new(config.seed);

        let mut route = Route::new(context.next_route_id(), &config.route)?;
        for &position in &config.stations {
            route.add_station(position)?;
        }
        for train in &config.trains {
            route.add_train(train)?;
        }
        info!(
            "Built {} ({}, length {}) with {} stations and {} trains",
            route,
            route.style(),
            route.length(),
            route.station_count(),
            route.train_count()
        );

        let initial = create_passengers(&mut route, &mut context, config.passengers.initial)?;
        info!("Created {} initial passengers", initial.len());

        Ok(Self {
            config,
            route,
            context,
        })
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> Result<TickReport> {
        let tick = self.context.advance_clock();
        let created = create_passengers(
            &mut self.route,
            &mut self.context,
            self.config.passengers.per_tick,
        )?;

        let mut arrivals = Vec::new();
        for index in 0..self.route.train_count() {
            let id = TrainId::from_index(index);
            self.route.move_train(id)?;
            if let Some(report) = self.route.arrive(id, &mut self.context.passengers, tick)? {
                arrivals.push(report);
            }
        }

        debug!(
            "Tick {}: {} passengers created, {} station stops",
            tick,
            created.len(),
            arrivals.len()
        );
        Ok(TickReport {
            tick,
            created,
            arrivals,
        })
    }

    /// Step until the configured tick count is reached
    pub fn run(&mut self) -> Result<SimulationStats> {
        while self.context.tick() < self.config.ticks {
            self.step()?;
        }
        let stats = self.stats();
        info!(
            "Finished after {} ticks: {} of {} passengers exited",
            stats.ticks_simulated, stats.passengers_exited, stats.passengers_created
        );
        Ok(stats)
    }

    /// Place a passenger with a chosen journey at the current tick
    pub fn spawn_passenger(
        &mut self,
        origin: StationId,
        destination: StationId,
    ) -> Result<PassengerId> {
        spawn_passenger(&mut self.route, &mut self.context, origin, destination)
    }

    pub fn tick(&self) -> Tick {
        self.context.tick()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn passengers(&self) -> &PassengerRegistry {
        self.context.passengers()
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.context.passengers().get(id)
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::collect(&self.route, self.context.passengers(), self.context.tick())
    }

    /// Human-readable snapshot of the route and every passenger
    pub fn snapshot(&self, label: &str) -> String {
        let mut snapshot = format!("{} (tick {})\n{}", label, self.tick(), self.route.describe());
        let passengers = self.passengers();
        if !passengers.is_empty() {
            snapshot.push_str(&format!("\n{} passengers:\n", passengers.len()));
            for passenger in passengers.iter() {
                snapshot.push_str(&format!("\t{}\n", passenger.describe()));
            }
        }
        snapshot
    }
}
