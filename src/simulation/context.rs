//! Shared simulation state handed to every component
//!
//! The context carries the logical clock, the single seeded random source
//! and the id counters. Nothing in the crate keeps global mutable state;
//! whatever needs the current tick or a fresh id gets it from here.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::config::SeedSetting;
use crate::core::types::{RouteId, Tick};
use crate::network::passenger::PassengerRegistry;

pub struct SimulationContext {
    /// Current tick; 0 while setting up, before the clock starts
    pub(crate) tick: Tick,
    /// Random number generator (deterministic for a fixed seed)
    pub(crate) rng: ChaCha8Rng,
    /// Every passenger created so far, keyed by id
    pub(crate) passengers: PassengerRegistry,
    next_route_id: u32,
}

impl SimulationContext {
    pub fn new(seed: SeedSetting) -> Self {
        Self::with_rng(rng_from_seed(seed))
    }

    pub fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            tick: 0,
            rng,
            passengers: PassengerRegistry::new(),
            next_route_id: 1,
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn passengers(&self) -> &PassengerRegistry {
        &self.passengers
    }

    /// Advance the clock one tick and return the new time
    pub(crate) fn advance_clock(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }

    /// Generate a new unique RouteId
    pub(crate) fn next_route_id(&mut self) -> RouteId {
        let id = RouteId(self.next_route_id);
        self.next_route_id += 1;
        id
    }
}

/// Build the simulation's random source from the configured seed
pub fn rng_from_seed(seed: SeedSetting) -> ChaCha8Rng {
    match seed {
        SeedSetting::Fixed(seed) => ChaCha8Rng::seed_from_u64(seed),
        SeedSetting::WallClock => {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as u64)
                .unwrap_or_default();
            ChaCha8Rng::seed_from_u64(millis)
        }
        SeedSetting::Unseeded => ChaCha8Rng::seed_from_u64(rand::random()),
    }
}
