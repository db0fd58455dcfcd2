//! Tick-driven simulation: shared context, passenger generation, the
//! orchestration loop and end-of-run statistics

pub mod context;
pub mod population;
pub mod stats;
pub mod tick;

pub use context::SimulationContext;
pub use stats::{SimulationStats, TimerStats};
pub use tick::{Simulation, TickReport};
