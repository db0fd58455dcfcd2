//! End-of-run statistics and report output

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{StationId, Tick, TrainId};
use crate::network::location::Direction;
use crate::network::passenger::{PassengerRegistry, PassengerState};
use crate::network::route::Route;

/// Spread of one passenger timer over every passenger that has it set
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerStats {
    pub count: usize,
    pub min: Option<Tick>,
    pub max: Option<Tick>,
    pub mean: f64,
}

impl TimerStats {
    pub fn from_values(values: impl IntoIterator<Item = Tick>) -> Self {
        let mut stats = TimerStats::default();
        let mut sum: u128 = 0;
        for value in values {
            stats.count += 1;
            sum += value as u128;
            stats.min = Some(stats.min.map_or(value, |min| min.min(value)));
            stats.max = Some(stats.max.map_or(value, |max| max.max(value)));
        }
        if stats.count > 0 {
            stats.mean = sum as f64 / stats.count as f64;
        }
        stats
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StationStats {
    pub station: StationId,
    pub position: u32,
    pub waiting: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainStats {
    pub train: TrainId,
    pub position: u32,
    pub direction: Direction,
    pub onboard: usize,
    pub capacity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_simulated: Tick,
    pub passengers_created: usize,
    pub passengers_waiting: usize,
    pub passengers_riding: usize,
    pub passengers_exited: usize,
    pub waiting_time: TimerStats,
    pub riding_time: TimerStats,
    pub total_time: TimerStats,
    pub stations: Vec<StationStats>,
    pub trains: Vec<TrainStats>,
}

impl SimulationStats {
    pub fn collect(route: &Route, passengers: &PassengerRegistry, ticks: Tick) -> Self {
        let riding = passengers.count_in(PassengerState::Boarded)
            + passengers.count_in(PassengerState::Riding);
        // Disembarked is only ever held for the instant before exiting.
        let exited = passengers.count_in(PassengerState::Disembarked)
            + passengers.count_in(PassengerState::Exited);

        Self {
            ticks_simulated: ticks,
            passengers_created: passengers.len(),
            passengers_waiting: passengers.count_in(PassengerState::Waiting),
            passengers_riding: riding,
            passengers_exited: exited,
            waiting_time: TimerStats::from_values(passengers.iter().filter_map(|p| p.time_waiting())),
            riding_time: TimerStats::from_values(passengers.iter().filter_map(|p| p.time_riding())),
            total_time: TimerStats::from_values(passengers.iter().filter_map(|p| p.total_time())),
            stations: route
                .stations()
                .iter()
                .map(|station| StationStats {
                    station: station.id(),
                    position: station.location().position(),
                    waiting: station.total_waiting(),
                })
                .collect(),
            trains: route
                .trains()
                .iter()
                .map(|train| TrainStats {
                    train: train.id(),
                    position: train.location().position(),
                    direction: train.location().direction(),
                    onboard: train.passenger_count(),
                    capacity: train.capacity(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Simulated {} ticks\n{} passengers created: {} waiting, {} riding, {} exited\n",
            self.ticks_simulated,
            self.passengers_created,
            self.passengers_waiting,
            self.passengers_riding,
            self.passengers_exited,
        );
        for (label, timer) in [
            ("waiting", &self.waiting_time),
            ("riding", &self.riding_time),
            ("total", &self.total_time),
        ] {
            match (timer.min, timer.max) {
                (Some(min), Some(max)) => summary.push_str(&format!(
                    "{:>8} time: mean {:.1}, min {}, max {} over {} passengers\n",
                    label, timer.mean, min, max, timer.count
                )),
                _ => summary.push_str(&format!("{:>8} time: n/a\n", label)),
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_stats() {
        let stats = TimerStats::from_values([4, 2, 9]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, Some(2));
        assert_eq!(stats.max, Some(9));
        assert!((stats.mean - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_timer_stats() {
        let stats = TimerStats::from_values(std::iter::empty());
        assert_eq!(stats, TimerStats::default());
        assert_eq!(stats.min, None);
    }
}
