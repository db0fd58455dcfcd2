//! Positions and directions of travel on a route
//!
//! A [`Location`] is a value type: a position on a particular route plus the
//! direction something there is facing. Stations hold a fixed location with
//! [`Direction::Stationary`]; trains own a location they advance every tick.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::core::types::RouteId;

/// Direction of travel along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Linear route, increasing position
    Outbound,
    /// Linear route, decreasing position
    Inbound,
    /// Circular route, increasing position
    Clockwise,
    /// Circular route, decreasing position
    Counterclockwise,
    Stationary,
    NotApplicable,
    NotSpecified,
}

impl Direction {
    /// The opposite direction; non-travel directions are their own reverse
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outbound => Direction::Inbound,
            Direction::Inbound => Direction::Outbound,
            Direction::Clockwise => Direction::Counterclockwise,
            Direction::Counterclockwise => Direction::Clockwise,
            other => other,
        }
    }

    /// True for the four directions that actually move something
    pub fn is_travel(self) -> bool {
        matches!(
            self,
            Direction::Outbound
                | Direction::Inbound
                | Direction::Clockwise
                | Direction::Counterclockwise
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Outbound => "outbound",
            Direction::Inbound => "inbound",
            Direction::Clockwise => "clockwise",
            Direction::Counterclockwise => "counterclockwise",
            Direction::Stationary => "stationary",
            Direction::NotApplicable => "not applicable",
            Direction::NotSpecified => "not specified",
        };
        f.write_str(name)
    }
}

/// Topology of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
    /// Bounded line from position 0 to `length`
    Linear,
    /// Loop where position `length` wraps back to 0
    Circular,
}

impl RouteStyle {
    /// The two platform directions every station on this style of route has
    pub fn platform_directions(self) -> [Direction; 2] {
        let one_direction = match self {
            RouteStyle::Linear => Direction::Outbound,
            RouteStyle::Circular => Direction::Clockwise,
        };
        [one_direction, one_direction.reverse()]
    }
}

impl fmt::Display for RouteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStyle::Linear => f.write_str("LINEAR"),
            RouteStyle::Circular => f.write_str("CIRCULAR"),
        }
    }
}

/// Copyable handle describing the route a location belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteRef {
    pub id: RouteId,
    pub style: RouteStyle,
    pub length: u32,
}

/// A position on a route plus a direction of travel
///
/// Equality and ordering only look at the route and the position: a train
/// heading inbound at position 5 is "at" the station at position 5.
/// Locations on different routes are never equal and do not order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    route: RouteRef,
    position: u32,
    direction: Direction,
}

impl Location {
    pub fn new(route: RouteRef, position: u32, direction: Direction) -> Self {
        Self {
            route,
            position,
            direction,
        }
    }

    pub fn route(&self) -> RouteRef {
        self.route
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Check if both locations are on the same route
    pub fn same_route(&self, other: &Location) -> bool {
        self.route.id == other.route.id
    }

    /// Move one position unit in the current direction
    ///
    /// On a linear route the ends turn the location around: a location facing
    /// off the end reverses before stepping, and one that steps onto an end
    /// reverses immediately so it leaves that end on the next move. On a
    /// circular route positions wrap modulo the route length.
    pub fn advance(&mut self) {
        let length = self.route.length;
        match self.route.style {
            RouteStyle::Linear => {
                if self.at_linear_end() {
                    self.direction = self.direction.reverse();
                }
                match self.direction {
                    Direction::Outbound => self.position += 1,
                    Direction::Inbound => self.position -= 1,
                    _ => return,
                }
                if self.at_linear_end() {
                    self.direction = self.direction.reverse();
                }
            }
            RouteStyle::Circular => match self.direction {
                Direction::Clockwise => self.position = (self.position + 1) % length,
                Direction::Counterclockwise => {
                    self.position = (self.position % length + length - 1) % length
                }
                _ => {}
            },
        }
    }

    /// Facing off either end of a linear route
    fn at_linear_end(&self) -> bool {
        (self.direction == Direction::Outbound && self.position >= self.route.length)
            || (self.direction == Direction::Inbound && self.position == 0)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.same_route(other) && self.position == other.position
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_route(other) {
            Some(self.position.cmp(&other.position))
        } else {
            None
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction.is_travel() {
            write!(
                f,
                "at position {} heading {} on {}",
                self.position, self.direction, self.route.id
            )
        } else {
            write!(f, "at position {} on {}", self.position, self.route.id)
        }
    }
}
