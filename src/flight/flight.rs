//! The flight entity

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scheduled departure
///
/// Flights are identified by their flight number, which must be unique within
/// a simulation. They are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Unique flight number, e.g. `"AA100"`
    pub flight_number: String,
    /// Scheduled departure time of day
    #[serde(with = "super::time_format")]
    pub departure_time: NaiveTime,
    /// Number of seats on the aircraft
    pub seats: u32,
    /// Expected load factor (0.0-1.0)
    pub fill_fraction: f64,
}

impl Flight {
    /// Create a new flight
    pub fn new(
        flight_number: impl Into<String>,
        departure_time: NaiveTime,
        seats: u32,
        fill_fraction: f64,
    ) -> Self {
        Self { flight_number: flight_number.into(), departure_time, seats, fill_fraction }
    }

    /// Number of passengers expected to show up: `round(seats * fill_fraction)`
    pub fn expected_passengers(&self) -> u32 {
        (self.seats as f64 * self.fill_fraction).round() as u32
    }

    /// Departure time as minutes since midnight
    pub fn departure_minute(&self) -> i64 {
        i64::from(self.departure_time.num_seconds_from_midnight() / 60)
    }

    /// Time of day at which boarding closes, `buffer_minutes` before departure
    pub fn boarding_close_time(&self, buffer_minutes: u32) -> NaiveTime {
        self.departure_time - Duration::minutes(i64::from(buffer_minutes))
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.flight_number, self.departure_time.format("%H:%M"))
    }
}
