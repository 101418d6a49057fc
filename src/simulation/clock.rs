//! Simulation clock: the global time origin and per-flight tick markers
//!
//! All ticks are minutes counted from the origin, which is the earliest
//! departure minus the arrival span. A flight's arrivals start at its own
//! departure minus the span, so later flights start arriving at later ticks.

use crate::flight::Flight;
use crate::passenger::Tick;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::FlightId;
use chrono::NaiveTime;
use tracing::debug;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Tick bookkeeping derived from a flight list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    origin_minute: i64,
    arrival_span: u32,
    close_buffer: u32,
    arrival_start_ticks: Vec<Tick>,
    close_ticks: Vec<Tick>,
    total_ticks: Tick,
}

impl SimulationClock {
    /// Derive the origin, close ticks and total tick count for `flights`
    ///
    /// Fails if the list is empty or if any flight would close boarding before
    /// the origin (a buffer longer than the arrival span).
    pub fn new(flights: &[Flight], arrival_span: u32, close_buffer: u32) -> SimulationResult<Self> {
        let earliest = flights
            .iter()
            .map(Flight::departure_minute)
            .min()
            .ok_or_else(|| SimulationError::configuration_error("flight list is empty"))?;
        let origin_minute = earliest - i64::from(arrival_span);

        let mut arrival_start_ticks = Vec::with_capacity(flights.len());
        let mut close_ticks = Vec::with_capacity(flights.len());

        for flight in flights {
            let departure = flight.departure_minute() - origin_minute;
            let close = departure - i64::from(close_buffer);
            if close < 0 {
                return Err(SimulationError::BoardingClosesBeforeOrigin {
                    flight: flight.flight_number.clone(),
                    close_tick: close,
                });
            }
            arrival_start_ticks.push(to_tick(departure - i64::from(arrival_span))?);
            close_ticks.push(to_tick(close)?);
        }

        let total_ticks = close_ticks.iter().max().map_or(0, |max| max + 1);
        debug!(
            "Clock origin at minute {} with {} ticks across {} flights",
            origin_minute,
            total_ticks,
            flights.len()
        );

        Ok(Self { origin_minute, arrival_span, close_buffer, arrival_start_ticks, close_ticks, total_ticks })
    }

    /// Number of ticks in a full run: one past the latest close tick
    pub fn total_ticks(&self) -> Tick {
        self.total_ticks
    }

    /// Arrival span in minutes
    pub fn arrival_span(&self) -> u32 {
        self.arrival_span
    }

    /// Minutes before departure at which boarding closes
    pub fn close_buffer(&self) -> u32 {
        self.close_buffer
    }

    /// Tick at which boarding closes for `flight`
    pub fn boarding_close_tick(&self, flight: FlightId) -> Tick {
        self.close_ticks[flight.index()]
    }

    /// Tick of the first arrival bucket for `flight`
    pub fn arrival_start_tick(&self, flight: FlightId) -> Tick {
        self.arrival_start_ticks[flight.index()]
    }

    /// Index into a flight's per-minute arrival plan for `tick`, if inside its window
    pub fn arrival_offset(&self, flight: FlightId, tick: Tick) -> Option<usize> {
        let offset = tick.checked_sub(self.arrival_start_tick(flight))?;
        (offset < self.arrival_span).then_some(offset as usize)
    }

    /// Time of day at the origin
    pub fn origin_time(&self) -> NaiveTime {
        self.time_at(0)
    }

    /// Wall-clock time of day corresponding to `tick`
    ///
    /// Wraps around midnight.
    pub fn time_at(&self, tick: Tick) -> NaiveTime {
        let minute = (self.origin_minute + i64::from(tick)).rem_euclid(MINUTES_PER_DAY) as u32;
        // rem_euclid keeps the minute in 0..1440, so hour < 24 and minute < 60
        NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).expect("minute of day is in range")
    }

    /// Reporting interval containing `tick`
    pub fn interval_of(&self, tick: Tick, interval_minutes: u32) -> u32 {
        tick / interval_minutes.max(1)
    }
}

fn to_tick(minutes: i64) -> SimulationResult<Tick> {
    Tick::try_from(minutes)
        .map_err(|_| SimulationError::configuration_error(format!("tick {} is out of range", minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn flights() -> Vec<Flight> {
        vec![Flight::new("AA100", at(9, 0), 100, 1.0), Flight::new("UA220", at(9, 45), 100, 1.0)]
    }

    #[test]
    fn test_origin_and_close_ticks() {
        let clock = SimulationClock::new(&flights(), 120, 20).unwrap();

        assert_eq!(clock.origin_time(), at(7, 0));
        assert_eq!(clock.boarding_close_tick(FlightId(0)), 100);
        assert_eq!(clock.boarding_close_tick(FlightId(1)), 145);
        assert_eq!(clock.total_ticks(), 146);
        assert_eq!(clock.arrival_start_tick(FlightId(0)), 0);
        assert_eq!(clock.arrival_start_tick(FlightId(1)), 45);
    }

    #[test]
    fn test_arrival_offset_window() {
        let clock = SimulationClock::new(&flights(), 120, 20).unwrap();

        assert_eq!(clock.arrival_offset(FlightId(1), 44), None);
        assert_eq!(clock.arrival_offset(FlightId(1), 45), Some(0));
        assert_eq!(clock.arrival_offset(FlightId(1), 164), Some(119));
        assert_eq!(clock.arrival_offset(FlightId(1), 165), None);
    }

    #[test]
    fn test_time_at_wraps_midnight() {
        let early = vec![Flight::new("RE1", at(0, 30), 10, 1.0)];
        let clock = SimulationClock::new(&early, 60, 20).unwrap();

        assert_eq!(clock.origin_time(), at(23, 30));
        assert_eq!(clock.time_at(30), at(0, 0));
        assert_eq!(clock.time_at(40), at(0, 10));
        assert_eq!(clock.boarding_close_tick(FlightId(0)), 40);
    }

    #[test]
    fn test_time_at_every_minute_of_two_days() {
        let late = vec![Flight::new("RL1", at(23, 59), 10, 1.0)];
        let clock = SimulationClock::new(&late, 1, 0).unwrap();

        assert_eq!(clock.origin_time(), at(23, 58));
        for tick in 0..2 * 1440u32 {
            let expected = (23 * 60 + 58 + tick) % 1440;
            assert_eq!(clock.time_at(tick), at(expected / 60, expected % 60));
        }
    }

    #[test]
    fn test_buffer_longer_than_span_fails() {
        let result = SimulationClock::new(&flights(), 5, 20);
        assert!(matches!(
            result,
            Err(SimulationError::BoardingClosesBeforeOrigin { close_tick: -15, .. })
        ));
    }

    #[test]
    fn test_empty_flight_list_fails() {
        assert!(SimulationClock::new(&[], 120, 20).is_err());
    }

    #[test]
    fn test_interval_of() {
        let clock = SimulationClock::new(&flights(), 120, 20).unwrap();
        assert_eq!(clock.interval_of(29, 15), 1);
        assert_eq!(clock.interval_of(30, 15), 2);
        assert_eq!(clock.interval_of(7, 0), 7);
    }
}
