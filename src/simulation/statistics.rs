//! Run statistics and reporting
//!
//! Statistics are computed from the engine on demand rather than tracked
//! incrementally, so they always agree with the live state.

use super::{SimulationEngine, SimulationResult};
use crate::flight::{time_format, Flight};
use crate::passenger::{Passenger, Tick};
use crate::types::RunId;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outcome counts for one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOutcome {
    /// Flight number
    pub flight_number: String,
    /// Scheduled departure
    #[serde(with = "time_format")]
    pub departure_time: NaiveTime,
    /// Tick at which boarding closes
    pub boarding_close_tick: Tick,
    /// Time of day at which boarding closes
    #[serde(with = "time_format")]
    pub boarding_close_time: NaiveTime,
    /// Passengers expected from seats and fill fraction
    pub expected: u32,
    /// Passengers who have arrived so far
    pub arrived: usize,
    /// Passengers seated in the hold room
    pub boarded: usize,
    /// Passengers who missed the flight
    pub missed: usize,
    /// Passengers still in a line or walking between stages
    pub in_process: usize,
}

impl FlightOutcome {
    pub(crate) fn new(flight: &Flight, boarding_close_tick: Tick, boarding_close_time: NaiveTime) -> Self {
        Self {
            flight_number: flight.flight_number.clone(),
            departure_time: flight.departure_time,
            boarding_close_tick,
            boarding_close_time,
            expected: flight.expected_passengers(),
            arrived: 0,
            boarded: 0,
            missed: 0,
            in_process: 0,
        }
    }

    pub(crate) fn record(&mut self, passenger: &Passenger) {
        self.arrived += 1;
        if passenger.missed {
            self.missed += 1;
        } else if passenger.boarded() {
            self.boarded += 1;
        } else {
            self.in_process += 1;
        }
    }

    /// Closure announcement line
    pub fn made_flight_line(&self) -> String {
        format!("{}: {} of {} made their flight.", self.flight_number, self.boarded, self.expected)
    }

    /// Share of expected passengers who boarded
    pub fn boarded_percentage(&self) -> f64 {
        percentage(self.boarded, self.expected as usize)
    }
}

/// Aggregate statistics for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Engine instance the statistics were taken from
    pub run_id: RunId,
    /// Time of day at tick zero
    #[serde(with = "time_format")]
    pub origin_time: NaiveTime,
    /// Ticks executed
    pub ticks_run: Tick,
    /// Ticks in a full run
    pub total_ticks: Tick,
    /// Passengers expected across all flights
    pub expected_passengers: u32,
    /// Passengers who have arrived
    pub arrived: usize,
    /// Passengers seated in hold rooms
    pub boarded: usize,
    /// Passengers who missed their flight
    pub missed: usize,
    /// Passengers still in a line or walking between stages
    pub in_process: usize,
    /// Largest combined ticket and checkpoint backlog
    pub peak_backlog: usize,
    /// Tick at which the peak backlog was recorded
    pub peak_backlog_tick: Tick,
    /// Per-flight outcomes, in flight order
    pub flights: Vec<FlightOutcome>,
}

impl RunStatistics {
    /// Take statistics from the engine's current state
    pub fn from_engine(engine: &SimulationEngine) -> Self {
        let flights: Vec<FlightOutcome> = (0..engine.flights().len())
            .filter_map(|index| engine.flight_outcome(crate::types::FlightId(index)))
            .collect();

        // Earliest tick wins on ties
        let (peak_backlog_tick, peak_backlog) = engine
            .backlog_by_tick()
            .iter()
            .fold((0, 0), |best, (&tick, &queued)| if queued > best.1 { (tick, queued) } else { best });

        Self {
            run_id: engine.run_id(),
            origin_time: engine.clock().origin_time(),
            ticks_run: engine.current_tick(),
            total_ticks: engine.total_ticks(),
            expected_passengers: flights.iter().map(|f| f.expected).sum(),
            arrived: flights.iter().map(|f| f.arrived).sum(),
            boarded: flights.iter().map(|f| f.boarded).sum(),
            missed: flights.iter().map(|f| f.missed).sum(),
            in_process: flights.iter().map(|f| f.in_process).sum(),
            peak_backlog,
            peak_backlog_tick,
            flights,
        }
    }

    /// Share of arrived passengers who boarded
    pub fn boarded_percentage(&self) -> f64 {
        percentage(self.boarded, self.arrived)
    }

    /// Share of arrived passengers who missed their flight
    pub fn missed_percentage(&self) -> f64 {
        percentage(self.missed, self.arrived)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> SimulationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generate a comprehensive summary report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Departure Simulation Summary Report ===\n\n");
        report.push_str(&format!("Run: {}\n", self.run_id));
        report.push_str(&format!(
            "Ticks: {} of {} (from {})\n\n",
            self.ticks_run,
            self.total_ticks,
            self.origin_time.format("%H:%M")
        ));

        report.push_str("Passenger Flow:\n");
        report.push_str(&format!("  • Expected: {}\n", self.expected_passengers));
        report.push_str(&format!("  • Arrived: {}\n", self.arrived));
        report.push_str(&format!(
            "  • Boarded: {} ({:.1}%)\n",
            self.boarded,
            self.boarded_percentage()
        ));
        report.push_str(&format!("  • Missed: {} ({:.1}%)\n", self.missed, self.missed_percentage()));
        report.push_str(&format!("  • Still in process: {}\n\n", self.in_process));

        report.push_str(&format!(
            "Peak Backlog: {} passengers at tick {}\n\n",
            self.peak_backlog, self.peak_backlog_tick
        ));

        report.push_str("Flights:\n");
        for flight in &self.flights {
            report.push_str(&format!(
                "  • {} departs {} (boarding closes {}): {} of {} boarded, {} missed\n",
                flight.flight_number,
                flight.departure_time.format("%H:%M"),
                flight.boarding_close_time.format("%H:%M"),
                flight.boarded,
                flight.expected,
                flight.missed
            ));
        }

        report
    }

    /// One-line summary suitable for logging
    pub fn generate_compact_summary(&self) -> String {
        format!(
            "Departures: {} flights, {} ticks, {} arrived ({} boarded, {} missed, {} in process), peak backlog {}",
            self.flights.len(),
            self.ticks_run,
            self.arrived,
            self.boarded,
            self.missed,
            self.in_process,
            self.peak_backlog
        )
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}

/// Queued passengers at one tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogPoint {
    /// Tick index the value is keyed by
    pub tick: Tick,
    /// Time of day of that tick
    #[serde(with = "time_format")]
    pub time: NaiveTime,
    /// Passengers waiting in ticket and checkpoint lines
    pub queued: usize,
}

/// The engine's backlog series with wall-clock times attached
pub fn backlog_series(engine: &SimulationEngine) -> Vec<BacklogPoint> {
    engine
        .backlog_by_tick()
        .iter()
        .map(|(&tick, &queued)| BacklogPoint { tick, time: engine.time_at(tick), queued })
        .collect()
}

/// Write the backlog series to `path` as a JSON array
pub fn write_backlog_json<P: AsRef<Path>>(engine: &SimulationEngine, path: P) -> SimulationResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &backlog_series(engine))?;
    writer.flush()?;
    Ok(())
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
