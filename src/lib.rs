//! Airport Departure Simulator
//!
//! A tick-driven model of passengers moving from the terminal entrance through
//! ticket counters, the security checkpoint and into per-flight hold rooms,
//! used to study queue backlog and how many passengers make their flight
//! before boarding closes.
//!
//! # Overview
//!
//! Each tick is one minute. Passengers arrive according to an arrival
//! schedule, check in at a counter or online, queue for security and walk to
//! their gate. When a flight's boarding closes, everyone on it who has not yet
//! cleared security misses the flight and is purged from the lines.
//!
//! ## Key Features
//!
//! - **Fractional service rates**: a counter serving 0.5 passengers per minute
//!   serves one passenger every other minute
//! - **Delayed transfers**: configurable walking time between stages
//! - **Counter eligibility**: counters can be dedicated to specific flights
//! - **History frames**: owned snapshots of every line after every tick
//! - **Pluggable arrivals**: uniform, peaked or seeded random arrival plans
//!
//! ## Quick Start
//!
//! ```rust
//! use airport_departure_sim::*;
//!
//! let config = SimulationConfig {
//!     checkpoint_count: 3,
//!     ..Default::default()
//! };
//!
//! let mut engine = SimulationEngine::from_config(&config)?;
//! engine.run_to_completion();
//!
//! for outcome in engine.statistics().flights {
//!     println!("{}", outcome.made_flight_line());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: identifiers, enums and configuration
//! - [`flight`]: the flight entity
//! - [`passenger`]: the passenger record and its stage timestamps
//! - [`facility`]: counters, checkpoints and line selection
//! - [`arrivals`]: arrival schedules
//! - [`simulation`]: the engine, history, statistics, errors and logging
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod arrivals;
pub mod facility;
pub mod flight;
pub mod passenger;
pub mod simulation;

pub mod types;

// Core types and identifiers
pub use types::{
    // Enums
    CheckInMethod,
    // Configuration
    ConfigValidationError,
    FlightId,
    OutputFormat,
    // Identifiers
    PassengerId,
    PassengerStage,
    RunId,
    SimulationConfig,
};

pub use arrivals::{ArrivalPolicy, ArrivalSchedule};
pub use facility::{CounterConfig, EligibilityRule, ServiceStation};
pub use flight::Flight;
pub use passenger::{Passenger, Tick};

// Simulation types and functionality
pub use simulation::{
    EngineParams, FlightOutcome, History, HistoryFrame, LoggingConfig, RunStatistics,
    SimulationClock, SimulationEngine, SimulationError, SimulationResult,
};
