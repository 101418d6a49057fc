//! The departure simulation engine and its supporting pieces
//!
//! # Overview
//!
//! - **SimulationEngine**: owns every line, log and pending transfer and
//!   advances them one tick at a time
//! - **SimulationClock**: time origin, per-flight close ticks, total ticks
//! - **History**: per-tick frames of owned passenger snapshots
//! - **RunStatistics**: per-flight and aggregate outcome counts and reports
//! - **SimulationError**: construction failures
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::simulation::*;
//! use airport_departure_sim::types::SimulationConfig;
//!
//! let config = SimulationConfig::default();
//! let mut engine = SimulationEngine::from_config(&config).unwrap();
//! engine.run_to_completion();
//!
//! assert!(engine.is_finished());
//! assert_eq!(engine.history().len(), engine.total_ticks() as usize);
//! let stats = engine.statistics();
//! assert_eq!(stats.arrived, stats.boarded + stats.missed + stats.in_process);
//! ```

pub mod clock;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
mod state;
pub mod statistics;

// Re-export all public types for convenience
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use history::*;
pub use logging::*;
pub use statistics::*;

pub(crate) use state::EngineState;
