//! Error types and handling
//!
//! The engine raises no errors once it is built: empty lines, missing
//! arrivals and advancing past the end of the run are all no-ops. Everything
//! here is about refusing to build an engine from inputs that cannot produce a
//! meaningful run.

use crate::types::ConfigValidationError;
use thiserror::Error;

/// Errors that can occur while setting up or reporting on a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    InvalidConfiguration(#[from] ConfigValidationError),

    /// Configuration problem without a dedicated variant
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A flight's boarding closes before the global time origin
    #[error("Flight {flight} closes boarding at tick {close_tick}, before the simulation origin")]
    BoardingClosesBeforeOrigin {
        /// Flight number
        flight: String,
        /// Close tick relative to the origin (negative)
        close_tick: i64,
    },

    /// The arrival schedule returned the wrong number of buckets
    #[error("Arrival plan for {flight} has {actual} buckets at {granularity}-minute granularity, expected {expected}")]
    ArrivalPlanLength {
        /// Flight number
        flight: String,
        /// Requested granularity in minutes
        granularity: u32,
        /// Expected bucket count
        expected: usize,
        /// Bucket count returned by the schedule
        actual: usize,
    },

    /// The arrival schedule's counts do not add up to the expected passengers
    #[error("Arrival plan for {flight} totals {actual} passengers, expected {expected}")]
    ArrivalPlanTotal {
        /// Flight number
        flight: String,
        /// Expected passengers for the flight
        expected: u32,
        /// Sum of the returned plan
        actual: u32,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Construction errors are not: the same inputs fail the same way.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::InvalidConfiguration(_) => false,
            SimulationError::ConfigurationError(_) => false,
            SimulationError::BoardingClosesBeforeOrigin { .. } => false,
            SimulationError::ArrivalPlanLength { .. } => false,
            SimulationError::ArrivalPlanTotal { .. } => false,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::InvalidConfiguration(_) => "Configuration",
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::BoardingClosesBeforeOrigin { .. } => "Schedule",
            SimulationError::ArrivalPlanLength { .. } => "Arrival Schedule",
            SimulationError::ArrivalPlanTotal { .. } => "Arrival Schedule",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = SimulationError::configuration_error("bad");
        assert_eq!(err.category(), "Configuration");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Configuration error: bad");

        let err = SimulationError::BoardingClosesBeforeOrigin {
            flight: "AA100".to_string(),
            close_tick: -15,
        };
        assert_eq!(err.category(), "Schedule");
        assert!(err.to_string().contains("AA100"));
        assert!(err.to_string().contains("-15"));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: SimulationError = ConfigValidationError::NoFlights.into();
        assert!(matches!(err, SimulationError::InvalidConfiguration(ConfigValidationError::NoFlights)));
        assert_eq!(err.to_string(), "Configuration validation failed: At least one flight is required");
    }

    #[test]
    fn test_io_errors_are_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimulationError = io.into();
        assert!(err.is_recoverable());
        assert_eq!(err.category(), "IO");

        let err = SimulationError::ArrivalPlanTotal { flight: "UA1".into(), expected: 10, actual: 9 };
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), "Arrival Schedule");
    }
}
