//! Configuration structures for the departure simulator
//!
//! This module contains the simulation configuration structure, CLI arguments,
//! file loading and validation logic used to set up a simulation run.

use super::OutputFormat;
use crate::arrivals::ArrivalPolicy;
use crate::facility::{CounterConfig, EligibilityRule};
use crate::flight::Flight;
use chrono::NaiveTime;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Boarding configuration constants
pub mod boarding {
    /// Minutes before departure at which boarding closes
    pub const DEFAULT_CLOSE_BUFFER_MINUTES: u32 = 20;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "airport-departure-sim",
    version = "0.1.0",
    about = "Airport Departure Simulator - Models passenger flow from check-in to the gate",
    long_about = "Simulates passengers moving through ticket counters, the security checkpoint and per-flight hold rooms minute by minute, reporting queue backlog and how many passengers make their flight before boarding closes.

EXAMPLES:
    # Run with the built-in sample schedule
    airport-departure-sim

    # Use a configuration file
    airport-departure-sim --config airport.json

    # Override specific settings
    airport-departure-sim --config airport.json --checkpoint-count 4 --transit-delay 3

    # Generate configuration template
    airport-departure-sim --print-config > my-airport.json

    # Validate configuration without running
    airport-departure-sim --config my-airport.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Fraction of passengers who check in at a counter (0.0-1.0)
    #[arg(long, help = "Fraction of passengers checking in at a counter (0.0-1.0)")]
    pub in_person_fraction: Option<f64>,

    /// Number of security checkpoint servers
    #[arg(long, help = "Number of security checkpoint servers")]
    pub checkpoint_count: Option<usize>,

    /// Passengers screened per minute by each checkpoint server
    #[arg(long, help = "Passengers screened per minute per checkpoint")]
    pub checkpoint_rate: Option<f64>,

    /// Minutes before departure that passengers start arriving
    #[arg(long, help = "Arrival span in minutes before departure")]
    pub arrival_span: Option<u32>,

    /// Reporting interval length in minutes
    #[arg(long, help = "Reporting interval length in minutes")]
    pub interval: Option<u32>,

    /// Walking time from ticket counter to checkpoint
    #[arg(long, help = "Minutes from ticket counter to checkpoint")]
    pub transit_delay: Option<u32>,

    /// Walking time from checkpoint to hold room
    #[arg(long, help = "Minutes from checkpoint to hold room")]
    pub hold_delay: Option<u32>,

    /// Minutes before departure at which boarding closes
    #[arg(long, help = "Minutes before departure at which boarding closes")]
    pub boarding_close_buffer: Option<u32>,

    /// Arrival distribution policy
    #[arg(
        long,
        help = "Arrival policy (uniform, peaked or random)",
        long_help = "How each flight's passengers are spread across the arrival span. Supported: uniform, peaked, random. Default: uniform"
    )]
    pub arrival_policy: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Output format for the run report
    #[arg(long, help = "Report format (text or json)")]
    pub output_format: Option<String>,

    /// Output path for the backlog-by-minute series
    #[arg(long, help = "Write the backlog series as JSON to this path")]
    pub backlog_output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Fraction of passengers who check in at a counter
    pub in_person_fraction: Option<f64>,
    /// Ticket counters in line order
    pub counters: Option<Vec<CounterConfig>>,
    /// Number of security checkpoint servers
    pub checkpoint_count: Option<usize>,
    /// Passengers screened per minute by each checkpoint server
    pub checkpoint_rate: Option<f64>,
    /// Minutes before departure that passengers start arriving
    pub arrival_span_minutes: Option<u32>,
    /// Reporting interval length in minutes
    pub interval_minutes: Option<u32>,
    /// Minutes from ticket counter to checkpoint
    pub transit_delay_minutes: Option<u32>,
    /// Minutes from checkpoint to hold room
    pub hold_delay_minutes: Option<u32>,
    /// Minutes before departure at which boarding closes
    pub boarding_close_buffer_minutes: Option<u32>,
    /// Flights to simulate
    pub flights: Option<Vec<Flight>>,
    /// Arrival distribution policy
    pub arrival_policy: Option<ArrivalPolicy>,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Output format for the run report
    pub output_format: Option<OutputFormat>,
    /// Output path for the backlog series
    pub backlog_output: Option<String>,
}

/// Configuration for one departure simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fraction of passengers who check in at a counter (0.0-1.0)
    pub in_person_fraction: f64,

    /// Ticket counters in line order
    pub counters: Vec<CounterConfig>,

    /// Number of security checkpoint servers
    pub checkpoint_count: usize,

    /// Passengers screened per minute by each checkpoint server
    pub checkpoint_rate: f64,

    /// Minutes before departure that passengers start arriving
    pub arrival_span_minutes: u32,

    /// Reporting interval length in minutes
    pub interval_minutes: u32,

    /// Minutes from ticket counter to checkpoint
    pub transit_delay_minutes: u32,

    /// Minutes from checkpoint to hold room
    pub hold_delay_minutes: u32,

    /// Minutes before departure at which boarding closes
    pub boarding_close_buffer_minutes: u32,

    /// Flights to simulate
    pub flights: Vec<Flight>,

    /// Arrival distribution policy
    pub arrival_policy: ArrivalPolicy,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Output format for the run report
    pub output_format: OutputFormat,

    /// Output path for the backlog series
    pub backlog_output: Option<String>,
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// A CLI value could not be interpreted
    #[error("Invalid value for --{flag}: {message}")]
    InvalidArgument {
        /// Name of the offending flag
        flag: String,
        /// Why the value was rejected
        message: String,
    },
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// No flights were configured
    #[error("At least one flight is required")]
    NoFlights,

    /// Two flights share a flight number
    #[error("Duplicate flight number: {0}")]
    DuplicateFlightNumber(String),

    /// A flight has no seats
    #[error("Flight {0} must have at least one seat")]
    InvalidSeatCount(String),

    /// No ticket counters were configured
    #[error("At least one ticket counter is required")]
    NoCounters,

    /// Checkpoint count is invalid
    #[error("Checkpoint count must be greater than 0, got {0}")]
    InvalidCheckpointCount(usize),

    /// A service rate is negative or not finite
    #[error("Invalid service rate for {field}: {value} (must be a finite value >= 0)")]
    InvalidRate {
        /// Name of the field with the invalid rate
        field: String,
        /// The invalid rate value
        value: f64,
    },

    /// Fraction value is out of range
    #[error("Invalid fraction for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidFraction {
        /// Name of the field with the invalid fraction
        field: String,
        /// The invalid fraction value
        value: f64,
    },

    /// Arrival span is zero
    #[error("Arrival span must be greater than 0 minutes")]
    InvalidArrivalSpan,

    /// Interval length is zero
    #[error("Interval length must be greater than 0 minutes")]
    InvalidInterval,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            in_person_fraction: 0.4,
            counters: vec![
                CounterConfig::new(0.8, EligibilityRule::AllFlights),
                CounterConfig::new(0.8, EligibilityRule::AllFlights),
                CounterConfig::new(0.5, EligibilityRule::flights(["AA100"])),
            ],
            checkpoint_count: 2,
            checkpoint_rate: 1.5,
            arrival_span_minutes: 120,
            interval_minutes: 1,
            transit_delay_minutes: 2,
            hold_delay_minutes: 5,
            boarding_close_buffer_minutes: boarding::DEFAULT_CLOSE_BUFFER_MINUTES,
            flights: vec![
                Flight::new("AA100", sample_time(9, 0), 180, 0.85),
                Flight::new("UA220", sample_time(9, 45), 150, 0.9),
                Flight::new("DL310", sample_time(10, 30), 200, 0.75),
            ],
            arrival_policy: ArrivalPolicy::Uniform,
            seed: None,
            output_format: OutputFormat::Text,
            backlog_output: None,
        }
    }
}

fn sample_time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl SimulationConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over file settings
        Self::apply_cli_overrides(&mut config, args)?;

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            in_person_fraction: config_file
                .in_person_fraction
                .unwrap_or(defaults.in_person_fraction),
            counters: config_file.counters.unwrap_or(defaults.counters),
            checkpoint_count: config_file.checkpoint_count.unwrap_or(defaults.checkpoint_count),
            checkpoint_rate: config_file.checkpoint_rate.unwrap_or(defaults.checkpoint_rate),
            arrival_span_minutes: config_file
                .arrival_span_minutes
                .unwrap_or(defaults.arrival_span_minutes),
            interval_minutes: config_file.interval_minutes.unwrap_or(defaults.interval_minutes),
            transit_delay_minutes: config_file
                .transit_delay_minutes
                .unwrap_or(defaults.transit_delay_minutes),
            hold_delay_minutes: config_file
                .hold_delay_minutes
                .unwrap_or(defaults.hold_delay_minutes),
            boarding_close_buffer_minutes: config_file
                .boarding_close_buffer_minutes
                .unwrap_or(defaults.boarding_close_buffer_minutes),
            flights: config_file.flights.unwrap_or(defaults.flights),
            arrival_policy: config_file.arrival_policy.unwrap_or(defaults.arrival_policy),
            seed: config_file.seed.or(defaults.seed),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            backlog_output: config_file.backlog_output.or(defaults.backlog_output),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) -> Result<(), ConfigError> {
        if let Some(value) = args.in_person_fraction {
            config.in_person_fraction = value;
        }
        if let Some(value) = args.checkpoint_count {
            config.checkpoint_count = value;
        }
        if let Some(value) = args.checkpoint_rate {
            config.checkpoint_rate = value;
        }
        if let Some(value) = args.arrival_span {
            config.arrival_span_minutes = value;
        }
        if let Some(value) = args.interval {
            config.interval_minutes = value;
        }
        if let Some(value) = args.transit_delay {
            config.transit_delay_minutes = value;
        }
        if let Some(value) = args.hold_delay {
            config.hold_delay_minutes = value;
        }
        if let Some(value) = args.boarding_close_buffer {
            config.boarding_close_buffer_minutes = value;
        }
        if let Some(value) = args.arrival_policy {
            config.arrival_policy = value.parse().map_err(|message| ConfigError::InvalidArgument {
                flag: "arrival-policy".to_string(),
                message,
            })?;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.output_format {
            config.output_format = value.parse().map_err(|message| ConfigError::InvalidArgument {
                flag: "output-format".to_string(),
                message,
            })?;
        }
        if let Some(value) = args.backlog_output {
            config.backlog_output = Some(value);
        }
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_fraction("in_person_fraction", self.in_person_fraction)?;

        if self.counters.is_empty() {
            return Err(ConfigValidationError::NoCounters);
        }
        for (index, counter) in self.counters.iter().enumerate() {
            validate_rate(&format!("counters[{}].rate", index), counter.rate)?;
        }

        if self.checkpoint_count == 0 {
            return Err(ConfigValidationError::InvalidCheckpointCount(self.checkpoint_count));
        }
        validate_rate("checkpoint_rate", self.checkpoint_rate)?;

        if self.arrival_span_minutes == 0 {
            return Err(ConfigValidationError::InvalidArrivalSpan);
        }
        if self.interval_minutes == 0 {
            return Err(ConfigValidationError::InvalidInterval);
        }

        validate_flights(&self.flights)
    }

    /// Total number of seats across all configured flights
    pub fn total_seats(&self) -> u32 {
        self.flights.iter().map(|flight| flight.seats).sum()
    }

    /// Expected number of passengers across all configured flights
    pub fn expected_passengers(&self) -> u32 {
        self.flights.iter().map(Flight::expected_passengers).sum()
    }
}

/// Check that a value lies in `[0, 1]`
pub(crate) fn validate_fraction(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigValidationError::InvalidFraction { field: field.to_string(), value });
    }
    Ok(())
}

/// Check that a service rate is finite and non-negative
pub(crate) fn validate_rate(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigValidationError::InvalidRate { field: field.to_string(), value });
    }
    Ok(())
}

/// Check the flight list: non-empty, unique numbers, seats and fill in range
pub(crate) fn validate_flights(flights: &[Flight]) -> Result<(), ConfigValidationError> {
    if flights.is_empty() {
        return Err(ConfigValidationError::NoFlights);
    }

    let mut seen = HashSet::new();
    for flight in flights {
        if !seen.insert(flight.flight_number.as_str()) {
            return Err(ConfigValidationError::DuplicateFlightNumber(flight.flight_number.clone()));
        }
        if flight.seats == 0 {
            return Err(ConfigValidationError::InvalidSeatCount(flight.flight_number.clone()));
        }
        validate_fraction(&format!("{}.fill_fraction", flight.flight_number), flight.fill_fraction)?;
    }
    Ok(())
}
