//! Enumeration types for the departure simulator
//!
//! This module contains the enumerations shared across the simulation: how a
//! passenger checked in, which stage of the departure process a passenger is
//! in, and the report output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a passenger checked in for their flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckInMethod {
    /// Checks in at a ticket counter before security
    InPerson,
    /// Already checked in; goes straight to the security checkpoint
    Online,
}

impl fmt::Display for CheckInMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckInMethod::InPerson => write!(f, "In Person"),
            CheckInMethod::Online => write!(f, "Online"),
        }
    }
}

impl FromStr for CheckInMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in person" | "inperson" | "in-person" | "counter" => Ok(CheckInMethod::InPerson),
            "online" | "web" => Ok(CheckInMethod::Online),
            _ => Err(format!("Unknown check-in method: {}", s)),
        }
    }
}

/// Stage of the departure process a passenger currently occupies
///
/// Derived from the passenger's stage timestamps; see
/// [`Passenger::stage`](crate::passenger::Passenger::stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassengerStage {
    /// Waiting in a ticket counter line
    TicketLine,
    /// Finished at the counter, walking to security
    ToCheckpoint,
    /// Waiting in a security checkpoint line
    CheckpointLine,
    /// Cleared security, walking to the gate
    ToHoldRoom,
    /// Seated in the flight's hold room
    HoldRoom,
    /// Boarding closed before the passenger reached the hold room
    Missed,
}

impl PassengerStage {
    /// Whether the passenger has reached a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, PassengerStage::HoldRoom | PassengerStage::Missed)
    }
}

impl fmt::Display for PassengerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassengerStage::TicketLine => write!(f, "Ticket Line"),
            PassengerStage::ToCheckpoint => write!(f, "To Checkpoint"),
            PassengerStage::CheckpointLine => write!(f, "Checkpoint Line"),
            PassengerStage::ToHoldRoom => write!(f, "To Hold Room"),
            PassengerStage::HoldRoom => write!(f, "Hold Room"),
            PassengerStage::Missed => write!(f, "Missed"),
        }
    }
}

/// Output formats for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text report
    Text,
    /// JSON document
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
