//! Core types and identifiers for the departure simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: sequential passenger and flight ids, random run ids
//! - **Enums**: check-in method, passenger stage, report format
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::types::*;
//!
//! let passenger = PassengerId(12);
//! assert_eq!(passenger.to_string(), "PAX_000012");
//!
//! let config = SimulationConfig {
//!     checkpoint_count: 4,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
