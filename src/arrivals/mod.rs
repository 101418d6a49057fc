//! Arrival schedules: how a flight's passengers spread over the arrival span
//!
//! The engine only relies on the [`ArrivalSchedule`] contract: one count per
//! unit of granularity across the span, summing to the flight's expected
//! passengers. Three policies ship with the crate:
//!
//! - [`UniformArrivals`]: an even split, remainder to the earliest buckets
//! - [`PeakedArrivals`]: a triangular profile peaking part-way through the span
//! - [`RandomArrivals`]: each passenger lands in a bucket drawn from a seeded RNG
//!
//! All three are deterministic for a given flight (and seed, for the random
//! policy), so two runs over the same configuration produce the same history.
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::arrivals::*;
//! use airport_departure_sim::flight::Flight;
//! use chrono::NaiveTime;
//!
//! let flight = Flight::new("AA100", NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 10, 1.0);
//! let plan = UniformArrivals.generate(&flight, 4, 1);
//! assert_eq!(plan, vec![3, 3, 2, 2]);
//! ```

pub mod peaked;
pub mod random;
pub mod schedule;
pub mod uniform;

pub use peaked::*;
pub use random::*;
pub use schedule::*;
pub use uniform::*;
