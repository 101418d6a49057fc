//! Airport service facilities
//!
//! This module models the servers passengers queue for: ticket counters with
//! their flight eligibility rules, and the generic [`ServiceStation`] used for
//! both ticket counters and security checkpoint servers.
//!
//! # Overview
//!
//! - **CounterConfig**: service rate and [`EligibilityRule`] for one counter
//! - **ServiceStation**: a FIFO line, a completed log and a fractional
//!   progress accumulator that turns a per-tick rate into whole services
//! - **shortest_line**: the shared routing rule (shortest line, lowest index
//!   on ties)
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::facility::*;
//! use airport_departure_sim::types::PassengerId;
//!
//! let mut station = ServiceStation::new(0.5);
//! station.enqueue(PassengerId(0));
//! station.enqueue(PassengerId(1));
//!
//! // Half a passenger per tick: nothing on the first tick, one on the second
//! assert!(station.serve().is_empty());
//! assert_eq!(station.serve(), vec![PassengerId(0)]);
//! ```

pub mod counter;
pub mod station;

pub use counter::*;
pub use station::*;
