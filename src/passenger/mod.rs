//! Passenger records
//!
//! A [`Passenger`] is created when an arrival is injected and carries the
//! timestamps of every stage it completes. Live passengers are owned by the
//! engine's passenger arena and referenced from queues by
//! [`PassengerId`](crate::types::PassengerId); history frames hold value
//! copies.

pub mod passenger;

pub use passenger::*;
