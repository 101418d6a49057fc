//! Flight definitions
//!
//! A [`Flight`] is an immutable description of one scheduled departure: its
//! number, departure time of day, seat count and expected load factor. The
//! engine derives arrival windows and boarding-close ticks from these values.

pub mod flight;
pub mod time_format;

pub use flight::*;
