//! Ticket counter configuration and flight eligibility

use crate::flight::Flight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which flights a ticket counter will check in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityRule {
    /// The counter serves every flight
    AllFlights,
    /// The counter serves only the listed flight numbers
    Flights(BTreeSet<String>),
}

impl EligibilityRule {
    /// Build a rule accepting exactly the given flight numbers
    pub fn flights<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Flights(numbers.into_iter().map(Into::into).collect())
    }

    /// Whether this rule accepts the given flight
    pub fn accepts(&self, flight: &Flight) -> bool {
        match self {
            EligibilityRule::AllFlights => true,
            EligibilityRule::Flights(numbers) => numbers.contains(&flight.flight_number),
        }
    }
}

impl Default for EligibilityRule {
    fn default() -> Self {
        Self::AllFlights
    }
}

/// Configuration of one ticket counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Passengers checked in per tick; fractional rates carry over between ticks
    pub rate: f64,
    /// Flights this counter accepts
    #[serde(default)]
    pub eligibility: EligibilityRule,
}

impl CounterConfig {
    /// Create a counter configuration
    pub fn new(rate: f64, eligibility: EligibilityRule) -> Self {
        Self { rate, eligibility }
    }

    /// Whether this counter accepts passengers of the given flight
    pub fn accepts(&self, flight: &Flight) -> bool {
        self.eligibility.accepts(flight)
    }
}

/// Indices of the counters that may serve `flight`
///
/// When no counter declares the flight eligible, every counter is returned.
/// Indices are in ascending order.
pub fn eligible_counters(counters: &[CounterConfig], flight: &Flight) -> Vec<usize> {
    let accepting: Vec<usize> = counters
        .iter()
        .enumerate()
        .filter(|(_, counter)| counter.accepts(flight))
        .map(|(index, _)| index)
        .collect();

    if accepting.is_empty() {
        (0..counters.len()).collect()
    } else {
        accepting
    }
}
