//! The arrival schedule contract and policy selection

use super::{PeakedArrivals, RandomArrivals, UniformArrivals};
use crate::flight::Flight;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Default position of the arrival peak, as a fraction of the span
pub const DEFAULT_PEAK: f64 = 0.6;

/// Produces per-bucket arrival counts for a flight
pub trait ArrivalSchedule: fmt::Debug {
    /// Arrival counts for `flight`, one per `granularity` minutes of the span
    ///
    /// The result has [`bucket_count`]`(span_minutes, granularity)` entries and
    /// sums to [`Flight::expected_passengers`].
    fn generate(&self, flight: &Flight, span_minutes: u32, granularity: u32) -> Vec<u32>;
}

/// Number of buckets a span splits into at the given granularity
///
/// A zero granularity is treated as one minute.
pub fn bucket_count(span_minutes: u32, granularity: u32) -> usize {
    let granularity = granularity.max(1);
    span_minutes.div_ceil(granularity) as usize
}

/// Split `total` into integer shares proportional to `weights`
///
/// Uses the largest-remainder method; equal remainders favour earlier
/// buckets. All-zero weights fall back to an even split.
pub fn apportion(total: u32, weights: &[f64]) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }

    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 || !weight_sum.is_finite() {
        return apportion(total, &vec![1.0; weights.len()]);
    }

    let quotas: Vec<f64> = weights.iter().map(|w| total as f64 * w / weight_sum).collect();
    let mut shares: Vec<u32> = quotas.iter().map(|q| q.floor() as u32).collect();
    let assigned: u32 = shares.iter().sum();

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    for &index in order.iter().cycle().take(total.saturating_sub(assigned) as usize) {
        shares[index] += 1;
    }
    shares
}

/// Arrival distribution policy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArrivalPolicy {
    /// Even spread across the span
    Uniform,
    /// Triangular profile peaking at `peak` (fraction of the span)
    Peaked {
        /// Position of the peak, 0.0 (start of span) to 1.0 (departure)
        peak: f64,
    },
    /// Seeded random spread
    Random,
}

impl ArrivalPolicy {
    /// Build the schedule for this policy
    ///
    /// `seed` only matters for [`ArrivalPolicy::Random`]; without one, a seed
    /// is drawn from entropy and logged so the run can be reproduced.
    pub fn build(&self, seed: Option<u64>) -> Box<dyn ArrivalSchedule> {
        match *self {
            ArrivalPolicy::Uniform => Box::new(UniformArrivals),
            ArrivalPolicy::Peaked { peak } => Box::new(PeakedArrivals::new(peak)),
            ArrivalPolicy::Random => {
                let seed = match seed {
                    Some(seed) => {
                        info!("Using deterministic arrival seed: {}", seed);
                        seed
                    }
                    None => {
                        let seed = rand::thread_rng().gen::<u64>();
                        debug!("Using entropy-based arrival seed: {}", seed);
                        seed
                    }
                };
                Box::new(RandomArrivals::new(seed))
            }
        }
    }
}

impl Default for ArrivalPolicy {
    fn default() -> Self {
        Self::Uniform
    }
}

impl fmt::Display for ArrivalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrivalPolicy::Uniform => write!(f, "uniform"),
            ArrivalPolicy::Peaked { peak } => write!(f, "peaked ({:.0}% of span)", peak * 100.0),
            ArrivalPolicy::Random => write!(f, "random"),
        }
    }
}

impl FromStr for ArrivalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" | "even" => Ok(ArrivalPolicy::Uniform),
            "peaked" | "peak" | "triangular" => Ok(ArrivalPolicy::Peaked { peak: DEFAULT_PEAK }),
            "random" => Ok(ArrivalPolicy::Random),
            _ => Err(format!("Unknown arrival policy: {}", s)),
        }
    }
}
