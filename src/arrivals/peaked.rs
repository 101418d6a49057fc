//! Triangular arrival profile
//!
//! Most passengers show up some time before departure rather than evenly
//! across the whole window. The profile rises linearly from the start of the
//! span to the peak and falls linearly to departure.

use super::{apportion, bucket_count, ArrivalSchedule};
use crate::flight::Flight;

/// Triangular arrival profile peaking at a fraction of the span
#[derive(Debug, Clone, Copy)]
pub struct PeakedArrivals {
    peak: f64,
}

impl PeakedArrivals {
    /// Create a profile peaking at `peak` (clamped to `[0, 1]`)
    pub fn new(peak: f64) -> Self {
        let peak = if peak.is_finite() { peak.clamp(0.0, 1.0) } else { super::DEFAULT_PEAK };
        Self { peak }
    }

    /// Position of the peak as a fraction of the span
    pub fn peak(&self) -> f64 {
        self.peak
    }

    fn weight(&self, x: f64) -> f64 {
        if x <= self.peak {
            if self.peak == 0.0 {
                1.0
            } else {
                x / self.peak
            }
        } else if self.peak >= 1.0 {
            1.0
        } else {
            (1.0 - x) / (1.0 - self.peak)
        }
    }
}

impl ArrivalSchedule for PeakedArrivals {
    fn generate(&self, flight: &Flight, span_minutes: u32, granularity: u32) -> Vec<u32> {
        let buckets = bucket_count(span_minutes, granularity);
        let weights: Vec<f64> = (0..buckets)
            .map(|i| self.weight((i as f64 + 0.5) / buckets as f64))
            .collect();
        apportion(flight.expected_passengers(), &weights)
    }
}
