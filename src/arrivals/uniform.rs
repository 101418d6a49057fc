//! Even arrival spread

use super::{bucket_count, ArrivalSchedule};
use crate::flight::Flight;

/// Spreads passengers evenly; leftover passengers go to the earliest buckets
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformArrivals;

impl ArrivalSchedule for UniformArrivals {
    fn generate(&self, flight: &Flight, span_minutes: u32, granularity: u32) -> Vec<u32> {
        let buckets = bucket_count(span_minutes, granularity);
        if buckets == 0 {
            return Vec::new();
        }

        let total = flight.expected_passengers();
        let base = total / buckets as u32;
        let remainder = (total % buckets as u32) as usize;

        (0..buckets).map(|i| if i < remainder { base + 1 } else { base }).collect()
    }
}
