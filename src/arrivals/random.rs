//! Seeded random arrival spread

use super::{bucket_count, ArrivalSchedule};
use crate::flight::Flight;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Places each passenger in a uniformly drawn bucket
///
/// The generator for a flight is seeded from the schedule seed mixed with the
/// flight number, so a flight's plan does not depend on the order in which
/// plans are requested.
#[derive(Debug, Clone, Copy)]
pub struct RandomArrivals {
    seed: u64,
}

impl RandomArrivals {
    /// Create a random schedule with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed this schedule was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng_for(&self, flight: &Flight, granularity: u32) -> StdRng {
        // FNV-1a over the flight number keeps seeds stable across builds
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in flight.flight_number.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        StdRng::seed_from_u64(self.seed ^ hash ^ u64::from(granularity).rotate_left(32))
    }
}

impl ArrivalSchedule for RandomArrivals {
    fn generate(&self, flight: &Flight, span_minutes: u32, granularity: u32) -> Vec<u32> {
        let buckets = bucket_count(span_minutes, granularity);
        let mut plan = vec![0; buckets];
        if buckets == 0 {
            return plan;
        }

        let mut rng = self.rng_for(flight, granularity);
        for _ in 0..flight.expected_passengers() {
            plan[rng.gen_range(0..buckets)] += 1;
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn flight(number: &str) -> Flight {
        Flight::new(number, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 120, 0.9)
    }

    #[test]
    fn test_same_seed_same_plan() {
        let a = RandomArrivals::new(42).generate(&flight("AA100"), 60, 1);
        let b = RandomArrivals::new(42).generate(&flight("AA100"), 60, 1);
        assert_eq!(a, b);
        assert_eq!(a.iter().sum::<u32>(), 108);
    }

    #[test]
    fn test_flights_get_independent_plans() {
        let schedule = RandomArrivals::new(42);
        let a = schedule.generate(&flight("AA100"), 60, 1);
        let b = schedule.generate(&flight("UA220"), 60, 1);
        assert_ne!(a, b);
    }
}
