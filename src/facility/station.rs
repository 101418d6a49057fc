//! Service stations: a queue, a completed log and a progress accumulator
//!
//! Both ticket counters and checkpoint servers are modelled as a
//! [`ServiceStation`]. A station's rate is added to its progress accumulator
//! every tick; the whole part of the accumulator is the number of passengers
//! served that tick and the fractional part carries over, so a rate of 0.5
//! serves one passenger every second tick.

use crate::types::PassengerId;
use std::collections::VecDeque;

/// One server with its waiting line and completed log
#[derive(Debug, Clone)]
pub struct ServiceStation {
    rate: f64,
    line: VecDeque<PassengerId>,
    completed: Vec<PassengerId>,
    progress: f64,
}

impl ServiceStation {
    /// Create an idle station serving `rate` passengers per tick
    pub fn new(rate: f64) -> Self {
        Self { rate, line: VecDeque::new(), completed: Vec::new(), progress: 0.0 }
    }

    /// Passengers served per tick
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Waiting passengers, head first
    pub fn line(&self) -> &VecDeque<PassengerId> {
        &self.line
    }

    /// Number of waiting passengers
    pub fn line_len(&self) -> usize {
        self.line.len()
    }

    /// Passengers this station has finished with, in completion order
    pub fn completed(&self) -> &[PassengerId] {
        &self.completed
    }

    /// Fractional progress carried into the next tick, in `[0, 1)`
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Append a passenger to the back of the line
    pub fn enqueue(&mut self, passenger: PassengerId) {
        self.line.push_back(passenger);
    }

    /// Advance the accumulator by one tick and serve the passengers it allows
    ///
    /// Served passengers are removed from the line, appended to the completed
    /// log and returned in service order. Service capacity that finds the line
    /// empty is lost rather than banked.
    pub fn serve(&mut self) -> Vec<PassengerId> {
        self.progress += self.rate;
        let due = self.progress.floor();
        self.progress -= due;

        let mut served = Vec::new();
        for _ in 0..due as u64 {
            let Some(passenger) = self.line.pop_front() else {
                break;
            };
            self.completed.push(passenger);
            served.push(passenger);
        }
        served
    }

    /// Drop passengers from both the line and the completed log
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(PassengerId) -> bool,
    {
        self.line.retain(|&id| keep(id));
        self.completed.retain(|&id| keep(id));
    }

    /// Drop passengers from the completed log only
    pub fn retain_completed<F>(&mut self, mut keep: F)
    where
        F: FnMut(PassengerId) -> bool,
    {
        self.completed.retain(|&id| keep(id));
    }

    /// Empty the line and log and zero the accumulator
    pub fn reset(&mut self) {
        self.line.clear();
        self.completed.clear();
        self.progress = 0.0;
    }
}

/// Pick the candidate station with the shortest line
///
/// Ties go to the earliest candidate, so with candidates in ascending order the
/// lowest index wins. Returns `None` only when there are no candidates.
pub fn shortest_line<I>(stations: &[ServiceStation], candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut best: Option<usize> = None;
    for index in candidates {
        match best {
            Some(current) if stations[index].line_len() >= stations[current].line_len() => {}
            _ => best = Some(index),
        }
    }
    best
}
