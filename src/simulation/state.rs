//! Mutable run state, kept in one aggregate so a reset cannot miss a field

use super::{History, HistoryFrame};
use crate::facility::{CounterConfig, ServiceStation};
use crate::passenger::{Passenger, Tick};
use crate::types::{CheckInMethod, FlightId, PassengerId};
use std::collections::BTreeMap;

/// Everything that changes while the engine runs
#[derive(Debug, Clone)]
pub(crate) struct EngineState {
    pub(crate) tick: Tick,
    /// Arena of every passenger injected so far, indexed by `PassengerId`
    pub(crate) passengers: Vec<Passenger>,
    pub(crate) counters: Vec<ServiceStation>,
    pub(crate) checkpoints: Vec<ServiceStation>,
    /// Hold room per flight, in boarding order
    pub(crate) hold_rooms: Vec<Vec<PassengerId>>,
    /// Batches due at a checkpoint line, keyed by tick
    pub(crate) pending_checkpoint: BTreeMap<Tick, Vec<PassengerId>>,
    /// Batches due at a hold room, keyed by tick
    pub(crate) pending_hold: BTreeMap<Tick, Vec<PassengerId>>,
    pub(crate) history: History,
    /// Queued passengers after each tick, keyed by the following tick
    pub(crate) backlog: BTreeMap<Tick, usize>,
    pub(crate) just_closed: Vec<FlightId>,
}

impl EngineState {
    pub(crate) fn new(
        counters: &[CounterConfig],
        checkpoint_count: usize,
        checkpoint_rate: f64,
        flight_count: usize,
    ) -> Self {
        Self {
            tick: 0,
            passengers: Vec::new(),
            counters: counters.iter().map(|c| ServiceStation::new(c.rate)).collect(),
            checkpoints: (0..checkpoint_count).map(|_| ServiceStation::new(checkpoint_rate)).collect(),
            hold_rooms: vec![Vec::new(); flight_count],
            pending_checkpoint: BTreeMap::new(),
            pending_hold: BTreeMap::new(),
            history: History::new(),
            backlog: BTreeMap::new(),
            just_closed: Vec::new(),
        }
    }

    /// Return to the pre-run state, keeping station rates and room count
    pub(crate) fn reset(&mut self) {
        self.tick = 0;
        self.passengers.clear();
        self.counters.iter_mut().for_each(ServiceStation::reset);
        self.checkpoints.iter_mut().for_each(ServiceStation::reset);
        self.hold_rooms.iter_mut().for_each(Vec::clear);
        self.pending_checkpoint.clear();
        self.pending_hold.clear();
        self.history.clear();
        self.backlog.clear();
        self.just_closed.clear();
    }

    /// Create a passenger in the arena and return its id
    pub(crate) fn spawn(&mut self, flight: FlightId, tick: Tick, check_in: CheckInMethod) -> PassengerId {
        let id = PassengerId(self.passengers.len() as u64);
        self.passengers.push(Passenger::new(id, flight, tick, check_in));
        id
    }

    pub(crate) fn passenger(&self, id: PassengerId) -> &Passenger {
        &self.passengers[id.index()]
    }

    pub(crate) fn passenger_mut(&mut self, id: PassengerId) -> &mut Passenger {
        &mut self.passengers[id.index()]
    }

    pub(crate) fn record_frame(&mut self) {
        let frame = HistoryFrame::capture(
            self.tick,
            &self.passengers,
            &self.counters,
            &self.checkpoints,
            &self.hold_rooms,
        );
        self.history.push(frame);
    }

    /// Drop missed passengers from every line, completed log and
    /// pending-to-checkpoint batch, and every passenger of a flight that
    /// closed this tick from the completed logs; hold rooms are untouched
    pub(crate) fn purge_missed(&mut self) {
        let passengers = &self.passengers;
        let closed = &self.just_closed;
        let keep = |id: PassengerId| !passengers[id.index()].missed;
        let keep_logged = |id: PassengerId| keep(id) && !closed.contains(&passengers[id.index()].flight);

        for station in self.counters.iter_mut().chain(self.checkpoints.iter_mut()) {
            station.retain(keep);
            station.retain_completed(keep_logged);
        }
        for batch in self.pending_checkpoint.values_mut() {
            batch.retain(|&id| keep(id));
        }
        self.pending_checkpoint.retain(|_, batch| !batch.is_empty());
    }

    /// Passengers waiting in ticket and checkpoint lines
    pub(crate) fn queued(&self) -> usize {
        self.counters.iter().chain(&self.checkpoints).map(ServiceStation::line_len).sum()
    }

    /// Passengers between stages
    pub(crate) fn pending(&self) -> usize {
        self.pending_checkpoint.values().chain(self.pending_hold.values()).map(Vec::len).sum()
    }

    pub(crate) fn seated(&self) -> usize {
        self.hold_rooms.iter().map(Vec::len).sum()
    }

    pub(crate) fn missed(&self) -> usize {
        self.passengers.iter().filter(|p| p.missed).count()
    }
}
