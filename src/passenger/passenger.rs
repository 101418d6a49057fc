//! The passenger record and its stage timestamps

use crate::types::{CheckInMethod, FlightId, PassengerId, PassengerStage};
use serde::{Deserialize, Serialize};

/// Simulation tick index, counted in minutes from the global time origin
pub type Tick = u32;

/// One passenger travelling on one flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Stable identity within the run
    pub id: PassengerId,
    /// The flight this passenger is booked on
    pub flight: FlightId,
    /// Tick at which the passenger entered the airport
    pub arrival_tick: Tick,
    /// Counter or online check-in
    pub check_in: CheckInMethod,
    /// Tick at which a ticket counter finished with the passenger
    pub ticket_completion_tick: Option<Tick>,
    /// Tick at which the passenger joined a checkpoint line
    pub checkpoint_entry_tick: Option<Tick>,
    /// Tick at which security screening finished
    pub checkpoint_completion_tick: Option<Tick>,
    /// Tick at which the passenger sat down in the hold room
    pub hold_room_entry_tick: Option<Tick>,
    /// 1-based boarding order within the flight's hold room
    pub hold_room_sequence: Option<u32>,
    /// Boarding closed before this passenger reached the hold room
    pub missed: bool,
    /// Recently finished at a ticket counter and still walking to security
    pub visible: bool,
}

impl Passenger {
    /// Create a passenger that has just arrived
    pub fn new(id: PassengerId, flight: FlightId, arrival_tick: Tick, check_in: CheckInMethod) -> Self {
        Self {
            id,
            flight,
            arrival_tick,
            check_in,
            ticket_completion_tick: None,
            checkpoint_entry_tick: None,
            checkpoint_completion_tick: None,
            hold_room_entry_tick: None,
            hold_room_sequence: None,
            missed: false,
            visible: false,
        }
    }

    /// Whether the passenger checked in at a counter
    pub fn is_in_person(&self) -> bool {
        self.check_in == CheckInMethod::InPerson
    }

    /// Whether the passenger has cleared security
    pub fn has_cleared_checkpoint(&self) -> bool {
        self.checkpoint_completion_tick.is_some()
    }

    /// Whether the passenger made it to the hold room
    pub fn boarded(&self) -> bool {
        self.hold_room_entry_tick.is_some()
    }

    /// Current stage, derived from the timestamps
    pub fn stage(&self) -> PassengerStage {
        if self.missed {
            PassengerStage::Missed
        } else if self.hold_room_entry_tick.is_some() {
            PassengerStage::HoldRoom
        } else if self.checkpoint_completion_tick.is_some() {
            PassengerStage::ToHoldRoom
        } else if self.checkpoint_entry_tick.is_some() {
            PassengerStage::CheckpointLine
        } else if self.ticket_completion_tick.is_some() {
            PassengerStage::ToCheckpoint
        } else {
            PassengerStage::TicketLine
        }
    }

    /// Minutes from arrival to hold-room entry, if the passenger made it
    pub fn time_to_gate(&self) -> Option<Tick> {
        self.hold_room_entry_tick.map(|entry| entry - self.arrival_tick)
    }

    /// Whether the recorded timestamps are non-decreasing through the stages
    ///
    /// Stages a passenger skipped or has not reached are ignored.
    pub fn timestamps_monotonic(&self) -> bool {
        let stamps = [
            Some(self.arrival_tick),
            self.ticket_completion_tick,
            self.checkpoint_entry_tick,
            self.checkpoint_completion_tick,
            self.hold_room_entry_tick,
        ];
        stamps
            .iter()
            .flatten()
            .zip(stamps.iter().flatten().skip(1))
            .all(|(earlier, later)| earlier <= later)
    }
}
