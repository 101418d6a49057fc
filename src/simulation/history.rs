//! Frame-by-frame history of queue contents
//!
//! Every tick appends one [`HistoryFrame`] holding owned copies of the
//! passengers in each line, so consumers can replay or graph a run without
//! holding references into the live engine.

use crate::facility::ServiceStation;
use crate::passenger::{Passenger, Tick};
use crate::types::PassengerId;
use serde::{Deserialize, Serialize};

/// Snapshot of every line at the end of one tick's transfers
///
/// Captured before missed passengers are purged, so a closing flight's
/// stragglers are still visible in the frame for its close tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFrame {
    /// Tick the frame was captured on
    pub tick: Tick,
    /// Completed log per ticket counter
    pub completed_ticket: Vec<Vec<Passenger>>,
    /// Waiting line per ticket counter
    pub ticket_lines: Vec<Vec<Passenger>>,
    /// Completed log per checkpoint server
    pub completed_checkpoint: Vec<Vec<Passenger>>,
    /// Waiting line per checkpoint server
    pub checkpoint_lines: Vec<Vec<Passenger>>,
    /// Hold room per flight, in boarding order
    pub hold_rooms: Vec<Vec<Passenger>>,
}

impl HistoryFrame {
    pub(crate) fn capture(
        tick: Tick,
        passengers: &[Passenger],
        counters: &[ServiceStation],
        checkpoints: &[ServiceStation],
        hold_rooms: &[Vec<PassengerId>],
    ) -> Self {
        Self {
            tick,
            completed_ticket: counters.iter().map(|s| copy_all(passengers, s.completed())).collect(),
            ticket_lines: counters.iter().map(|s| copy_all(passengers, s.line())).collect(),
            completed_checkpoint: checkpoints
                .iter()
                .map(|s| copy_all(passengers, s.completed()))
                .collect(),
            checkpoint_lines: checkpoints.iter().map(|s| copy_all(passengers, s.line())).collect(),
            hold_rooms: hold_rooms.iter().map(|room| copy_all(passengers, room)).collect(),
        }
    }

    /// Passengers waiting in ticket and checkpoint lines in this frame
    pub fn queued(&self) -> usize {
        self.ticket_lines.iter().chain(&self.checkpoint_lines).map(Vec::len).sum()
    }

    /// Passengers seated in hold rooms in this frame
    pub fn seated(&self) -> usize {
        self.hold_rooms.iter().map(Vec::len).sum()
    }
}

fn copy_all<'a>(
    passengers: &[Passenger],
    ids: impl IntoIterator<Item = &'a PassengerId>,
) -> Vec<Passenger> {
    ids.into_iter().map(|id| passengers[id.index()].clone()).collect()
}

/// Ordered sequence of frames, one per executed tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    frames: Vec<HistoryFrame>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, frame: HistoryFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    /// All frames in tick order
    pub fn frames(&self) -> &[HistoryFrame] {
        &self.frames
    }

    /// Frame captured on `tick`
    pub fn frame(&self, tick: Tick) -> Option<&HistoryFrame> {
        self.frames.get(tick as usize)
    }

    /// Most recent frame
    pub fn latest(&self) -> Option<&HistoryFrame> {
        self.frames.last()
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no tick has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Completed ticket logs, one entry per tick
    pub fn completed_ticket_lines(&self) -> Vec<&[Vec<Passenger>]> {
        self.frames.iter().map(|f| f.completed_ticket.as_slice()).collect()
    }

    /// Ticket lines, one entry per tick
    pub fn ticket_lines(&self) -> Vec<&[Vec<Passenger>]> {
        self.frames.iter().map(|f| f.ticket_lines.as_slice()).collect()
    }

    /// Completed checkpoint logs, one entry per tick
    pub fn completed_checkpoint_lines(&self) -> Vec<&[Vec<Passenger>]> {
        self.frames.iter().map(|f| f.completed_checkpoint.as_slice()).collect()
    }

    /// Checkpoint lines, one entry per tick
    pub fn checkpoint_lines(&self) -> Vec<&[Vec<Passenger>]> {
        self.frames.iter().map(|f| f.checkpoint_lines.as_slice()).collect()
    }

    /// Hold rooms, one entry per tick
    pub fn hold_rooms(&self) -> Vec<&[Vec<Passenger>]> {
        self.frames.iter().map(|f| f.hold_rooms.as_slice()).collect()
    }
}
