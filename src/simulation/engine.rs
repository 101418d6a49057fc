//! The tick-driven departure engine
//!
//! One call to [`SimulationEngine::advance`] executes one minute of the
//! departure process, in this order:
//!
//! 1. inject the tick's arrivals and close boarding for flights due to close
//! 2. ticket counters serve their lines
//! 3. passengers whose walk to security ends this tick join a checkpoint line
//! 4. checkpoint servers screen their lines
//! 5. passengers whose walk to the gate ends this tick enter the hold room,
//!    or miss the flight if boarding has already closed
//! 6. a history frame is captured
//! 7. missed passengers are purged from lines, logs and the walk to security
//! 8. the tick counter advances and the backlog is recorded
//!
//! With zero transit and hold delays a passenger can pass every stage within a
//! single tick.

use super::{
    EngineState, FlightOutcome, History, RunStatistics, SimulationClock, SimulationError,
    SimulationResult,
};
use crate::arrivals::{bucket_count, ArrivalSchedule};
use crate::facility::{eligible_counters, shortest_line, CounterConfig};
use crate::flight::Flight;
use crate::passenger::{Passenger, Tick};
use crate::perf_span;
use crate::sim_event;
use crate::types::config::{validate_flights, validate_fraction, validate_rate};
use crate::types::{
    CheckInMethod, ConfigValidationError, FlightId, PassengerId, RunId, SimulationConfig,
};
use chrono::NaiveTime;
use std::collections::BTreeMap;
use tracing::{debug, field, info, instrument};

/// Engine construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    /// Fraction of each tick's arrivals that check in at a counter
    pub in_person_fraction: f64,
    /// Ticket counters in line order
    pub counters: Vec<CounterConfig>,
    /// Number of checkpoint servers
    pub checkpoint_count: usize,
    /// Passengers screened per tick by each checkpoint server
    pub checkpoint_rate: f64,
    /// Minutes before departure that a flight's passengers start arriving
    pub arrival_span_minutes: u32,
    /// Granularity of the interval arrival plan
    pub interval_minutes: u32,
    /// Ticks from ticket counter to checkpoint line
    pub transit_delay_minutes: u32,
    /// Ticks from checkpoint to hold room
    pub hold_delay_minutes: u32,
    /// Minutes before departure at which boarding closes
    pub boarding_close_buffer_minutes: u32,
}

impl EngineParams {
    /// Take the engine parameters out of a full configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            in_person_fraction: config.in_person_fraction,
            counters: config.counters.clone(),
            checkpoint_count: config.checkpoint_count,
            checkpoint_rate: config.checkpoint_rate,
            arrival_span_minutes: config.arrival_span_minutes,
            interval_minutes: config.interval_minutes,
            transit_delay_minutes: config.transit_delay_minutes,
            hold_delay_minutes: config.hold_delay_minutes,
            boarding_close_buffer_minutes: config.boarding_close_buffer_minutes,
        }
    }

    /// Check rates, fractions and counts
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_fraction("in_person_fraction", self.in_person_fraction)?;
        if self.counters.is_empty() {
            return Err(ConfigValidationError::NoCounters);
        }
        for (index, counter) in self.counters.iter().enumerate() {
            validate_rate(&format!("counters[{}].rate", index), counter.rate)?;
        }
        if self.checkpoint_count == 0 {
            return Err(ConfigValidationError::InvalidCheckpointCount(0));
        }
        validate_rate("checkpoint_rate", self.checkpoint_rate)?;
        if self.arrival_span_minutes == 0 {
            return Err(ConfigValidationError::InvalidArrivalSpan);
        }
        if self.interval_minutes == 0 {
            return Err(ConfigValidationError::InvalidInterval);
        }
        Ok(())
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Tick-driven simulation of passengers flowing to their gates
#[derive(Debug)]
pub struct SimulationEngine {
    run_id: RunId,
    params: EngineParams,
    flights: Vec<Flight>,
    clock: SimulationClock,
    minute_plans: Vec<Vec<u32>>,
    interval_plans: Vec<Vec<u32>>,
    /// Ticket counters each flight's in-person passengers may use
    eligible: Vec<Vec<usize>>,
    state: EngineState,
}

impl SimulationEngine {
    /// Build an engine for `flights`, fetching arrival plans from `schedule`
    ///
    /// Fails if the parameters or flights are invalid, if any flight would
    /// close boarding before the time origin, or if the schedule returns a
    /// plan that does not match the requested granularity and passenger total.
    pub fn new(
        params: EngineParams,
        flights: Vec<Flight>,
        schedule: &dyn ArrivalSchedule,
    ) -> SimulationResult<Self> {
        let run_id = RunId::new();
        let setup_span = perf_span!(
            "engine_setup",
            run_id = field::display(run_id),
            flights = flights.len(),
        );
        let _entered = setup_span.enter();

        params.validate()?;
        validate_flights(&flights)?;

        let clock = SimulationClock::new(
            &flights,
            params.arrival_span_minutes,
            params.boarding_close_buffer_minutes,
        )?;

        let mut minute_plans = Vec::with_capacity(flights.len());
        let mut interval_plans = Vec::with_capacity(flights.len());
        for flight in &flights {
            minute_plans.push(fetch_plan(schedule, flight, params.arrival_span_minutes, 1)?);
            interval_plans.push(fetch_plan(
                schedule,
                flight,
                params.arrival_span_minutes,
                params.interval_minutes,
            )?);
        }

        let eligible = flights.iter().map(|flight| eligible_counters(&params.counters, flight)).collect();
        let state = EngineState::new(
            &params.counters,
            params.checkpoint_count,
            params.checkpoint_rate,
            flights.len(),
        );

        info!(
            "Engine {} ready: {} flights, {} counters, {} checkpoints, {} ticks from {}",
            run_id,
            flights.len(),
            params.counters.len(),
            params.checkpoint_count,
            clock.total_ticks(),
            clock.origin_time().format("%H:%M")
        );

        Ok(Self { run_id, params, flights, clock, minute_plans, interval_plans, eligible, state })
    }

    /// Build an engine from a full configuration, using its arrival policy
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        let schedule = config.arrival_policy.build(config.seed);
        Self::new(EngineParams::from_config(config), config.flights.clone(), schedule.as_ref())
    }

    /// Execute one tick; a no-op once every tick has run
    pub fn advance(&mut self) {
        if self.is_finished() {
            return;
        }

        let tick = self.state.tick;
        self.state.just_closed.clear();

        self.admit_arrivals(tick);
        self.serve_counters(tick);
        self.transfer_to_checkpoints(tick);
        self.serve_checkpoints(tick);
        self.transfer_to_hold_rooms(tick);

        self.state.record_frame();
        self.state.purge_missed();

        self.state.tick += 1;
        let queued = self.state.queued();
        self.state.backlog.insert(self.state.tick, queued);

        debug!(
            tick,
            queued,
            pending = self.state.pending(),
            seated = self.state.seated(),
            "Tick complete"
        );
    }

    /// Reset all run state and advance until the last tick has run
    #[instrument(skip(self), fields(run_id = %self.run_id, total_ticks = self.total_ticks()))]
    pub fn run_to_completion(&mut self) {
        self.reset();
        while !self.is_finished() {
            self.advance();
        }

        info!(
            "Run complete after {} ticks: {} arrived, {} boarded, {} missed",
            self.current_tick(),
            self.arrived_count(),
            self.boarded_count(),
            self.missed_count()
        );
    }

    /// Discard all run state and return to tick zero
    pub fn reset(&mut self) {
        debug!("Resetting engine {}", self.run_id);
        self.state.reset();
    }

    fn admit_arrivals(&mut self, tick: Tick) {
        for index in 0..self.flights.len() {
            let flight = FlightId(index);
            let arrivals = self
                .clock
                .arrival_offset(flight, tick)
                .and_then(|offset| self.minute_plans[index].get(offset))
                .copied()
                .unwrap_or(0);
            if arrivals > 0 {
                self.admit(flight, tick, arrivals);
            }

            if tick == self.clock.boarding_close_tick(flight) {
                self.close_boarding(flight, tick);
            }
        }
    }

    fn admit(&mut self, flight: FlightId, tick: Tick, arrivals: u32) {
        let in_person =
            ((f64::from(arrivals) * self.params.in_person_fraction).round() as u32).min(arrivals);

        if tick > self.clock.boarding_close_tick(flight) {
            self.turn_away(flight, tick, arrivals, in_person);
            return;
        }

        let state = &mut self.state;
        for _ in 0..in_person {
            let eligible = self.eligible[flight.index()].iter().copied();
            // Validation requires a counter and eligibility falls back to all counters
            let Some(counter) = shortest_line(&state.counters, eligible) else {
                debug_assert!(false, "no ticket counter for {}", flight);
                break;
            };
            let id = state.spawn(flight, tick, CheckInMethod::InPerson);
            state.counters[counter].enqueue(id);
        }

        for _ in in_person..arrivals {
            // Validation requires at least one checkpoint
            let Some(checkpoint) = shortest_line(&state.checkpoints, 0..state.checkpoints.len())
            else {
                debug_assert!(false, "no checkpoint for {}", flight);
                break;
            };
            let id = state.spawn(flight, tick, CheckInMethod::Online);
            state.passenger_mut(id).checkpoint_entry_tick = Some(tick);
            state.checkpoints[checkpoint].enqueue(id);
        }
    }

    /// Arrivals for a flight whose boarding already closed miss it at the door
    fn turn_away(&mut self, flight: FlightId, tick: Tick, arrivals: u32, in_person: u32) {
        for index in 0..arrivals {
            let check_in =
                if index < in_person { CheckInMethod::InPerson } else { CheckInMethod::Online };
            let id = self.state.spawn(flight, tick, check_in);
            self.state.passenger_mut(id).missed = true;
        }
        debug!(
            "{} passengers for {} arrived at tick {} after boarding closed",
            arrivals, self.flights[flight.index()].flight_number, tick
        );
    }

    fn close_boarding(&mut self, flight: FlightId, tick: Tick) {
        // Anyone not yet through security is in a ticket line, a checkpoint
        // line, or in the completed ticket log walking to security. Those
        // already through keep boarding; the purge drops them from the
        // completed logs once this tick's frame is recorded.
        let mut missed = 0usize;
        for passenger in self
            .state
            .passengers
            .iter_mut()
            .filter(|p| p.flight == flight && !p.missed && !p.has_cleared_checkpoint())
        {
            passenger.missed = true;
            missed += 1;
        }
        self.state.just_closed.push(flight);

        let number = self.flights[flight.index()].flight_number.as_str();
        let seated = self.state.hold_rooms[flight.index()].len();
        if missed > 0 {
            sim_event!(warn, "Boarding closed with passengers still in process", flight = number, tick = tick, seated = seated, missed = missed);
        } else {
            sim_event!(info, "Boarding closed", flight = number, tick = tick, seated = seated);
        }
    }

    fn serve_counters(&mut self, tick: Tick) {
        let due = tick + self.params.transit_delay_minutes;
        let state = &mut self.state;

        for counter in 0..state.counters.len() {
            for id in state.counters[counter].serve() {
                let passenger = state.passenger_mut(id);
                // Served on the close tick itself: capacity is spent, nobody moves on
                if passenger.missed {
                    continue;
                }
                passenger.ticket_completion_tick = Some(tick);
                passenger.visible = true;
                state.pending_checkpoint.entry(due).or_default().push(id);
            }
        }
    }

    fn transfer_to_checkpoints(&mut self, tick: Tick) {
        let Some(batch) = self.state.pending_checkpoint.remove(&tick) else {
            return;
        };
        let state = &mut self.state;

        for id in batch {
            let passenger = state.passenger_mut(id);
            passenger.visible = false;
            if passenger.missed {
                continue;
            }
            passenger.checkpoint_entry_tick = Some(tick);

            if let Some(checkpoint) = shortest_line(&state.checkpoints, 0..state.checkpoints.len()) {
                state.checkpoints[checkpoint].enqueue(id);
            }
        }
    }

    fn serve_checkpoints(&mut self, tick: Tick) {
        let due = tick + self.params.hold_delay_minutes;
        let state = &mut self.state;

        for checkpoint in 0..state.checkpoints.len() {
            for id in state.checkpoints[checkpoint].serve() {
                let passenger = state.passenger_mut(id);
                if passenger.missed {
                    continue;
                }
                passenger.checkpoint_completion_tick = Some(tick);
                state.pending_hold.entry(due).or_default().push(id);
            }
        }
    }

    fn transfer_to_hold_rooms(&mut self, tick: Tick) {
        let Some(batch) = self.state.pending_hold.remove(&tick) else {
            return;
        };

        for id in batch {
            let flight = self.state.passenger(id).flight;
            if tick <= self.clock.boarding_close_tick(flight) {
                let room = &mut self.state.hold_rooms[flight.index()];
                room.push(id);
                let sequence = room.len() as u32;

                let passenger = self.state.passenger_mut(id);
                passenger.hold_room_entry_tick = Some(tick);
                passenger.hold_room_sequence = Some(sequence);
            } else {
                self.state.passenger_mut(id).missed = true;
                debug!(
                    "{} reached the gate at tick {} after {} closed",
                    id, tick, self.flights[flight.index()].flight_number
                );
            }
        }
    }

    /// Identifier of this engine instance, as recorded in log spans
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Parameters the engine was built with
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Flights in the order they were supplied
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Flight by id
    pub fn flight(&self, flight: FlightId) -> Option<&Flight> {
        self.flights.get(flight.index())
    }

    /// Id of the flight with the given number
    pub fn flight_id(&self, flight_number: &str) -> Option<FlightId> {
        self.flights.iter().position(|f| f.flight_number == flight_number).map(FlightId)
    }

    /// Time bookkeeping for this run
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Number of ticks executed so far
    pub fn current_tick(&self) -> Tick {
        self.state.tick
    }

    /// Number of ticks in a full run
    pub fn total_ticks(&self) -> Tick {
        self.clock.total_ticks()
    }

    /// Whether every tick has run
    pub fn is_finished(&self) -> bool {
        self.state.tick >= self.clock.total_ticks()
    }

    /// Tick at which boarding closes for `flight`
    pub fn boarding_close_tick(&self, flight: FlightId) -> Option<Tick> {
        self.flight(flight).map(|_| self.clock.boarding_close_tick(flight))
    }

    /// Wall-clock time of day for `tick`
    pub fn time_at(&self, tick: Tick) -> NaiveTime {
        self.clock.time_at(tick)
    }

    /// Ids of flights whose boarding closed on the last executed tick
    pub fn just_closed(&self) -> &[FlightId] {
        &self.state.just_closed
    }

    /// Flights whose boarding closed on the last executed tick
    pub fn flights_just_closed(&self) -> Vec<&Flight> {
        self.state.just_closed.iter().map(|id| &self.flights[id.index()]).collect()
    }

    /// Per-minute arrival plan for `flight`
    pub fn minute_arrivals(&self, flight: FlightId) -> Option<&[u32]> {
        self.minute_plans.get(flight.index()).map(Vec::as_slice)
    }

    /// Arrival plan at the configured interval granularity for `flight`
    pub fn interval_arrivals(&self, flight: FlightId) -> Option<&[u32]> {
        self.interval_plans.get(flight.index()).map(Vec::as_slice)
    }

    fn resolve<'a>(&'a self, ids: impl IntoIterator<Item = &'a PassengerId>) -> Vec<&'a Passenger> {
        ids.into_iter().map(|&id| self.state.passenger(id)).collect()
    }

    /// Waiting passengers per ticket counter, head first
    pub fn ticket_lines(&self) -> Vec<Vec<&Passenger>> {
        self.state.counters.iter().map(|s| self.resolve(s.line())).collect()
    }

    /// Completed log per ticket counter
    pub fn completed_ticket_lines(&self) -> Vec<Vec<&Passenger>> {
        self.state.counters.iter().map(|s| self.resolve(s.completed())).collect()
    }

    /// Passengers a counter finished with who are still walking to security
    pub fn visible_completed_ticket_line(&self, counter: usize) -> Vec<&Passenger> {
        self.state
            .counters
            .get(counter)
            .map(|s| self.resolve(s.completed()).into_iter().filter(|p| p.visible).collect())
            .unwrap_or_default()
    }

    /// Waiting passengers per checkpoint server, head first
    pub fn checkpoint_lines(&self) -> Vec<Vec<&Passenger>> {
        self.state.checkpoints.iter().map(|s| self.resolve(s.line())).collect()
    }

    /// Completed log per checkpoint server
    pub fn completed_checkpoint_lines(&self) -> Vec<Vec<&Passenger>> {
        self.state.checkpoints.iter().map(|s| self.resolve(s.completed())).collect()
    }

    /// Every waiting checkpoint passenger, server by server
    pub fn combined_checkpoint_line(&self) -> Vec<&Passenger> {
        self.state.checkpoints.iter().flat_map(|s| self.resolve(s.line())).collect()
    }

    /// Hold room contents for `flight`, in boarding order
    pub fn hold_room(&self, flight: FlightId) -> Vec<&Passenger> {
        self.state
            .hold_rooms
            .get(flight.index())
            .map(|room| self.resolve(room))
            .unwrap_or_default()
    }

    /// Hold room contents for every flight
    pub fn hold_rooms(&self) -> Vec<Vec<&Passenger>> {
        self.state.hold_rooms.iter().map(|room| self.resolve(room)).collect()
    }

    /// Passengers walking from a ticket counter to security, by due tick
    pub fn pending_to_checkpoint(&self) -> Vec<&Passenger> {
        self.state.pending_checkpoint.values().flat_map(|batch| self.resolve(batch)).collect()
    }

    /// Passengers walking from security to their gate, by due tick
    pub fn pending_to_hold_room(&self) -> Vec<&Passenger> {
        self.state.pending_hold.values().flat_map(|batch| self.resolve(batch)).collect()
    }

    /// Frames captured so far
    pub fn history(&self) -> &History {
        &self.state.history
    }

    /// Queued passengers after each tick, keyed by the following tick
    pub fn backlog_by_tick(&self) -> &BTreeMap<Tick, usize> {
        &self.state.backlog
    }

    /// Every passenger injected so far, including purged ones
    pub fn passengers(&self) -> &[Passenger] {
        &self.state.passengers
    }

    /// Passenger by id
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.state.passengers.get(id.index())
    }

    /// Passengers injected so far
    pub fn arrived_count(&self) -> usize {
        self.state.passengers.len()
    }

    /// Passengers waiting in ticket and checkpoint lines
    pub fn queued_count(&self) -> usize {
        self.state.queued()
    }

    /// Passengers walking between stages
    pub fn pending_transfer_count(&self) -> usize {
        self.state.pending()
    }

    /// Passengers seated in hold rooms
    pub fn boarded_count(&self) -> usize {
        self.state.seated()
    }

    /// Passengers who missed their flight
    pub fn missed_count(&self) -> usize {
        self.state.missed()
    }

    /// Counts for one flight
    pub fn flight_outcome(&self, flight: FlightId) -> Option<FlightOutcome> {
        let info = self.flight(flight)?;
        let mut outcome = FlightOutcome::new(
            info,
            self.clock.boarding_close_tick(flight),
            self.clock.time_at(self.clock.boarding_close_tick(flight)),
        );
        for passenger in self.state.passengers.iter().filter(|p| p.flight == flight) {
            outcome.record(passenger);
        }
        Some(outcome)
    }

    /// One-line closure announcement, e.g. `"AA100: 120 of 153 made their flight."`
    pub fn closure_report(&self, flight: FlightId) -> Option<String> {
        self.flight_outcome(flight).map(|outcome| outcome.made_flight_line())
    }

    /// Summary statistics for the run so far
    pub fn statistics(&self) -> RunStatistics {
        RunStatistics::from_engine(self)
    }
}

fn fetch_plan(
    schedule: &dyn ArrivalSchedule,
    flight: &Flight,
    span_minutes: u32,
    granularity: u32,
) -> SimulationResult<Vec<u32>> {
    let plan = schedule.generate(flight, span_minutes, granularity);

    let expected_len = bucket_count(span_minutes, granularity);
    if plan.len() != expected_len {
        return Err(SimulationError::ArrivalPlanLength {
            flight: flight.flight_number.clone(),
            granularity,
            expected: expected_len,
            actual: plan.len(),
        });
    }

    let total: u64 = plan.iter().map(|&n| u64::from(n)).sum();
    let expected = flight.expected_passengers();
    if total != u64::from(expected) {
        return Err(SimulationError::ArrivalPlanTotal {
            flight: flight.flight_number.clone(),
            expected,
            actual: u32::try_from(total).unwrap_or(u32::MAX),
        });
    }

    debug!("{} arrival plan at {}-minute granularity: {:?}", flight.flight_number, granularity, plan);
    Ok(plan)
}
