//! Scenario tests for the tick engine
//!
//! Each test builds a small engine with a scripted arrival plan and checks the
//! exact tick on which passengers move between stages.

use airport_departure_sim::*;
use chrono::NaiveTime;
use std::collections::HashMap;

/// Arrival schedule that replays fixed per-minute plans
#[derive(Debug)]
struct ScriptedArrivals(HashMap<String, Vec<u32>>);

impl ScriptedArrivals {
    fn new(plans: &[(&str, Vec<u32>)]) -> Self {
        Self(plans.iter().map(|(number, plan)| (number.to_string(), plan.clone())).collect())
    }
}

impl ArrivalSchedule for ScriptedArrivals {
    fn generate(&self, flight: &Flight, span_minutes: u32, granularity: u32) -> Vec<u32> {
        let mut minutes = self.0.get(&flight.flight_number).cloned().unwrap_or_default();
        minutes.resize(span_minutes as usize, 0);
        minutes.chunks(granularity.max(1) as usize).map(|chunk| chunk.iter().sum()).collect()
    }
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// One counter and one checkpoint at one passenger per tick, no delays
fn params(span: u32, buffer: u32) -> EngineParams {
    EngineParams {
        in_person_fraction: 1.0,
        counters: vec![CounterConfig::new(1.0, EligibilityRule::AllFlights)],
        checkpoint_count: 1,
        checkpoint_rate: 1.0,
        arrival_span_minutes: span,
        interval_minutes: 1,
        transit_delay_minutes: 0,
        hold_delay_minutes: 0,
        boarding_close_buffer_minutes: buffer,
    }
}

fn ids(passengers: &[&Passenger]) -> Vec<u64> {
    passengers.iter().map(|p| p.id.0).collect()
}

/// A single passenger passes every stage on the tick it arrives when delays are zero
#[test]
fn test_pass_through_with_zero_delays() {
    let flights = vec![Flight::new("SA1", at(9, 0), 1, 1.0)];
    let schedule = ScriptedArrivals::new(&[("SA1", vec![1])]);
    let mut engine = SimulationEngine::new(params(5, 0), flights, &schedule).unwrap();

    assert_eq!(engine.boarding_close_tick(FlightId(0)), Some(5));
    assert_eq!(engine.total_ticks(), 6);

    engine.advance();

    let room = engine.hold_room(FlightId(0));
    assert_eq!(room.len(), 1);
    let passenger = room[0];
    assert_eq!(passenger.arrival_tick, 0);
    assert_eq!(passenger.ticket_completion_tick, Some(0));
    assert_eq!(passenger.checkpoint_entry_tick, Some(0));
    assert_eq!(passenger.checkpoint_completion_tick, Some(0));
    assert_eq!(passenger.hold_room_entry_tick, Some(0));
    assert_eq!(passenger.hold_room_sequence, Some(1));
    assert_eq!(passenger.stage(), PassengerStage::HoldRoom);

    assert_eq!(engine.queued_count(), 0);
    assert_eq!(engine.pending_transfer_count(), 0);
    assert_eq!(engine.current_tick(), 1);
}

/// Passengers still in the ticket line when boarding closes are purged
#[test]
fn test_boarding_close_purges_ticket_line() {
    let mut params = params(23, 20);
    params.counters = vec![CounterConfig::new(0.0, EligibilityRule::AllFlights)];
    let flights = vec![Flight::new("SB1", at(9, 0), 2, 1.0)];
    let schedule = ScriptedArrivals::new(&[("SB1", vec![2])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    assert_eq!(engine.boarding_close_tick(FlightId(0)), Some(3));

    for _ in 0..3 {
        engine.advance();
        assert!(engine.flights_just_closed().is_empty());
    }
    assert_eq!(engine.ticket_lines()[0].len(), 2);

    engine.advance();

    assert!(engine.ticket_lines().iter().all(Vec::is_empty));
    assert!(engine.completed_ticket_lines().iter().all(Vec::is_empty));
    assert!(engine.checkpoint_lines().iter().all(Vec::is_empty));
    assert!(engine.completed_checkpoint_lines().iter().all(Vec::is_empty));
    assert!(engine.hold_room(FlightId(0)).is_empty());
    assert_eq!(engine.missed_count(), 2);

    let closed = engine.flights_just_closed();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].flight_number, "SB1");
    assert_eq!(engine.closure_report(FlightId(0)).unwrap(), "SB1: 0 of 2 made their flight.");

    // The close-tick frame still shows the stragglers, flagged as missed
    let frame = engine.history().frame(3).unwrap();
    assert_eq!(frame.ticket_lines[0].len(), 2);
    assert!(frame.ticket_lines[0].iter().all(|p| p.missed));
    assert!(engine.is_finished());
}

/// Boarding close clears a seated passenger from both completed logs
#[test]
fn test_boarding_close_clears_completed_logs() {
    let flights = vec![Flight::new("CL1", at(9, 0), 1, 1.0)];
    let schedule = ScriptedArrivals::new(&[("CL1", vec![1])]);
    let mut engine = SimulationEngine::new(params(23, 20), flights, &schedule).unwrap();

    engine.advance();
    assert_eq!(engine.hold_room(FlightId(0)).len(), 1);
    assert_eq!(engine.completed_ticket_lines()[0].len(), 1);
    assert_eq!(engine.completed_checkpoint_lines()[0].len(), 1);

    for _ in 0..3 {
        engine.advance();
    }

    assert_eq!(engine.just_closed(), &[FlightId(0)]);
    assert!(engine.completed_ticket_lines()[0].is_empty());
    assert!(engine.completed_checkpoint_lines()[0].is_empty());
    assert_eq!(engine.hold_room(FlightId(0)).len(), 1);
    assert_eq!(engine.missed_count(), 0);
    assert_eq!(engine.closure_report(FlightId(0)).unwrap(), "CL1: 1 of 1 made their flight.");

    // The close-tick frame is recorded before the logs are cleared
    let frame = engine.history().frame(3).unwrap();
    assert_eq!(frame.completed_ticket[0].len(), 1);
    assert_eq!(frame.completed_checkpoint[0].len(), 1);
}

/// Passengers who turn up after their flight closed miss it at the door
#[test]
fn test_arrival_after_close_is_missed() {
    let flights = vec![Flight::new("TA1", at(9, 0), 1, 1.0), Flight::new("TA2", at(9, 10), 1, 0.0)];
    let schedule = ScriptedArrivals::new(&[("TA1", vec![0, 0, 0, 0, 0, 1]), ("TA2", vec![])]);
    let mut engine = SimulationEngine::new(params(23, 20), flights, &schedule).unwrap();

    assert_eq!(engine.boarding_close_tick(FlightId(0)), Some(3));
    for _ in 0..6 {
        engine.advance();
    }

    let passenger = engine.passenger(PassengerId(0)).unwrap();
    assert_eq!(passenger.arrival_tick, 5);
    assert_eq!(passenger.stage(), PassengerStage::Missed);
    assert!(engine.ticket_lines()[0].is_empty());
    assert!(engine.completed_ticket_lines()[0].is_empty());
    assert_eq!(engine.backlog_by_tick()[&6], 0);
    assert_eq!(engine.arrived_count(), 1);
    assert_eq!(engine.missed_count(), 1);
}

/// The just-closed list only covers the most recent tick
#[test]
fn test_just_closed_is_cleared_next_tick() {
    let flights = vec![Flight::new("SB1", at(9, 0), 1, 0.0), Flight::new("SB2", at(9, 10), 1, 0.0)];
    let schedule = ScriptedArrivals::new(&[("SB1", vec![0]), ("SB2", vec![0])]);
    let mut engine = SimulationEngine::new(params(23, 20), flights, &schedule).unwrap();

    for _ in 0..4 {
        engine.advance();
    }
    assert_eq!(engine.just_closed(), &[FlightId(0)]);

    engine.advance();
    assert!(engine.just_closed().is_empty());
    assert_eq!(engine.total_ticks(), 14);
}

/// A rate of 0.5 serves one passenger every second tick
#[test]
fn test_fractional_rate_serves_every_other_tick() {
    let mut params = params(30, 20);
    params.counters = vec![CounterConfig::new(0.5, EligibilityRule::AllFlights)];
    params.checkpoint_rate = 0.0;
    let flights = vec![Flight::new("SC1", at(9, 0), 2, 1.0)];
    let schedule = ScriptedArrivals::new(&[("SC1", vec![2])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    for _ in 0..4 {
        engine.advance();
    }

    let completed: Vec<usize> =
        engine.history().completed_ticket_lines().iter().map(|frame| frame[0].len()).collect();
    assert_eq!(completed, vec![0, 1, 1, 2]);

    let passengers = engine.passengers();
    assert_eq!(passengers[0].ticket_completion_tick, Some(1));
    assert_eq!(passengers[1].ticket_completion_tick, Some(3));
}

/// Clearing security too late to reach the gate before close counts as missed
#[test]
fn test_late_gate_arrival_is_missed() {
    let mut params = params(25, 20);
    params.in_person_fraction = 0.0;
    params.hold_delay_minutes = 2;
    let flights = vec![Flight::new("HL1", at(9, 0), 1, 1.0), Flight::new("HL2", at(9, 10), 1, 0.0)];
    let schedule = ScriptedArrivals::new(&[("HL1", vec![0, 0, 0, 0, 1]), ("HL2", vec![])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    assert_eq!(engine.boarding_close_tick(FlightId(0)), Some(5));
    engine.run_to_completion();

    let passenger = engine.passenger(PassengerId(0)).unwrap();
    assert_eq!(passenger.checkpoint_completion_tick, Some(4));
    assert!(passenger.missed);
    assert!(passenger.hold_room_entry_tick.is_none());
    assert!(engine.hold_room(FlightId(0)).is_empty());
    assert!(engine.completed_checkpoint_lines()[0].is_empty());
    assert_eq!(engine.missed_count(), 1);
}

/// Reaching the gate on the close tick itself still makes the flight
#[test]
fn test_gate_arrival_on_close_tick_boards() {
    let mut params = params(25, 20);
    params.in_person_fraction = 0.0;
    params.hold_delay_minutes = 1;
    let flights = vec![Flight::new("HL1", at(9, 0), 1, 1.0), Flight::new("HL2", at(9, 10), 1, 0.0)];
    let schedule = ScriptedArrivals::new(&[("HL1", vec![0, 0, 0, 0, 1]), ("HL2", vec![])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.run_to_completion();

    let room = engine.hold_room(FlightId(0));
    assert_eq!(room.len(), 1);
    assert_eq!(room[0].hold_room_entry_tick, Some(5));
    assert_eq!(room[0].hold_room_sequence, Some(1));
    assert_eq!(engine.missed_count(), 0);
    assert_eq!(engine.closure_report(FlightId(0)).unwrap(), "HL1: 1 of 1 made their flight.");
}

/// Boarding close catches passengers still walking to security
#[test]
fn test_close_purges_passengers_walking_to_security() {
    let mut params = params(23, 20);
    params.transit_delay_minutes = 5;
    let flights = vec![Flight::new("TW1", at(9, 0), 1, 1.0)];
    let schedule = ScriptedArrivals::new(&[("TW1", vec![1])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.advance();
    assert_eq!(engine.pending_transfer_count(), 1);
    assert_eq!(engine.visible_completed_ticket_line(0).len(), 1);

    engine.run_to_completion();
    assert_eq!(engine.pending_transfer_count(), 0);
    assert!(engine.completed_ticket_lines()[0].is_empty());
    assert_eq!(engine.missed_count(), 1);
    assert_eq!(engine.arrived_count(), 1);
}

/// In-person passengers join the shortest eligible counter, lowest index on ties
#[test]
fn test_counter_eligibility_routing() {
    let mut params = params(30, 20);
    params.counters = vec![
        CounterConfig::new(0.0, EligibilityRule::AllFlights),
        CounterConfig::new(0.0, EligibilityRule::flights(["AA1"])),
    ];
    let flights = vec![Flight::new("AA1", at(9, 0), 3, 1.0), Flight::new("BB2", at(9, 0), 2, 1.0)];
    let schedule = ScriptedArrivals::new(&[("AA1", vec![3]), ("BB2", vec![2])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.advance();

    let lines = engine.ticket_lines();
    assert_eq!(ids(&lines[0]), vec![0, 2, 3, 4]);
    assert_eq!(ids(&lines[1]), vec![1]);
}

/// With no counter accepting a flight, every counter is eligible
#[test]
fn test_counter_fallback_when_none_eligible() {
    let mut params = params(30, 20);
    params.counters = vec![
        CounterConfig::new(0.0, EligibilityRule::flights(["ZZ9"])),
        CounterConfig::new(0.0, EligibilityRule::flights(["ZZ9"])),
    ];
    let flights = vec![Flight::new("AA1", at(9, 0), 2, 1.0)];
    let schedule = ScriptedArrivals::new(&[("AA1", vec![2])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.advance();

    let lines = engine.ticket_lines();
    assert_eq!(ids(&lines[0]), vec![0]);
    assert_eq!(ids(&lines[1]), vec![1]);
}

/// Online passengers go straight to the shortest checkpoint line
#[test]
fn test_online_passengers_skip_counters() {
    let mut params = params(30, 20);
    params.in_person_fraction = 0.0;
    params.checkpoint_count = 2;
    params.checkpoint_rate = 0.0;
    let flights = vec![Flight::new("ON1", at(9, 0), 3, 1.0)];
    let schedule = ScriptedArrivals::new(&[("ON1", vec![3])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.advance();

    assert!(engine.ticket_lines()[0].is_empty());
    let lines = engine.checkpoint_lines();
    assert_eq!(ids(&lines[0]), vec![0, 2]);
    assert_eq!(ids(&lines[1]), vec![1]);
    assert!(engine.combined_checkpoint_line().iter().all(|p| p.checkpoint_entry_tick == Some(0)));
    assert!(engine.passengers().iter().all(|p| p.check_in == CheckInMethod::Online));
}

/// The in-person share is rounded half away from zero
#[test]
fn test_in_person_split_rounding() {
    let mut params = params(30, 20);
    params.in_person_fraction = 0.5;
    params.counters = vec![CounterConfig::new(0.0, EligibilityRule::AllFlights)];
    params.checkpoint_rate = 0.0;
    let flights = vec![Flight::new("RS1", at(9, 0), 3, 1.0)];
    let schedule = ScriptedArrivals::new(&[("RS1", vec![3])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.advance();

    assert_eq!(engine.ticket_lines()[0].len(), 2);
    assert_eq!(engine.checkpoint_lines()[0].len(), 1);
}

/// Completed ticket entries are visible only while walking to security
#[test]
fn test_visible_marker_tracks_walk_to_security() {
    let mut params = params(30, 20);
    params.transit_delay_minutes = 3;
    params.checkpoint_rate = 0.0;
    let flights = vec![Flight::new("VS1", at(9, 0), 1, 1.0)];
    let schedule = ScriptedArrivals::new(&[("VS1", vec![1])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    engine.advance();
    assert_eq!(engine.visible_completed_ticket_line(0).len(), 1);
    assert_eq!(engine.pending_to_checkpoint().len(), 1);
    assert_eq!(engine.passengers()[0].stage(), PassengerStage::ToCheckpoint);

    for _ in 0..3 {
        engine.advance();
    }

    assert!(engine.visible_completed_ticket_line(0).is_empty());
    assert_eq!(engine.completed_ticket_lines()[0].len(), 1);
    let waiting = &engine.checkpoint_lines()[0];
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].checkpoint_entry_tick, Some(3));
    assert!(!waiting[0].visible);
    assert!(engine.visible_completed_ticket_line(7).is_empty());
}

/// Advancing past the last tick changes nothing
#[test]
fn test_advance_past_end_is_noop() {
    let mut engine = SimulationEngine::from_config(&SimulationConfig::default()).unwrap();
    engine.run_to_completion();

    let history = engine.history().clone();
    let backlog = engine.backlog_by_tick().clone();
    let passengers = engine.passengers().to_vec();
    let statistics = engine.statistics();

    for _ in 0..3 {
        engine.advance();
    }

    assert_eq!(engine.current_tick(), engine.total_ticks());
    assert_eq!(engine.history(), &history);
    assert_eq!(engine.backlog_by_tick(), &backlog);
    assert_eq!(engine.passengers(), passengers.as_slice());
    assert_eq!(engine.statistics(), statistics);
}

/// Running to completion resets any partial progress first
#[test]
fn test_run_to_completion_resets_state() {
    let config = SimulationConfig::default();
    let mut fresh = SimulationEngine::from_config(&config).unwrap();
    fresh.run_to_completion();

    let mut reused = SimulationEngine::from_config(&config).unwrap();
    for _ in 0..37 {
        reused.advance();
    }
    reused.run_to_completion();
    assert_eq!(reused.history(), fresh.history());
    assert_eq!(reused.backlog_by_tick(), fresh.backlog_by_tick());

    reused.run_to_completion();
    assert_eq!(reused.history(), fresh.history());
    assert_eq!(reused.arrived_count(), fresh.arrived_count());
    assert_eq!(reused.history().len(), reused.total_ticks() as usize);
}

/// Backlog is keyed by the tick after each executed tick
#[test]
fn test_backlog_keys() {
    let mut params = params(30, 20);
    params.counters = vec![CounterConfig::new(0.0, EligibilityRule::AllFlights)];
    let flights = vec![Flight::new("BK1", at(9, 0), 4, 1.0)];
    let schedule = ScriptedArrivals::new(&[("BK1", vec![1, 1, 2])]);
    let mut engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    for _ in 0..3 {
        engine.advance();
    }

    let backlog: Vec<(Tick, usize)> = engine.backlog_by_tick().iter().map(|(&t, &n)| (t, n)).collect();
    assert_eq!(backlog, vec![(1, 1), (2, 2), (3, 4)]);
}

/// Engines refuse inputs that cannot produce a run
#[test]
fn test_construction_failures() {
    let schedule = ScriptedArrivals::new(&[("AA1", vec![1])]);
    let flight = || vec![Flight::new("AA1", at(9, 0), 1, 1.0)];

    let result = SimulationEngine::new(params(30, 20), vec![], &schedule);
    assert!(matches!(
        result,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::NoFlights))
    ));

    let result = SimulationEngine::new(params(10, 20), flight(), &schedule);
    assert!(matches!(
        result,
        Err(SimulationError::BoardingClosesBeforeOrigin { close_tick: -10, .. })
    ));

    let mut no_checkpoints = params(30, 20);
    no_checkpoints.checkpoint_count = 0;
    let result = SimulationEngine::new(no_checkpoints, flight(), &schedule);
    assert!(matches!(
        result,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::InvalidCheckpointCount(0)))
    ));

    let mut no_counters = params(30, 20);
    no_counters.counters.clear();
    let result = SimulationEngine::new(no_counters, flight(), &schedule);
    assert!(matches!(
        result,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::NoCounters))
    ));

    let short = ScriptedArrivals::new(&[("AA1", vec![0])]);
    let result = SimulationEngine::new(params(30, 20), flight(), &short);
    assert!(matches!(
        result,
        Err(SimulationError::ArrivalPlanTotal { expected: 1, actual: 0, .. })
    ));
}

/// A schedule returning the wrong number of buckets is rejected
#[test]
fn test_plan_length_mismatch() {
    #[derive(Debug)]
    struct OneBucket;

    impl ArrivalSchedule for OneBucket {
        fn generate(&self, flight: &Flight, _span: u32, _granularity: u32) -> Vec<u32> {
            vec![flight.expected_passengers()]
        }
    }

    let flights = vec![Flight::new("AA1", at(9, 0), 4, 1.0)];
    let result = SimulationEngine::new(params(30, 20), flights, &OneBucket);
    assert!(matches!(
        result,
        Err(SimulationError::ArrivalPlanLength { expected: 30, actual: 1, granularity: 1, .. })
    ));
}

/// Interval plans aggregate the per-minute plan at the configured granularity
#[test]
fn test_interval_plan() {
    let mut params = params(30, 20);
    params.interval_minutes = 10;
    let flights = vec![Flight::new("IV1", at(9, 0), 6, 1.0)];
    let schedule = ScriptedArrivals::new(&[("IV1", vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3])]);
    let engine = SimulationEngine::new(params, flights, &schedule).unwrap();

    assert_eq!(engine.interval_arrivals(FlightId(0)), Some(&[1, 2, 3][..]));
    assert_eq!(engine.minute_arrivals(FlightId(0)).map(<[u32]>::len), Some(30));
    assert!(engine.interval_arrivals(FlightId(4)).is_none());
    assert_eq!(engine.time_at(0), at(8, 30));
    assert_eq!(engine.time_at(10), at(8, 40));
}
