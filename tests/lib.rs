// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use airport_departure_sim::*;

mod engine_scenario_tests;


#[test]
fn test_core_id_types() {
    let run_id = RunId::new();
    assert_ne!(run_id, RunId::new());
    assert!(run_id.to_string().starts_with("RUN_"));

    assert_eq!(PassengerId(3).to_string(), "PAX_000003");
    assert_eq!(FlightId(1).index(), 1);
}

#[test]
fn test_enum_types() {
    let stages = [
        PassengerStage::TicketLine,
        PassengerStage::ToCheckpoint,
        PassengerStage::CheckpointLine,
        PassengerStage::ToHoldRoom,
        PassengerStage::HoldRoom,
        PassengerStage::Missed,
    ];
    for stage in &stages {
        assert!(!stage.to_string().is_empty());
    }

    for method in [CheckInMethod::InPerson, CheckInMethod::Online] {
        assert!(!method.to_string().is_empty());
    }

    for format in [OutputFormat::Text, OutputFormat::Json] {
        assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
    }
}

#[test]
fn test_default_configuration_runs() {
    let config = SimulationConfig::default();
    config.validate().unwrap();

    let mut engine = SimulationEngine::from_config(&config).unwrap();
    engine.run_to_completion();

    assert!(engine.is_finished());
    assert_eq!(engine.history().len(), engine.total_ticks() as usize);
    assert!(engine.boarded_count() > 0);
}

#[test]
fn test_error_categories() {
    let error = SimulationError::configuration_error("bad airport");
    assert_eq!(error.category(), "Configuration");
    assert!(!error.is_recoverable());

    let error: SimulationError = ConfigValidationError::NoCounters.into();
    assert!(error.to_string().contains("ticket counter"));
}
