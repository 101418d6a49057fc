// Airport Departure Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/airport-departure-sim
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/airport-departure-sim --config airport.json --checkpoint-count 3 --verbose
// ```

use airport_departure_sim::simulation::{
    write_backlog_json, LoggingConfig, LoggingGuard, RunStatistics, SimulationEngine,
};
use airport_departure_sim::types::config::CliArgs;
use airport_departure_sim::types::{FlightId, OutputFormat, SimulationConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use std::time::Instant;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _logging: LoggingGuard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Airport Departure Simulator");

    if let Err(e) = run(args) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Airport Departure Simulator completed successfully");
}

fn init_logging(args: &CliArgs) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::init_quiet()
    }
}

fn run(args: CliArgs) -> Result<()> {
    let dry_run = args.dry_run;

    let config = SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    // Building the engine also checks close ticks and arrival plans
    let mut engine =
        SimulationEngine::from_config(&config).context("Failed to build simulation engine")?;

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config, &engine);
        return Ok(());
    }

    print_startup_banner(&config, &engine);

    let start_time = Instant::now();
    engine.reset();
    while !engine.is_finished() {
        engine.advance();
        announce_closures(&engine);
    }
    info!("Simulated {} ticks in {:.3}s", engine.current_tick(), start_time.elapsed().as_secs_f64());

    let statistics = engine.statistics();
    print_report(&statistics, config.output_format)?;

    if let Some(path) = &config.backlog_output {
        write_backlog_json(&engine, path)
            .with_context(|| format!("Failed to write backlog series to {}", path))?;
        eprintln!("Backlog series written to: {}", path);
    }

    info!("{}", statistics.generate_compact_summary());
    Ok(())
}

/// Print one line per flight whose boarding closed on the last tick
fn announce_closures(engine: &SimulationEngine) {
    // The tick counter has already moved past the tick that closed
    let closed_at = engine.time_at(engine.current_tick().saturating_sub(1));
    for &flight in engine.just_closed() {
        if let Some(line) = engine.closure_report(flight) {
            eprintln!("[{}] {}", closed_at.format("%H:%M"), line);
        }
    }
}

fn print_report(statistics: &RunStatistics, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", statistics),
        OutputFormat::Json => {
            println!("{}", statistics.to_json().context("Failed to serialize run statistics")?)
        }
    }
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig, engine: &SimulationEngine) {
    eprintln!("Airport Departure Simulator");
    eprintln!("===========================");
    eprintln!("Passenger flow from check-in to the gate, minute by minute");
    eprintln!();

    print_configuration_summary(config, engine);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig, engine: &SimulationEngine) {
    eprintln!("Configuration:");
    eprintln!("  In-Person Check-In: {:.1}%", config.in_person_fraction * 100.0);
    eprintln!("  Ticket Counters: {}", config.counters.len());
    for (index, counter) in config.counters.iter().enumerate() {
        eprintln!("    #{}: {:.2}/min, {:?}", index + 1, counter.rate, counter.eligibility);
    }
    eprintln!("  Checkpoints: {} at {:.2}/min", config.checkpoint_count, config.checkpoint_rate);
    eprintln!("  Arrival Span: {} min ({})", config.arrival_span_minutes, config.arrival_policy);
    eprintln!(
        "  Delays: {} min to security, {} min to gate",
        config.transit_delay_minutes, config.hold_delay_minutes
    );
    eprintln!("  Boarding Closes: {} min before departure", config.boarding_close_buffer_minutes);
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }

    eprintln!("\nFlights:");
    for (index, flight) in engine.flights().iter().enumerate() {
        let close_tick = engine
            .boarding_close_tick(FlightId(index))
            .unwrap_or_default();
        eprintln!(
            "  {} ({} seats, {} expected), boarding closes at tick {}",
            flight,
            flight.seats,
            flight.expected_passengers(),
            close_tick
        );
    }
    eprintln!(
        "\nRun: {} ticks starting {}",
        engine.total_ticks(),
        engine.clock().origin_time().format("%H:%M")
    );
    eprintln!();
}
