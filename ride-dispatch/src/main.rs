// SPDX-License-Identifier: MIT
// ride-dispatch: runs a simulated ride-dispatch service
//
// - Regions and their limits come from --region or a JSON config file.
// - Drivers and passengers are generated, booked and awaited.
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use ride_dispatch::config::{parse_region_spec, DispatchConfig};
use ride_dispatch::simulation::{run_simulation, SimulationPlan};
use ride_dispatch::Dispatch;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with regions, log_events and driver_capacity
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Region and its maximum number of simultaneous bookings, e.g. Central=2.
    /// May be repeated. Note that this excludes --config.
    #[arg(long = "region", value_name = "NAME=LIMIT", value_parser = parse_region_arg)]
    regions: Vec<(String, usize)>,

    /// Number of drivers to register
    #[arg(long, default_value_t = 5)]
    drivers: usize,

    /// Maximum time in ms a driver needs to reach a passenger
    #[arg(long, default_value_t = 100)]
    driver_max_delay: u64,

    /// Number of passengers to book
    #[arg(long, default_value_t = 20)]
    passengers: usize,

    /// Maximum trip time in ms
    #[arg(long, default_value_t = 100)]
    passenger_max_delay: u64,

    /// Passengers booked after the shutdown (expected to be rejected)
    #[arg(long, default_value_t = 1)]
    late_passengers: usize,

    /// Print every booking event
    #[arg(long)]
    log_events: bool,

    #[arg(
        long = "shutdown-now",
        help = "Interrupt accepted bookings instead of letting them finish."
    )]
    shutdown_now: bool,
}

fn parse_region_arg(spec: &str) -> Result<(String, usize), String> {
    parse_region_spec(spec).map_err(|e| e.to_string())
}

fn validate_args(args: &Args) -> Result<(), String> {
    match (&args.config, args.regions.is_empty()) {
        (Some(_), false) => {
            return Err("--config and --region may not be used together".into());
        }
        (None, true) => {
            return Err("either --config or at least one --region is required".into());
        }
        _ => {}
    }

    if args.drivers == 0 && args.passengers > 0 {
        return Err("--passengers needs at least one driver".into());
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DispatchConfig> {
    let config = match &args.config {
        Some(path) => DispatchConfig::from_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DispatchConfig::new(args.regions.iter().cloned()),
    };
    let log_events = config.log_events || args.log_events;
    Ok(config.with_log_events(log_events))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let config = load_config(&args)?;
    let dispatch = Dispatch::new(&config).context("failed to create the dispatch")?;

    let plan = SimulationPlan {
        drivers: args.drivers,
        driver_max_delay: args.driver_max_delay,
        passengers: args.passengers,
        passenger_max_delay: args.passenger_max_delay,
        late_passengers: args.late_passengers,
        shutdown_now: args.shutdown_now,
    };

    info!("Starting ride-dispatch simulation");
    let report = run_simulation(&dispatch, &plan)?;
    info!(
        "Total simulated trip time {:?} over {} trips",
        report.total_trip_duration, report.completed
    );
    Ok(())
}
