//! Dining Philosophers CLI
//!
//! `philo <number_of_philosophers> <time_to_die> <time_to_eat> <time_to_sleep> [meals]`
//!
//! Event lines go to stdout; diagnostics go to stderr.

use anyhow::Context;
use clap::Parser;
use philo_core::{Dinner, DinnerConfig, DinnerReport};
use philo_env::{StdoutSink, TokioContext};
use philo_sim::{ScenarioId, ScenarioResult, ScenarioRunner};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Dining philosophers simulation
#[derive(Parser, Debug)]
#[command(name = "philo")]
#[command(about = "Simulate the dining philosophers under a starvation deadline", long_about = None)]
struct Args {
    /// number_of_philosophers time_to_die time_to_eat time_to_sleep [number_of_times_each_philosopher_must_eat]
    #[arg(value_name = "VALUES", allow_negative_numbers = true)]
    values: Vec<String>,

    /// Diagnostic verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Watchdog polling interval in milliseconds
    #[arg(long, default_value = "1")]
    watchdog_poll_ms: u64,

    /// Print the final report as JSON on stderr
    #[arg(long)]
    json: bool,

    /// Run verification scenarios instead (lonely, steady, meal_goal, starving, all)
    #[arg(short = 'S', long)]
    scenario: Option<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(format!(
        "warn,philo_core={level},philo_env={level},philo_sim={level},philo={level}"
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .context("Failed to start the async runtime")
}

fn run_dinner(config: DinnerConfig) -> anyhow::Result<DinnerReport> {
    let runtime = build_runtime()?;
    runtime.block_on(async move {
        let dinner = Dinner::new(config, TokioContext::shared(), Box::new(StdoutSink::new()))?;
        Ok::<_, anyhow::Error>(dinner.run().await)
    })
}

fn run_scenarios(selection: &str, poll: Duration) -> anyhow::Result<Vec<ScenarioResult>> {
    let scenarios = if selection == "all" {
        ScenarioId::all()
    } else {
        vec![selection.parse::<ScenarioId>().map_err(anyhow::Error::msg)?]
    };

    let runtime = build_runtime()?;
    let runner = ScenarioRunner::new().with_watchdog_poll(poll);
    Ok(runtime.block_on(async {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(runner.run(scenario).await);
        }
        results
    }))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => error!("Failed to serialize report: {}", e),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let poll = Duration::from_millis(args.watchdog_poll_ms.max(1));

    if let Some(selection) = &args.scenario {
        let results = match run_scenarios(selection, poll) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return ExitCode::FAILURE;
            }
        };

        let mut failed = 0;
        for result in &results {
            if result.passed {
                info!("✓ {} PASSED ({}ms, meals {:?})", result.scenario, result.elapsed_ms, result.meals);
            } else {
                failed += 1;
                error!(
                    "✗ {} FAILED: {}",
                    result.scenario,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
        if args.json {
            print_json(&results);
        }
        eprintln!("{}/{} scenarios passed", results.len() - failed, results.len());
        return if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    let config = match DinnerConfig::from_args(args.values.as_slice()) {
        Ok(config) => config.with_watchdog_poll(poll),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_dinner(config) {
        Ok(report) => {
            if args.json {
                print_json(&report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
