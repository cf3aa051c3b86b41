//! Command-line shell around the simulation engine.
//!
//! Loads a scenario file (or the built-in example), runs one simulation,
//! and writes the cost/debt/wealth series as CSV to stdout. Everything
//! interactive (editing run variables, plotting) lives outside this
//! binary; it talks to the engine only through `simulate`.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use boligsim_core::config::SimulationConfig;
use boligsim_core::simulation::simulate;

#[derive(Parser, Debug)]
#[command(name = "boligsim")]
#[command(about = "Simulates saving toward a home purchase and servicing the mortgage")]
struct Args {
    /// Path to a scenario JSON file (default: the built-in example)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of months to simulate
    #[arg(short, long, default_value_t = 100)]
    months: usize,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the built-in example scenario as JSON and exit
    #[arg(long)]
    print_example: bool,
}

fn init_logging(level: &str) {
    let default_filter = format!("boligsim={level},boligsim_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(path: Option<&PathBuf>) -> color_eyre::Result<SimulationConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read scenario file {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("failed to parse scenario file {}", path.display()))
        }
        None => {
            tracing::info!("no scenario file given, using the built-in example");
            Ok(SimulationConfig::example())
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level);

    if args.print_example {
        println!(
            "{}",
            serde_json::to_string_pretty(&SimulationConfig::example())?
        );
        return Ok(());
    }

    let config = load_scenario(args.scenario.as_ref())?;
    tracing::info!(
        months = args.months,
        start_date = %config.start_values.simulation_start_date,
        mortgage_date = %config.variables.mortgage_date,
        "running simulation"
    );

    let result = simulate(args.months, &config)?;
    tracing::info!(
        initial_top_loan = result.initial_top_loan,
        final_debt = result.final_debt(),
        final_wealth = result.final_wealth(),
        "simulation finished"
    );

    println!("date,cumulative_cost,total_debt,wealth");
    for i in 0..result.dates.len() {
        println!(
            "{},{:.2},{:.2},{:.2}",
            result.dates[i], result.cumulative_cost[i], result.total_debt[i], result.wealth[i]
        );
    }

    Ok(())
}
