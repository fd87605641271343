//! EV charging station simulator entry point: CLI wiring and scenario loading.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ev_station_sim::SimError;
use ev_station_sim::config::ScenarioConfig;
use ev_station_sim::io::export::{export_csv, export_daily_csv};
use ev_station_sim::sim::engine::{SimulationRun, simulate};
use ev_station_sim::sim::kpi::daily_series;
use ev_station_sim::sim::types::{DEFAULT_SEED, SimConfig};

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "ev-station-sim")]
#[command(about = "Discrete-time EV charging station simulator")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Options of the default `run` command
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one scenario and print its KPI report (default)
    Run(RunArgs),
    /// Simulate a range of chargepoint counts and tabulate the peaks
    Sweep(SweepArgs),
    /// Run the 20-chargepoint default scenario twice and check the runs agree
    Diagnose,
}

/// Scenario selection shared by `run` and `sweep`.
#[derive(Args, Debug, Clone)]
struct ScenarioArgs {
    /// Load scenario from TOML config file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, small_lot, commuter_hub)
    #[arg(long)]
    preset: Option<String>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<i64>,

    /// Override the tick budget (at most one simulated year)
    #[arg(long)]
    ticks: Option<usize>,

    /// Emit per-event debug traces on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Override the number of chargepoints
    #[arg(long)]
    chargepoints: Option<usize>,

    /// Export per-tick telemetry to CSV
    #[arg(long)]
    telemetry_out: Option<PathBuf>,

    /// Export the daily series to CSV
    #[arg(long)]
    daily_out: Option<PathBuf>,

    /// Start REST API server after simulation
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[derive(Args, Debug, Clone)]
struct SweepArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Smallest chargepoint count
    #[arg(long, default_value_t = 1)]
    from: usize,

    /// Largest chargepoint count (inclusive)
    #[arg(long, default_value_t = 30)]
    to: usize,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the scenario: `--scenario` takes priority, then `--preset`, then baseline.
fn load_scenario(args: &ScenarioArgs) -> CliResult<ScenarioConfig> {
    let mut scenario = if let Some(ref path) = args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(ref name) = args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }
    if args.ticks.is_some() {
        scenario.simulation.max_ticks = args.ticks;
    }
    if args.verbose {
        scenario.simulation.verbose_logging = true;
    }
    Ok(scenario)
}

fn validated(scenario: &ScenarioConfig) -> Result<SimConfig, SimError> {
    let errors = scenario.validate();
    if errors.is_empty() {
        Ok(scenario.to_sim_config())
    } else {
        Err(SimError::Config(errors))
    }
}

fn run_command(args: RunArgs) -> CliResult {
    let mut scenario = load_scenario(&args.scenario)?;
    if let Some(n) = args.chargepoints {
        scenario.simulation.num_chargepoints = n;
    }
    let config = validated(&scenario)?;

    tracing::info!(
        chargepoints = config.num_chargepoints,
        seed = config.seed,
        ticks = config.max_ticks,
        "starting simulation"
    );
    let SimulationRun { results, kpi, .. } = simulate(config.clone())?;
    println!("{kpi}");

    let daily = daily_series(&results);
    if let Some(ref path) = args.telemetry_out {
        export_csv(&results, path)?;
        eprintln!("Telemetry written to {}", path.display());
    }
    if let Some(ref path) = args.daily_out {
        export_daily_csv(&daily, path)?;
        eprintln!("Daily series written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ev_station_sim::api::AppState {
            config,
            kpi,
            results,
            daily,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(ev_station_sim::api::serve(state, addr))?;
    }

    Ok(())
}

fn sweep_command(args: SweepArgs) -> CliResult {
    if args.from == 0 || args.from > args.to {
        return Err(SimError::InvalidArgument(format!(
            "sweep range {}..={} must be non-empty and start at 1 or above",
            args.from, args.to
        ))
        .into());
    }
    let base = load_scenario(&args.scenario)?;

    println!(
        "{:>12} {:>14} {:>14} {:>14} {:>12}",
        "chargepoints", "energy (kWh)", "peak (kW)", "theoretical", "concurrency"
    );
    for n in args.from..=args.to {
        let mut scenario = base.clone();
        scenario.simulation.num_chargepoints = n;
        let run = simulate(validated(&scenario)?)?;
        let k = &run.kpi;
        println!(
            "{:>12} {:>14.2} {:>14.2} {:>14.2} {:>11.2}%",
            n,
            k.total_energy_consumed_kwh,
            k.actual_max_power_demand_kw,
            k.theoretical_max_power_kw,
            k.concurrency_factor_pct,
        );
    }
    Ok(())
}

fn diagnose_command() -> CliResult {
    let config = SimConfig::new(20, DEFAULT_SEED);
    println!(
        "Diagnose: {} chargepoints, seed {}, {} ticks",
        config.num_chargepoints, config.seed, config.max_ticks
    );

    let first = simulate(config.clone())?;
    let second = simulate(config)?;
    for (label, run) in [("run 1", &first), ("run 2", &second)] {
        println!(
            "{label}: total energy {:.2} kWh, max power {:.2} kW, concurrency {:.2}%",
            run.statistics.total_energy_consumed_kwh,
            run.statistics.actual_max_power_demand_kw,
            run.kpi.concurrency_factor_pct,
        );
    }

    check_identical(&first, &second)?;
    println!("OK: runs are identical");
    Ok(())
}

fn check_identical(first: &SimulationRun, second: &SimulationRun) -> CliResult {
    if first.statistics != second.statistics || first.results != second.results {
        return Err(format!(
            "runs with identical configuration diverged: {:.4} kWh vs {:.4} kWh",
            first.statistics.total_energy_consumed_kwh,
            second.statistics.total_energy_consumed_kwh,
        )
        .into());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Some(Command::Run(a)) => a.scenario.verbose,
        Some(Command::Sweep(a)) => a.scenario.verbose,
        Some(Command::Diagnose) => false,
        None => cli.run.scenario.verbose,
    };
    init_tracing(verbose);

    let outcome = match cli.command {
        Some(Command::Run(args)) => run_command(args),
        Some(Command::Sweep(args)) => sweep_command(args),
        Some(Command::Diagnose) => diagnose_command(),
        None => run_command(cli.run),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_runs_pass_the_check() {
        let config = SimConfig::new(5, DEFAULT_SEED).with_max_ticks(96);
        let first = simulate(config.clone()).expect("run should succeed");
        let second = simulate(config).expect("run should succeed");
        assert!(check_identical(&first, &second).is_ok());
    }

    #[test]
    fn diverging_runs_are_reported() {
        let config = SimConfig::new(5, DEFAULT_SEED).with_max_ticks(96);
        let first = simulate(config.clone()).expect("run should succeed");
        let mut second = simulate(config).expect("run should succeed");
        second.statistics.total_energy_consumed_kwh += 1.0;

        let err = check_identical(&first, &second).expect_err("runs differ");
        assert!(err.to_string().contains("diverged"), "got: {err}");
    }
}
