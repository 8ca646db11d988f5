mod watch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jostle_core::{run_scenario, PhysicsConfig, Scenario, SimulationResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jostle")]
#[command(about = "Jostle - soft overlap resolution for crowds of circular units", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print final unit positions
    Run {
        /// Path to the scenario JSON file
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Re-run a scenario every time the file changes
    Watch {
        /// Path to the scenario JSON file
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct Overrides {
    /// Number of ticks to run instead of the scenario's own count
    #[arg(long)]
    ticks: Option<u32>,

    /// Physics config JSON replacing the scenario's `physics` section
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the resolution phase on the calling thread
    #[arg(long)]
    sequential: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Run { file, overrides } => run_file(&file, &overrides),
        Commands::Watch { file, overrides } => watch::watch_file(&file, &overrides),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_scenario(file: &Path, overrides: &Overrides) -> Result<Scenario> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read scenario {}", file.display()))?;
    let mut scenario = Scenario::from_json(&source)
        .with_context(|| format!("failed to load scenario {}", file.display()))?;

    if let Some(path) = &overrides.config {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        scenario.physics = PhysicsConfig::from_json(&source)
            .with_context(|| format!("failed to load config {}", path.display()))?;
    }
    if let Some(ticks) = overrides.ticks {
        scenario.ticks = ticks;
    }
    if overrides.sequential {
        scenario.physics.parallel = false;
    }

    Ok(scenario)
}

fn run_file(file: &Path, overrides: &Overrides) -> Result<()> {
    let scenario = load_scenario(file, overrides)?;
    print_result(&run_scenario(scenario));
    Ok(())
}

pub fn print_result(result: &SimulationResult) {
    println!("# {} ticks", result.ticks);
    for unit in &result.units {
        println!("{} = ({}, {})", unit.name, unit.pos.x, unit.pos.y);
    }
}
