use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use dalmuti_app::config::{ResolvedOutputs, SimulationConfig};
use dalmuti_app::logging::init_logging;
use dalmuti_app::simulate::SimulationRunner;

/// Headless Great Dalmuti simulator.
#[derive(Debug, Parser)]
#[command(
    name = "dalmuti",
    author,
    version,
    about = "Deterministic Great Dalmuti game simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/dalmuti.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for dealing.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,

    /// Print the final engine snapshot as JSON.
    #[arg(long)]
    print_snapshot: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;

    println!(
        "Loaded configuration '{run_id}' ({games} game{})",
        if games == 1 { "" } else { "s" }
    );

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SimulationRunner::new(config, outputs);
    let summary = runner
        .run()
        .with_context(|| format!("running simulation '{run_id}'"))?;

    println!(
        "Simulation complete for '{run_id}': {} games, mean score {:.2}, {} revolutions → {} rows at {}",
        summary.games_played,
        summary.mean_score,
        summary.revolutions,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    if cli.print_snapshot {
        println!("{}", summary.last_snapshot.to_json()?);
    }

    Ok(())
}
