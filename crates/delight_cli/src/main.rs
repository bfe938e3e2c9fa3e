use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use delight_core::scenario::{run_scenario, ScenarioReport};
use delight_core::simulation::SimulationParams;
use delight_core::GameplayConfig;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Check gameplay tuning and run headless scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a gameplay config, then print what it resolves to.
    Check(CheckArgs),
    /// Run the scripted scenario against an in-memory host and emit a JSON report.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct CheckArgs {
    #[arg(long, default_value = delight_core::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = delight_core::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides `SIMULATION_SEED`.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of random placement requests.
    #[arg(long, default_value_t = 32)]
    placements: usize,
    /// Damage dealt to the scenario enemy, one value per hit.
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = [1.0, 1.0, 1.0]
    )]
    hits: Vec<f32>,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunRecord<'a> {
    timestamp: String,
    config: &'a std::path::Path,
    report: &'a ScenarioReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => handle_check(args),
        Commands::Simulate(args) => handle_simulate(args),
    }
}

fn load_config(path: &std::path::Path) -> Result<GameplayConfig> {
    GameplayConfig::from_path(path)
        .with_context(|| format!("could not load gameplay config {}", path.display()))
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let bounds = config.spawner.bounds;
    println!("Config {} is valid", args.config.display());
    println!(
        "  spawner: bounds ({}, {}, {}, {}), limit {}",
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
        if config.spawner.limit_enabled {
            config.spawner.max_items.to_string()
        } else {
            "off".to_string()
        }
    );
    println!(
        "  enemy: {:?} mode, health {}, speed {}",
        config.enemy.mode, config.enemy.health, config.enemy.speed
    );
    println!(
        "  pickups: +{} health, +{} speed",
        config.pickups.health_boost, config.pickups.speed_boost
    );
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let mut params = SimulationParams::from_env();
    if let Some(seed) = args.seed {
        params.seed = seed;
    }

    info!(
        target: "delight_cli",
        seed = params.seed,
        placements = args.placements,
        hits = args.hits.len(),
        config = %args.config.display(),
        "running scenario"
    );
    let report = run_scenario(&config, &params, &args.hits, args.placements)
        .context("scenario run failed")?;
    let record = RunRecord {
        timestamp: Utc::now().to_rfc3339(),
        config: &args.config,
        report: &report,
    };
    let json = serde_json::to_string_pretty(&record)?;
    println!("{json}");

    if let Some(out) = args.out.as_ref() {
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out, &json).with_context(|| format!("failed to write {}", out.display()))?;
        info!(target: "delight_cli", path = %out.display(), "report written");
        println!("Report written to {}", out.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate_args(argv: &[&str]) -> SimulateArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Simulate(args) => args,
            Commands::Check(_) => panic!("expected simulate"),
        }
    }

    #[test]
    fn hits_accept_negative_damage() {
        let args = simulate_args(&["delight", "simulate", "--hits", "-2", "1.5"]);
        assert_eq!(vec![-2.0, 1.5], args.hits);
    }

    #[test]
    fn hits_default_to_three_unit_strikes() {
        let args = simulate_args(&["delight", "simulate", "--seed", "9"]);
        assert_eq!(vec![1.0, 1.0, 1.0], args.hits);
        assert_eq!(Some(9), args.seed);
        assert_eq!(32, args.placements);
    }

    #[test]
    fn simulate_writes_report_file() {
        let dir = std::env::temp_dir();
        let out = dir.join(format!("delight_cli_report_{}.json", std::process::id()));
        let config = dir.join(format!("delight_cli_config_{}.toml", std::process::id()));
        fs::write(&config, "[spawner]\ninitial_count = 4\n").unwrap();
        let args = simulate_args(&[
            "delight",
            "simulate",
            "--config",
            config.to_str().unwrap(),
            "--hits",
            "-1",
            "--out",
            out.to_str().unwrap(),
        ]);
        handle_simulate(args).unwrap();

        let record: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(4, record["report"]["items"]["spawned"]);
        assert_eq!(4.0, record["report"]["enemy"]["final_health"]);
        let _ = fs::remove_file(out);
        let _ = fs::remove_file(config);
    }
}
