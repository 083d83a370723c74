//! Headless replay
//!
//! Feeds recorded snapshots through the decision engine and prints the action
//! chosen for each tick, followed by the final engine status.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use lane_tactician::cards::CardCatalog;
use lane_tactician::fusion::{EngineStatus, FusedAction};
use lane_tactician::{load_config, DecisionEngine, EngineConfig, GameSnapshot, Result};

/// Replay recorded match snapshots through the decision engine
#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(about = "Replay recorded snapshots and print one decision per tick")]
struct Args {
    /// JSON array of game snapshots
    #[arg(long)]
    snapshots: PathBuf,

    /// Engine config TOML (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card catalog TOML (built-in catalog when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON array of outcomes, each applied after its tick
    #[arg(long)]
    outcomes: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Debug, Deserialize)]
struct OutcomeEntry {
    /// Zero-based index into the snapshot list
    tick: usize,
    success: bool,
    #[serde(default)]
    damage: f32,
}

#[derive(Serialize)]
struct TickReport {
    tick: usize,
    elapsed: f32,
    action: FusedAction,
}

#[derive(Serialize)]
struct ReplayReport {
    ticks: Vec<TickReport>,
    skipped: usize,
    status: EngineStatus,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lane_tactician=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => CardCatalog::from_toml_str(&fs::read_to_string(path)?)?,
        None => CardCatalog::standard(),
    };
    let snapshots: Vec<GameSnapshot> = serde_json::from_str(&fs::read_to_string(&args.snapshots)?)?;
    let outcomes: Vec<OutcomeEntry> = match &args.outcomes {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    let mut engine = DecisionEngine::new(catalog, config)?;
    let mut ticks = Vec::new();
    let mut skipped = 0;

    for (index, snapshot) in snapshots.iter().enumerate() {
        match engine.tick(snapshot) {
            Ok(action) => ticks.push(TickReport {
                tick: index,
                elapsed: snapshot.elapsed,
                action,
            }),
            Err(e) => {
                eprintln!("Skipping tick {}: {}", index, e);
                skipped += 1;
                continue;
            }
        }

        for outcome in outcomes.iter().filter(|o| o.tick == index) {
            engine.record_outcome(outcome.success, outcome.damage);
        }
    }

    let report = ReplayReport {
        ticks,
        skipped,
        status: engine.status(),
    };

    match args.format.as_str() {
        "text" => print_text(&report),
        _ => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_text(report: &ReplayReport) {
    println!("Replay");
    println!("======");
    for tick in &report.ticks {
        println!("[{:>4}] {:>6.1}s  {}", tick.tick, tick.elapsed, tick.action);
    }
    if report.skipped > 0 {
        println!("Skipped ticks: {}", report.skipped);
    }

    let status = &report.status;
    println!();
    println!("Phase: {}", status.phase);
    println!("Enemy elixir (est.): {:.1}", status.enemy_elixir);
    println!("Archetype: {}", status.archetype);
    if let Some(combo) = &status.active_combo {
        println!("Active combo: {} ({}/{})", combo.name, combo.step, combo.steps);
    }
    println!("Weights:");
    for (kind, weight) in &status.weights {
        println!("  {:<20} {:.3}", kind.to_string(), weight);
    }
    println!(
        "Decisions: {}  success rate {:.0}%  avg damage {:.0}  cache hits {}",
        status.decisions,
        status.success_rate * 100.0,
        status.average_damage,
        status.cache_hits
    );
}
