use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use veil_engine::content;
use veil_engine::sim::run_playthrough;

/// Scripted host that plays the town story end to end.
#[derive(Parser, Debug)]
#[command(
    about = "Runs a scripted playthrough of the town and dumps its artefacts",
    version
)]
struct Args {
    /// Seed for the flavor-line picker
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of frames before the playthrough gives up
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,

    /// Path to write the event log as JSON
    #[arg(long)]
    event_log_json: Option<PathBuf>,

    /// Path to write the authored town manifest as JSON
    #[arg(long)]
    content_json: Option<PathBuf>,

    /// Print the full event transcript after the run
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = args.content_json.as_ref() {
        let json = serde_json::to_string_pretty(&content::town_content())
            .context("serializing town manifest to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing town manifest JSON to {}", path.display()))?;
        println!("Saved town manifest JSON to {}", path.display());
    }

    let report = run_playthrough(args.seed, args.max_ticks)?;

    println!("Playthrough finished in {} ticks", report.ticks);
    println!(
        "Mission: {} | {}",
        report.final_state, report.final_title
    );
    println!("Candles collected: {}", report.candles);
    println!("Events logged: {}", report.events.len());

    if args.verbose {
        for line in &report.events {
            println!("  {line}");
        }
    }

    if let Some(path) = args.event_log_json.as_ref() {
        let json = serde_json::to_string_pretty(&report.events)
            .context("serializing event log to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing event log JSON to {}", path.display()))?;
        println!("Saved event log JSON to {}", path.display());
    }

    Ok(())
}
