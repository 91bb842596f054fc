use std::io::Write;
use std::path::Path;

use anyhow::Result;

use dax_tick_analyzer::config::Config;
use dax_tick_analyzer::pipeline::analyze_file;
use dax_tick_analyzer::results_store::save_results;

const TICK_FILE: &str = "GER40_ticks.csv";
const RESULTS_FILE: &str = "dax_analysis_results.json";
const LOG_FILE: &str = "dax-tick-analyzer.log";

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to a file so it doesn't interleave with the report on stdout
    let log_file = std::fs::File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(input = TICK_FILE, output = RESULTS_FILE, "Starting dax-tick-analyzer");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Starting DAX tick data strategy analysis...")?;

    let results = analyze_file(Path::new(TICK_FILE), &config, &mut out)?;
    save_results(Path::new(RESULTS_FILE), &results)?;

    writeln!(out)?;
    writeln!(out, "Analysis complete! Detailed results saved to: {}", RESULTS_FILE)?;
    tracing::info!("Shutdown complete");
    Ok(())
}
