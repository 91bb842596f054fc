use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::basic::basic_statistics;
use crate::analysis::patterns::analyze_patterns;
use crate::analysis::session::analyze_sessions;
use crate::analysis::volatility::analyze_volatility;
use crate::analysis::AnalysisResults;
use crate::config::Config;
use crate::loader::load_ticks;
use crate::model::tick::TickSeries;
use crate::recommend::recommend_strategy;
use crate::report;

/// Run every stage in order, rendering each stage to `out` as it completes.
/// The first failing stage aborts the run.
pub fn run_full_analysis<W: Write>(
    series: &TickSeries,
    config: &Config,
    out: &mut W,
) -> Result<AnalysisResults> {
    let vol_windows = config.volatility.intervals()?;
    let timeframes = config.patterns.intervals()?;
    let mut results = AnalysisResults::default();

    let basic = basic_statistics(series).context("basic statistics failed")?;
    report::write_basic_stats(out, &basic)?;
    results.record_basic_stats(basic)?;

    let sessions = analyze_sessions(series.ticks(), &config.sessions)
        .context("session analysis failed")?;
    report::write_sessions(out, &sessions)?;
    results.record_sessions(sessions)?;

    let vol = analyze_volatility(
        series,
        &vol_windows,
        config.volatility.low_quantile,
        config.volatility.high_quantile,
    )
    .context("volatility analysis failed")?;
    report::write_volatility(out, &vol)?;
    results.record_volatility(vol)?;

    let patterns = analyze_patterns(series, &timeframes);
    report::write_patterns(out, &patterns)?;
    results.record_patterns(patterns)?;

    let rec = recommend_strategy(
        &results,
        &config.recommend,
        &config.patterns.scalping_timeframes,
    )
    .context("strategy recommendation failed")?;
    report::write_recommendation(out, &rec)?;
    results.record_recommendation(rec)?;

    tracing::info!("Analysis complete");
    Ok(results)
}

/// Load `path` and run the full analysis over it.
pub fn analyze_file<W: Write>(path: &Path, config: &Config, out: &mut W) -> Result<AnalysisResults> {
    writeln!(out, "Loading tick data...")?;
    let loaded =
        load_ticks(path).with_context(|| format!("failed to load ticks from {}", path.display()))?;
    report::write_load_summary(out, &loaded)?;
    run_full_analysis(&loaded.series, config, out)
}
