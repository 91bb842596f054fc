//! Console rendering of each analysis stage.

use std::io::{self, Write};

use indexmap::IndexMap;

use crate::analysis::basic::BasicStats;
use crate::analysis::patterns::PatternStats;
use crate::analysis::session::{SessionReport, SessionStats};
use crate::analysis::volatility::VolatilityReport;
use crate::loader::LoadedTicks;
use crate::recommend::Recommendation;

/// Format an integer with `,` thousands separators.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

fn header<W: Write>(out: &mut W, title: &str, width: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(width))?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(width))
}

pub fn write_load_summary<W: Write>(out: &mut W, loaded: &LoadedTicks) -> io::Result<()> {
    let series = &loaded.series;
    writeln!(out, "Loaded {} tick records", group_thousands(series.len()))?;
    if loaded.dropped_rows > 0 {
        writeln!(
            out,
            "Dropped {} rows without both bid and ask",
            group_thousands(loaded.dropped_rows)
        )?;
    }
    if let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) {
        writeln!(out, "Date range: {} to {}", first, last)?;
        writeln!(out, "Total days: {}", (last - first).num_days())?;
    }
    Ok(())
}

pub fn write_basic_stats<W: Write>(out: &mut W, stats: &BasicStats) -> io::Result<()> {
    header(out, "BASIC MARKET STATISTICS", 50)?;
    writeln!(out, "Total ticks: {}", group_thousands(stats.total_ticks))?;
    writeln!(out, "Trading days: {}", stats.trading_days)?;
    writeln!(out, "Average ticks per day: {:.0}", stats.avg_ticks_per_day)?;
    writeln!(
        out,
        "Price range: {:.1} - {:.1}",
        stats.price_range.min, stats.price_range.max
    )?;
    writeln!(out, "Total range: {:.1} points", stats.price_range.range)?;
    writeln!(out, "Average spread: {:.2} points", stats.spread_stats.avg_spread)?;
    writeln!(out, "Average spread: {:.1} bps", stats.spread_stats.avg_spread_bps)
}

fn write_session<W: Write>(out: &mut W, name: &str, s: &SessionStats) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} Session ({:02}:00-{:02}:00):",
        name, s.start_hour, s.end_hour
    )?;
    writeln!(out, "  Ticks: {}", group_thousands(s.tick_count))?;
    writeln!(out, "  Avg spread: {:.2} points", s.avg_spread)?;
    writeln!(out, "  Volatility: {}", opt(s.volatility, 2))?;
    writeln!(out, "  Avg move: {} points", opt(s.avg_move_size, 2))?;
    writeln!(out, "  Activity score: {}", opt(s.activity_score, 0))
}

pub fn write_sessions<W: Write>(out: &mut W, report: &SessionReport) -> io::Result<()> {
    header(out, "TRADING SESSION ANALYSIS", 50)?;
    for (name, s) in &report.sessions {
        write_session(out, name, s)?;
    }
    writeln!(out)?;
    writeln!(out, "MOST ACTIVE SESSION: {}", report.best_session)
}

pub fn write_volatility<W: Write>(out: &mut W, report: &VolatilityReport) -> io::Result<()> {
    header(out, "VOLATILITY REGIME ANALYSIS", 50)?;
    for (regime, s) in &report.regimes {
        writeln!(out)?;
        writeln!(out, "{} Volatility Regime:", regime.as_str().to_uppercase())?;
        writeln!(out, "  Time in regime: {:.1}%", s.percentage)?;
        writeln!(out, "  Avg spread: {:.2} points", s.avg_spread)?;
        writeln!(out, "  Avg move size: {} points", opt(s.avg_move, 3))?;
        writeln!(out, "  Tick frequency: {} ticks/hour", opt(s.tick_frequency, 1))?;
    }
    if report.regimes.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "Not enough ticks per {} window to classify volatility",
            report.classification_window
        )?;
    }
    writeln!(out)?;
    for (window, mean) in &report.window_means {
        writeln!(out, "Mean {} volatility: {}", window, opt(*mean, 3))?;
    }
    Ok(())
}

pub fn write_patterns<W: Write>(
    out: &mut W,
    patterns: &IndexMap<String, PatternStats>,
) -> io::Result<()> {
    header(out, "PRICE PATTERN ANALYSIS", 50)?;
    for (tf, s) in patterns {
        writeln!(out)?;
        writeln!(out, "{} Timeframe:", tf.to_uppercase())?;
        writeln!(out, "  Avg return: {}%", opt(s.mean_return, 4))?;
        writeln!(out, "  Volatility: {}%", opt(s.volatility, 2))?;
        writeln!(out, "  Avg range: {:.2} points", s.avg_range)?;
        writeln!(out, "  Body ratio: {}", opt(s.avg_body_ratio, 2))?;
        writeln!(out, "  Trend persistence: {:.2}", s.trend_persistence)?;
        writeln!(out, "  Mean reversion: {:.2}", s.mean_reversion_strength)?;
    }
    Ok(())
}

pub fn write_recommendation<W: Write>(out: &mut W, rec: &Recommendation) -> io::Result<()> {
    header(out, "STRATEGY RECOMMENDATION", 60)?;
    writeln!(out, "SPREAD ANALYSIS: {}", rec.spread_score)?;
    writeln!(out, "VOLATILITY STRATEGY: {}", rec.volatility_strategy)?;
    writeln!(out, "MOMENTUM ANALYSIS: {}", rec.momentum_strategy)?;
    writeln!(
        out,
        "OPTIMAL SESSION: {}",
        rec.best_session.as_deref().unwrap_or("n/a")
    )?;

    writeln!(out)?;
    writeln!(out, "PRIMARY STRATEGY RECOMMENDATIONS:")?;
    if rec.strategy_blocks.is_empty() {
        writeln!(out, "No dominant edge detected")?;
    }
    for block in &rec.strategy_blocks {
        writeln!(out, "{}. {}", block.rank(), block)?;
        for note in block.notes() {
            writeln!(out, "   - {}", note)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "EA PARAMETER RECOMMENDATIONS:")?;
    writeln!(out, "StopLoss: {} points", rec.suggested_stop)?;
    writeln!(out, "TakeProfit: {} points", rec.suggested_target)?;
    writeln!(out, "MaxSpread: {} points", rec.suggested_max_spread)?;
    writeln!(out, "LotSize: Start with 0.01-0.1 (based on volatility)")?;
    if let Some(hours) = &rec.trading_hours {
        writeln!(out, "TradingHours: {} CET", hours)?;
    }
    Ok(())
}
