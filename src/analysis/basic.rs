use std::collections::HashSet;

use serde::Serialize;

use crate::error::AnalyzerError;
use crate::indicator::stats;
use crate::model::tick::TickSeries;

#[derive(Debug, Clone, Serialize)]
pub struct BasicStats {
    pub total_ticks: usize,
    pub trading_days: usize,
    pub avg_ticks_per_day: f64,
    pub price_range: PriceRange,
    pub spread_stats: SpreadStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpreadStats {
    pub avg_spread: f64,
    pub avg_spread_bps: f64,
    pub min_spread: f64,
    pub max_spread: f64,
    pub min_spread_bps: f64,
    pub max_spread_bps: f64,
}

pub fn basic_statistics(series: &TickSeries) -> Result<BasicStats, AnalyzerError> {
    let ticks = series.ticks();
    if ticks.is_empty() {
        return Err(AnalyzerError::EmptySeries);
    }

    let trading_days = ticks.iter().map(|t| t.date()).collect::<HashSet<_>>().len();
    let mids = series.mids();
    let spreads: Vec<f64> = ticks.iter().map(|t| t.spread).collect();
    let spreads_bps: Vec<f64> = ticks.iter().map(|t| t.spread_bps).collect();

    let (min, max) = (
        stats::min(&mids).ok_or(AnalyzerError::EmptySeries)?,
        stats::max(&mids).ok_or(AnalyzerError::EmptySeries)?,
    );
    let summary = |values: &[f64]| -> Result<(f64, f64, f64), AnalyzerError> {
        Ok((
            stats::mean(values).ok_or(AnalyzerError::EmptySeries)?,
            stats::min(values).ok_or(AnalyzerError::EmptySeries)?,
            stats::max(values).ok_or(AnalyzerError::EmptySeries)?,
        ))
    };
    let (avg_spread, min_spread, max_spread) = summary(&spreads)?;
    let (avg_spread_bps, min_spread_bps, max_spread_bps) = summary(&spreads_bps)?;

    Ok(BasicStats {
        total_ticks: ticks.len(),
        trading_days,
        avg_ticks_per_day: ticks.len() as f64 / trading_days as f64,
        price_range: PriceRange {
            min,
            max,
            range: max - min,
        },
        spread_stats: SpreadStats {
            avg_spread,
            avg_spread_bps,
            min_spread,
            max_spread,
            min_spread_bps,
            max_spread_bps,
        },
    })
}
