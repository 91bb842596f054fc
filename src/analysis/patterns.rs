use indexmap::IndexMap;
use serde::Serialize;

use crate::config::Interval;
use crate::indicator::stats;
use crate::model::candle::{resample_mid, Candle};
use crate::model::tick::TickSeries;

#[derive(Debug, Clone, Serialize)]
pub struct PatternStats {
    pub candle_count: usize,
    /// Mean candle return, in percent.
    pub mean_return: Option<f64>,
    /// Std of candle returns, in percent.
    pub volatility: Option<f64>,
    pub avg_range: f64,
    pub avg_body_ratio: Option<f64>,
    pub avg_upper_wick: f64,
    pub avg_lower_wick: f64,
    pub trend_persistence: f64,
    pub mean_reversion_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnSign {
    Up,
    Down,
    Flat,
}

impl ReturnSign {
    pub fn of(r: f64) -> Self {
        if r > 0.0 {
            ReturnSign::Up
        } else if r < 0.0 {
            ReturnSign::Down
        } else {
            ReturnSign::Flat
        }
    }
}

/// Counts over consecutive return pairs where both returns are present.
///
/// A pair touching a flat (exactly zero) return is still a valid pair, but it
/// is neither same-direction nor opposite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignPairCounts {
    pub same: usize,
    pub opposite: usize,
    pub total: usize,
}

impl SignPairCounts {
    pub fn from_returns(returns: &[Option<f64>]) -> Self {
        let mut counts = Self::default();
        for pair in returns.windows(2) {
            let (Some(prev), Some(cur)) = (pair[0], pair[1]) else {
                continue;
            };
            match (ReturnSign::of(prev), ReturnSign::of(cur)) {
                (ReturnSign::Up, ReturnSign::Up) | (ReturnSign::Down, ReturnSign::Down) => {
                    counts.same += 1
                }
                (ReturnSign::Up, ReturnSign::Down) | (ReturnSign::Down, ReturnSign::Up) => {
                    counts.opposite += 1
                }
                _ => {}
            }
            counts.total += 1;
        }
        counts
    }

    pub fn persistence(&self) -> f64 {
        ratio(self.same, self.total)
    }

    pub fn reversion(&self) -> f64 {
        ratio(self.opposite, self.total)
    }
}

fn ratio(numer: usize, denom: usize) -> f64 {
    if denom == 0 {
        return 0.0;
    }
    numer as f64 / denom as f64
}

/// Fraction of consecutive return pairs that keep the same sign.
pub fn trend_persistence(returns: &[Option<f64>]) -> f64 {
    SignPairCounts::from_returns(returns).persistence()
}

/// Fraction of consecutive return pairs that flip sign.
pub fn mean_reversion_strength(returns: &[Option<f64>]) -> f64 {
    SignPairCounts::from_returns(returns).reversion()
}

/// Close-to-close returns; the first candle has none.
pub fn candle_returns(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(candles.len());
    let mut prev_close: Option<f64> = None;
    for c in candles {
        out.push(prev_close.and_then(|p| c.return_from(p)));
        prev_close = Some(c.close);
    }
    out
}

/// Candle statistics for one timeframe, or `None` with fewer than two candles.
pub fn pattern_stats(candles: &[Candle]) -> Option<PatternStats> {
    if candles.len() < 2 {
        return None;
    }

    let returns = candle_returns(candles);
    let ranges: Vec<f64> = candles.iter().map(Candle::range).collect();
    let body_ratios: Vec<Option<f64>> = candles.iter().map(Candle::body_ratio).collect();
    let upper: Vec<f64> = candles.iter().map(Candle::upper_wick).collect();
    let lower: Vec<f64> = candles.iter().map(Candle::lower_wick).collect();
    let signs = SignPairCounts::from_returns(&returns);

    Some(PatternStats {
        candle_count: candles.len(),
        mean_return: stats::mean_present(&returns).map(|r| r * 100.0),
        volatility: stats::sample_std_present(&returns).map(|r| r * 100.0),
        avg_range: stats::mean(&ranges)?,
        avg_body_ratio: stats::mean_present(&body_ratios),
        avg_upper_wick: stats::mean(&upper)?,
        avg_lower_wick: stats::mean(&lower)?,
        trend_persistence: signs.persistence(),
        mean_reversion_strength: signs.reversion(),
    })
}

/// Resample into each timeframe and summarise. Timeframes with fewer than two
/// candles are left out.
pub fn analyze_patterns(
    series: &TickSeries,
    timeframes: &[Interval],
) -> IndexMap<String, PatternStats> {
    let mut out = IndexMap::new();
    for tf in timeframes {
        let candles = resample_mid(series.ticks(), tf.ms);
        match pattern_stats(&candles) {
            Some(s) => {
                out.insert(tf.label.clone(), s);
            }
            None => tracing::debug!(
                timeframe = %tf.label,
                candles = candles.len(),
                "Not enough candles for pattern statistics"
            ),
        }
    }
    tracing::info!(timeframes = out.len(), "Pattern pass complete");
    out
}
