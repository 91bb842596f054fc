use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::Interval;
use crate::error::AnalyzerError;
use crate::indicator::rolling_std::rolling_std;
use crate::indicator::stats;
use crate::model::tick::TickSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolRegime {
    Unknown,
    Low,
    Medium,
    High,
}

impl VolRegime {
    /// Regimes that are reported; `Unknown` never is.
    pub const REPORTED: [VolRegime; 3] = [VolRegime::Low, VolRegime::Medium, VolRegime::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            VolRegime::Unknown => "unknown",
            VolRegime::Low => "low",
            VolRegime::Medium => "medium",
            VolRegime::High => "high",
        }
    }
}

impl fmt::Display for VolRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cut points of the classification series: `low` and `medium` are the
/// configured lower/upper quantiles, `high` is the maximum.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct VolThresholds {
    pub low: Option<f64>,
    pub medium: Option<f64>,
    pub high: Option<f64>,
}

impl VolThresholds {
    pub fn from_series(vol: &[Option<f64>], low_q: f64, high_q: f64) -> Self {
        Self {
            low: stats::quantile(vol, low_q),
            medium: stats::quantile(vol, high_q),
            high: stats::quantile(vol, 1.0),
        }
    }

    pub fn classify(&self, vol: Option<f64>) -> VolRegime {
        match (vol, self.low, self.medium) {
            (Some(v), Some(low), Some(medium)) => {
                if v <= low {
                    VolRegime::Low
                } else if v <= medium {
                    VolRegime::Medium
                } else {
                    VolRegime::High
                }
            }
            _ => VolRegime::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegimeStats {
    pub tick_count: usize,
    /// Share of all ticks, in percent.
    pub percentage: f64,
    pub avg_spread: f64,
    pub avg_move: Option<f64>,
    /// count / (share * elapsed hours). Algebraically this collapses to total
    /// ticks per elapsed hour, so it is the same for every regime.
    pub tick_frequency: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolatilityReport {
    pub regimes: IndexMap<VolRegime, RegimeStats>,
    #[serde(rename = "vol_thresholds")]
    pub thresholds: VolThresholds,
    pub classification_window: String,
    pub window_means: IndexMap<String, Option<f64>>,
}

impl VolatilityReport {
    /// Percentage of ticks spent in `regime`, 0 when the regime never occurred.
    pub fn share(&self, regime: VolRegime) -> f64 {
        self.regimes.get(&regime).map_or(0.0, |s| s.percentage)
    }
}

/// Rolling std of absolute tick-to-tick changes, one series per window.
pub fn rolling_volatility(series: &TickSeries, windows: &[Interval]) -> Vec<Vec<Option<f64>>> {
    let timestamps = series.timestamps_ms();
    let abs_changes: Vec<Option<f64>> = series
        .price_changes()
        .into_iter()
        .map(|c| c.map(f64::abs))
        .collect();
    windows
        .iter()
        .map(|w| rolling_std(&timestamps, &abs_changes, w.ms))
        .collect()
}

pub fn analyze_volatility(
    series: &TickSeries,
    windows: &[Interval],
    low_quantile: f64,
    high_quantile: f64,
) -> Result<VolatilityReport, AnalyzerError> {
    if series.is_empty() {
        return Err(AnalyzerError::EmptySeries);
    }
    let classification_window = windows
        .first()
        .ok_or(AnalyzerError::NotConfigured("volatility window"))?;

    let rolled = rolling_volatility(series, windows);
    let window_means: IndexMap<String, Option<f64>> = windows
        .iter()
        .zip(&rolled)
        .map(|(w, vol)| (w.label.clone(), stats::mean_present(vol)))
        .collect();

    let vol = &rolled[0];
    let thresholds = VolThresholds::from_series(vol, low_quantile, high_quantile);
    let labels: Vec<VolRegime> = vol.iter().map(|v| thresholds.classify(*v)).collect();

    let ticks = series.ticks();
    let abs_changes: Vec<Option<f64>> = series
        .price_changes()
        .into_iter()
        .map(|c| c.map(f64::abs))
        .collect();
    let total = ticks.len() as f64;
    let elapsed_hours = series.elapsed_hours();

    let mut regimes = IndexMap::new();
    for regime in VolRegime::REPORTED {
        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| (*l == regime).then_some(i))
            .collect();
        if members.is_empty() {
            continue;
        }

        let count = members.len() as f64;
        let share = count / total;
        let spreads: Vec<f64> = members.iter().map(|&i| ticks[i].spread).collect();
        let moves: Vec<Option<f64>> = members.iter().map(|&i| abs_changes[i]).collect();
        let regime_hours = share * elapsed_hours;

        regimes.insert(
            regime,
            RegimeStats {
                tick_count: members.len(),
                percentage: share * 100.0,
                avg_spread: spreads.iter().sum::<f64>() / count,
                avg_move: stats::mean_present(&moves),
                tick_frequency: (regime_hours > 0.0).then(|| count / regime_hours),
            },
        );
    }

    tracing::info!(
        window = %classification_window.label,
        regimes = regimes.len(),
        low = ?thresholds.low,
        medium = ?thresholds.medium,
        "Volatility pass complete"
    );

    Ok(VolatilityReport {
        regimes,
        thresholds,
        classification_window: classification_window.label.clone(),
        window_means,
    })
}
