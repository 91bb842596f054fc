use std::fmt;

use serde::{Serialize, Serializer};

use crate::analysis::volatility::VolRegime;
use crate::analysis::AnalysisResults;
use crate::config::{RecommendConfig, SessionWindow};
use crate::error::AnalyzerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadViability {
    Excellent,
    Good,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityStrategy {
    Breakout,
    MeanReversion,
    Hybrid,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumStrategy {
    TrendFollowing,
    MeanReversion,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyBlock {
    ScalpingMomentum,
    MeanReversionScalping,
    Breakout,
}

impl SpreadViability {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpreadViability::Excellent => "EXCELLENT for scalping",
            SpreadViability::Good => "GOOD for scalping",
            SpreadViability::Poor => "POOR for scalping - consider swing trading",
        }
    }
}

impl VolatilityStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityStrategy::Breakout => "BREAKOUT strategy - high volatility periods",
            VolatilityStrategy::MeanReversion => {
                "MEAN REVERSION strategy - low volatility dominates"
            }
            VolatilityStrategy::Hybrid => "HYBRID strategy - mixed volatility regimes",
            VolatilityStrategy::Undetermined => "Unable to determine",
        }
    }
}

impl MomentumStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentumStrategy::TrendFollowing => "MOMENTUM/TREND FOLLOWING",
            MomentumStrategy::MeanReversion => "MEAN REVERSION",
            MomentumStrategy::Balanced => "BALANCED (trend + reversion)",
        }
    }
}

impl StrategyBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyBlock::ScalpingMomentum => "SCALPING + MOMENTUM",
            StrategyBlock::MeanReversionScalping => "MEAN REVERSION SCALPING",
            StrategyBlock::Breakout => "BREAKOUT STRATEGY",
        }
    }

    /// Position in the printed list. Breakout is always the second entry.
    pub fn rank(&self) -> u8 {
        match self {
            StrategyBlock::ScalpingMomentum | StrategyBlock::MeanReversionScalping => 1,
            StrategyBlock::Breakout => 2,
        }
    }

    pub fn notes(&self) -> &'static [&'static str] {
        match self {
            StrategyBlock::ScalpingMomentum => &[
                "1-5 minute timeframes",
                "Tight stops (10-20 points)",
                "Quick profits (15-30 points)",
                "Trade during high activity sessions",
            ],
            StrategyBlock::MeanReversionScalping => &[
                "Trade against short-term moves",
                "Use support/resistance levels",
                "Smaller position sizes",
                "Quick exits on reversal",
            ],
            StrategyBlock::Breakout => &[
                "Trade volatility expansions",
                "Use wider stops (30-50 points)",
                "Target larger moves (50-100 points)",
                "Focus on session opens/news",
            ],
        }
    }
}

macro_rules! label_impls {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    )*};
}

label_impls!(SpreadViability, VolatilityStrategy, MomentumStrategy, StrategyBlock);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub spread_score: SpreadViability,
    pub volatility_strategy: VolatilityStrategy,
    pub momentum_strategy: MomentumStrategy,
    pub best_session: Option<String>,
    /// EA trading window for the best session, e.g. "08:00-17:00".
    pub trading_hours: Option<String>,
    pub avg_trend_persistence: f64,
    pub avg_mean_reversion: f64,
    pub high_volatility_share: f64,
    pub suggested_stop: i64,
    pub suggested_target: i64,
    pub suggested_max_spread: i64,
    pub strategy_blocks: Vec<StrategyBlock>,
}

pub fn classify_spread(avg_spread: f64, cfg: &RecommendConfig) -> SpreadViability {
    if avg_spread < cfg.excellent_spread {
        SpreadViability::Excellent
    } else if avg_spread < cfg.good_spread {
        SpreadViability::Good
    } else {
        SpreadViability::Poor
    }
}

pub fn classify_volatility(
    high_share: f64,
    low_share: f64,
    cfg: &RecommendConfig,
) -> VolatilityStrategy {
    if high_share > cfg.breakout_high_vol_pct {
        VolatilityStrategy::Breakout
    } else if low_share > cfg.reversion_low_vol_pct {
        VolatilityStrategy::MeanReversion
    } else {
        VolatilityStrategy::Hybrid
    }
}

pub fn classify_momentum(avg_trend: f64, avg_reversion: f64, cfg: &RecommendConfig) -> MomentumStrategy {
    if avg_trend > cfg.directional_score {
        MomentumStrategy::TrendFollowing
    } else if avg_reversion > cfg.directional_score {
        MomentumStrategy::MeanReversion
    } else {
        MomentumStrategy::Balanced
    }
}

/// `max(floor, trunc(avg_spread * mult))`.
pub fn spread_scaled(avg_spread: f64, mult: f64, floor: i64) -> i64 {
    floor.max((avg_spread * mult).trunc() as i64)
}

pub fn strategy_blocks(
    avg_spread: f64,
    avg_trend: f64,
    avg_reversion: f64,
    high_share: f64,
    cfg: &RecommendConfig,
) -> Vec<StrategyBlock> {
    let mut blocks = Vec::new();
    if avg_spread < cfg.scalping_block_spread && avg_trend > cfg.scalping_block_score {
        blocks.push(StrategyBlock::ScalpingMomentum);
    } else if avg_reversion > cfg.scalping_block_score {
        blocks.push(StrategyBlock::MeanReversionScalping);
    }
    if high_share > cfg.breakout_block_high_vol_pct {
        blocks.push(StrategyBlock::Breakout);
    }
    blocks
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Turn the recorded analysis into a strategy recommendation.
///
/// Basic statistics and the volatility stage must have run. Sessions and
/// patterns are optional; without patterns both directional scores are 0.
pub fn recommend_strategy(
    results: &AnalysisResults,
    cfg: &RecommendConfig,
    scalping_timeframes: &[String],
) -> Result<Recommendation, AnalyzerError> {
    let basic = results
        .basic_stats()
        .ok_or(AnalyzerError::MissingStage("basic_stats"))?;
    let vol = results
        .volatility()
        .ok_or(AnalyzerError::MissingStage("volatility_regimes"))?;

    let avg_spread = basic.spread_stats.avg_spread;
    let high_share = vol.share(VolRegime::High);
    let volatility_strategy = if vol.regimes.is_empty() {
        VolatilityStrategy::Undetermined
    } else {
        classify_volatility(high_share, vol.share(VolRegime::Low), cfg)
    };

    let (trend_scores, reversion_scores): (Vec<f64>, Vec<f64>) = results
        .patterns()
        .into_iter()
        .flat_map(|p| p.iter())
        .filter(|(tf, _)| scalping_timeframes.iter().any(|s| s == *tf))
        .map(|(_, s)| (s.trend_persistence, s.mean_reversion_strength))
        .unzip();
    let trading_hours = results.sessions().and_then(|report| {
        let name = &report.best_session;
        if !cfg.trading_hours_sessions.iter().any(|s| s == name) {
            return None;
        }
        report
            .best()
            .map(|s| SessionWindow::new(name, s.start_hour, s.end_hour).label())
    });

    let avg_trend = average(&trend_scores);
    let avg_reversion = average(&reversion_scores);

    Ok(Recommendation {
        spread_score: classify_spread(avg_spread, cfg),
        volatility_strategy,
        momentum_strategy: classify_momentum(avg_trend, avg_reversion, cfg),
        best_session: results.sessions().map(|s| s.best_session.clone()),
        trading_hours,
        avg_trend_persistence: avg_trend,
        avg_mean_reversion: avg_reversion,
        high_volatility_share: high_share,
        suggested_stop: spread_scaled(avg_spread, cfg.stop_spread_mult, cfg.min_stop),
        suggested_target: spread_scaled(avg_spread, cfg.target_spread_mult, cfg.min_target),
        suggested_max_spread: spread_scaled(avg_spread, cfg.max_spread_mult, cfg.min_max_spread),
        strategy_blocks: strategy_blocks(avg_spread, avg_trend, avg_reversion, high_share, cfg),
    })
}
