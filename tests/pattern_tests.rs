use chrono::NaiveDateTime;

use dax_tick_analyzer::analysis::patterns::{
    analyze_patterns, candle_returns, mean_reversion_strength, pattern_stats, trend_persistence,
    SignPairCounts,
};
use dax_tick_analyzer::config::Interval;
use dax_tick_analyzer::model::candle::resample_mid;
use dax_tick_analyzer::model::tick::{Tick, TickSeries};

fn tick(ts: &str, mid: f64) -> Tick {
    Tick::new(
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
        mid - 0.5,
        mid + 0.5,
    )
}

fn sample_series() -> TickSeries {
    TickSeries::new(vec![
        tick("2024-01-02 09:00:10", 100.0),
        tick("2024-01-02 09:00:50", 102.0),
        tick("2024-01-02 09:01:30", 101.0),
        tick("2024-01-02 09:03:05", 103.0),
    ])
}

#[test]
fn resample_drops_empty_windows() {
    let candles = resample_mid(sample_series().ticks(), 60_000);
    assert_eq!(candles.len(), 3);

    let first = &candles[0];
    assert!((first.open - 100.0).abs() < f64::EPSILON);
    assert!((first.high - 102.0).abs() < f64::EPSILON);
    assert!((first.low - 100.0).abs() < f64::EPSILON);
    assert!((first.close - 102.0).abs() < f64::EPSILON);
    assert_eq!(first.open_time % 60_000, 0);
    assert_eq!(candles[2].open_time - candles[1].open_time, 120_000);
}

#[test]
fn one_minute_pattern_statistics() {
    let candles = resample_mid(sample_series().ticks(), 60_000);
    let stats = pattern_stats(&candles).unwrap();

    let r1 = 101.0 / 102.0 - 1.0;
    let r2 = 103.0 / 101.0 - 1.0;
    assert_eq!(stats.candle_count, 3);
    assert!((stats.mean_return.unwrap() - (r1 + r2) / 2.0 * 100.0).abs() < 1e-9);
    assert!(stats.volatility.is_some());
    assert!((stats.avg_range - 2.0 / 3.0).abs() < 1e-12);
    // flat candles have no body ratio and are skipped
    assert!((stats.avg_body_ratio.unwrap() - 1.0).abs() < 1e-12);
    assert!((stats.avg_upper_wick - 0.0).abs() < 1e-12);
    assert!((stats.trend_persistence - 0.0).abs() < f64::EPSILON);
    assert!((stats.mean_reversion_strength - 1.0).abs() < f64::EPSILON);
}

#[test]
fn timeframes_with_a_single_candle_are_skipped() {
    let timeframes: Vec<Interval> = ["1min", "5min"]
        .iter()
        .map(|s| Interval::parse(s).unwrap())
        .collect();
    let patterns = analyze_patterns(&sample_series(), &timeframes);
    assert!(patterns.contains_key("1min"));
    assert!(!patterns.contains_key("5min"));
    assert!(pattern_stats(&[]).is_none());
}

#[test]
fn zero_returns_count_as_pairs_but_match_neither_side() {
    let returns = vec![None, Some(1.0), Some(2.0), Some(-1.0), Some(-2.0), Some(0.0), Some(3.0)];
    let counts = SignPairCounts::from_returns(&returns);
    assert_eq!(
        counts,
        SignPairCounts {
            same: 2,
            opposite: 1,
            total: 5
        }
    );
    assert!((trend_persistence(&returns) - 0.4).abs() < 1e-12);
    assert!((mean_reversion_strength(&returns) - 0.2).abs() < 1e-12);
}

#[test]
fn without_zero_returns_the_two_scores_sum_to_one() {
    let returns = vec![None, Some(0.1), Some(-0.3), Some(-0.2), Some(0.5), Some(0.4), Some(0.1)];
    let sum = trend_persistence(&returns) + mean_reversion_strength(&returns);
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn missing_returns_break_pairs() {
    let returns = vec![Some(1.0), None, Some(1.0), Some(1.0)];
    assert_eq!(SignPairCounts::from_returns(&returns).total, 1);
    assert!((trend_persistence(&returns) - 1.0).abs() < f64::EPSILON);
    assert!((trend_persistence(&[]) - 0.0).abs() < f64::EPSILON);
    assert!((mean_reversion_strength(&[Some(1.0)]) - 0.0).abs() < f64::EPSILON);
}

#[test]
fn first_candle_has_no_return() {
    let candles = resample_mid(sample_series().ticks(), 60_000);
    let returns = candle_returns(&candles);
    assert_eq!(returns.len(), 3);
    assert_eq!(returns[0], None);
    assert!(returns[1].unwrap() < 0.0);
}
