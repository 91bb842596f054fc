use chrono::{Duration, NaiveDateTime};

use dax_tick_analyzer::analysis::volatility::{
    analyze_volatility, rolling_volatility, VolRegime, VolThresholds,
};
use dax_tick_analyzer::config::Interval;
use dax_tick_analyzer::model::tick::{Tick, TickSeries};

fn start() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-02 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

fn series_every_second(mids: &[f64]) -> TickSeries {
    let t0 = start();
    TickSeries::new(
        mids.iter()
            .enumerate()
            .map(|(i, m)| Tick::new(t0 + Duration::seconds(i as i64), m - 1.0, m + 1.0))
            .collect(),
    )
}

fn windows() -> Vec<Interval> {
    ["5min", "15min", "1h"]
        .iter()
        .map(|w| Interval::parse(w).unwrap())
        .collect()
}

#[test]
fn tercile_split_of_distinct_values() {
    let vol: Vec<Option<f64>> = (1..=100).map(|v| Some(v as f64)).collect();
    let thresholds = VolThresholds::from_series(&vol, 0.33, 0.67);

    assert!((thresholds.low.unwrap() - 33.67).abs() < 1e-9);
    assert!((thresholds.medium.unwrap() - 67.33).abs() < 1e-9);
    assert!((thresholds.high.unwrap() - 100.0).abs() < 1e-9);

    let count = |regime: VolRegime| {
        vol.iter()
            .filter(|v| thresholds.classify(**v) == regime)
            .count()
    };
    assert_eq!(count(VolRegime::Low), 33);
    assert_eq!(count(VolRegime::Medium), 34);
    assert_eq!(count(VolRegime::High), 33);
}

#[test]
fn missing_volatility_is_unknown() {
    let vol = vec![None, Some(1.0), Some(2.0), None];
    let thresholds = VolThresholds::from_series(&vol, 0.33, 0.67);
    assert_eq!(thresholds.classify(None), VolRegime::Unknown);
    assert_eq!(thresholds.classify(Some(1.0)), VolRegime::Low);
    assert_eq!(thresholds.classify(Some(2.0)), VolRegime::High);

    let empty = VolThresholds::from_series(&[None, None], 0.33, 0.67);
    assert_eq!(empty.low, None);
    assert_eq!(empty.classify(Some(1.0)), VolRegime::Unknown);
}

#[test]
fn rolling_windows_are_time_based() {
    // Two bursts one hour apart: the 5min window forgets the first burst.
    let t0 = start();
    let mut ticks = Vec::new();
    for (i, m) in [100.0, 101.0, 103.0].iter().enumerate() {
        ticks.push(Tick::new(t0 + Duration::seconds(i as i64), m - 1.0, m + 1.0));
    }
    for (i, m) in [103.0, 104.0, 104.5].iter().enumerate() {
        ticks.push(Tick::new(
            t0 + Duration::minutes(30) + Duration::seconds(i as i64),
            m - 1.0,
            m + 1.0,
        ));
    }
    let series = TickSeries::new(ticks);
    let rolled = rolling_volatility(&series, &windows());

    let five = &rolled[0];
    let hour = &rolled[2];
    assert_eq!(five[0], None);
    assert_eq!(five[1], None);
    // abs changes 1, 2
    assert!((five[2].unwrap() - 0.5_f64.sqrt()).abs() < 1e-9);
    // 30 minutes later only 0 then 1 are inside the 5min window
    assert_eq!(five[3], None);
    assert!((five[4].unwrap() - 0.5_f64.sqrt()).abs() < 1e-9);
    // the hour window still sees 1, 2, 0, 1, 0.5
    let all = [1.0, 2.0, 0.0, 1.0, 0.5];
    let mean = all.iter().sum::<f64>() / 5.0;
    let var = all.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / 4.0;
    assert!((hour[5].unwrap() - var.sqrt()).abs() < 1e-9);
}

#[test]
fn regime_report_accounts_for_classified_ticks() {
    let mids: Vec<f64> = (0..200)
        .map(|i| 18_000.0 + ((i * i) % 7) as f64 * 0.5)
        .collect();
    let series = series_every_second(&mids);
    let report = analyze_volatility(&series, &windows(), 0.33, 0.67).unwrap();

    // the first two ticks never have two observations in their window
    let classified: usize = report.regimes.values().map(|s| s.tick_count).sum();
    assert_eq!(classified, 198);
    let share: f64 = report.regimes.values().map(|s| s.percentage).sum();
    assert!((share - 99.0).abs() < 1e-9);

    let expected_freq = 200.0 / (199.0 / 3600.0);
    for s in report.regimes.values() {
        assert!((s.tick_frequency.unwrap() - expected_freq).abs() < 1e-6);
        assert!((s.avg_spread - 2.0).abs() < 1e-12);
    }
    assert!(report.thresholds.low.unwrap() <= report.thresholds.medium.unwrap());
    assert_eq!(report.classification_window, "5min");
    assert_eq!(report.window_means.len(), 3);
    assert!((report.share(VolRegime::Unknown) - 0.0).abs() < f64::EPSILON);
}

#[test]
fn too_few_ticks_leave_regimes_empty() {
    let series = series_every_second(&[100.0, 101.0]);
    let report = analyze_volatility(&series, &windows(), 0.33, 0.67).unwrap();
    assert!(report.regimes.is_empty());
    assert_eq!(report.thresholds.low, None);
    assert!((report.share(VolRegime::High) - 0.0).abs() < f64::EPSILON);
}
