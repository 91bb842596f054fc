use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// One bid/ask quote with its derived mid-price and spread columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub timestamp: NaiveDateTime,
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
    pub spread: f64,
    pub spread_bps: f64,
}

impl Tick {
    /// Build a tick from raw quotes. Inverted quotes (bid > ask) are kept as-is
    /// and simply produce a negative spread.
    pub fn new(timestamp: NaiveDateTime, bid: f64, ask: f64) -> Self {
        let mid = (bid + ask) / 2.0;
        let spread = ask - bid;
        Self {
            timestamp,
            bid,
            ask,
            mid,
            spread,
            spread_bps: spread / mid * 10_000.0,
        }
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.and_utc().timestamp_millis()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Ticks in file order. The series is never re-sorted after loading.
#[derive(Debug, Clone, Default)]
pub struct TickSeries {
    ticks: Vec<Tick>,
}

impl TickSeries {
    pub fn new(ticks: Vec<Tick>) -> Self {
        Self { ticks }
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.ticks.iter().map(|t| t.timestamp).min()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.ticks.iter().map(|t| t.timestamp).max()
    }

    /// Hours between the earliest and the latest timestamp.
    pub fn elapsed_hours(&self) -> f64 {
        match (self.first_timestamp(), self.last_timestamp()) {
            (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 3_600_000.0,
            _ => 0.0,
        }
    }

    pub fn mids(&self) -> Vec<f64> {
        self.ticks.iter().map(|t| t.mid).collect()
    }

    pub fn timestamps_ms(&self) -> Vec<i64> {
        self.ticks.iter().map(Tick::timestamp_ms).collect()
    }

    /// Tick-to-tick change of the mid-price; the first tick has none.
    pub fn price_changes(&self) -> Vec<Option<f64>> {
        crate::indicator::stats::diff(&self.mids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn derived_columns() {
        let tick = Tick::new(ts("2024-01-01 09:00:00"), 18500.0, 18502.0);
        assert!((tick.mid - 18501.0).abs() < f64::EPSILON);
        assert!((tick.spread - 2.0).abs() < f64::EPSILON);
        assert!((tick.spread_bps - 2.0 / 18501.0 * 10_000.0).abs() < 1e-12);
        assert_eq!(tick.hour(), 9);
    }

    #[test]
    fn elapsed_hours_uses_extremes() {
        let series = TickSeries::new(vec![
            Tick::new(ts("2024-01-01 10:00:00"), 1.0, 2.0),
            Tick::new(ts("2024-01-01 09:00:00"), 1.0, 2.0),
            Tick::new(ts("2024-01-01 11:30:00"), 1.0, 2.0),
        ]);
        assert!((series.elapsed_hours() - 2.5).abs() < 1e-12);
        assert_eq!(series.first_timestamp(), Some(ts("2024-01-01 09:00:00")));
    }
}
