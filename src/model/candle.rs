use crate::model::tick::Tick;

#[derive(Debug, Clone)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub open_time: i64,
    pub close_time: i64,
}

impl Candle {
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Body as a fraction of the full range; undefined for a flat candle.
    pub fn body_ratio(&self) -> Option<f64> {
        let range = self.range();
        if range == 0.0 {
            None
        } else {
            Some(self.body() / range)
        }
    }

    /// Percentage change of this close against `prev_close`.
    pub fn return_from(&self, prev_close: f64) -> Option<f64> {
        let r = self.close / prev_close - 1.0;
        r.is_finite().then_some(r)
    }
}

/// Aggregates mid-prices into a single candle over a time interval.
#[derive(Debug, Clone)]
pub struct CandleBuilder {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub open_time: i64,
    pub close_time: i64,
}

impl CandleBuilder {
    /// Start a new candle. The bucket is aligned to the interval.
    pub fn new(price: f64, timestamp_ms: i64, interval_ms: i64) -> Self {
        assert!(interval_ms > 0, "interval_ms must be > 0");
        let open_time = timestamp_ms - timestamp_ms.rem_euclid(interval_ms);
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            open_time,
            close_time: open_time + interval_ms,
        }
    }

    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    /// Check if a timestamp belongs to this candle's time bucket.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.open_time && timestamp_ms < self.close_time
    }

    pub fn finish(&self) -> Candle {
        Candle {
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            open_time: self.open_time,
            close_time: self.close_time,
        }
    }
}

/// Resample tick mid-prices into calendar-aligned OHLC candles.
///
/// Windows without ticks produce no candle. Ticks are consumed in file order,
/// so a tick that falls outside the current bucket closes it and opens the
/// bucket that contains the tick.
pub fn resample_mid(ticks: &[Tick], interval_ms: i64) -> Vec<Candle> {
    let mut candles = Vec::new();
    let mut current: Option<CandleBuilder> = None;

    for tick in ticks {
        let ts = tick.timestamp_ms();
        match current.as_mut() {
            Some(builder) if builder.contains(ts) => builder.update(tick.mid),
            _ => {
                if let Some(done) = current.take() {
                    candles.push(done.finish());
                }
                current = Some(CandleBuilder::new(tick.mid, ts, interval_ms));
            }
        }
    }
    if let Some(done) = current {
        candles.push(done.finish());
    }
    candles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candle_builder_basics() {
        let mut cb = CandleBuilder::new(100.0, 60_500, 60_000);
        assert_eq!(cb.open_time, 60_000);
        assert_eq!(cb.close_time, 120_000);
        assert!(cb.contains(60_500));
        assert!(cb.contains(119_999));
        assert!(!cb.contains(120_000));

        cb.update(105.0);
        cb.update(95.0);
        cb.update(102.0);

        let candle = cb.finish();
        assert!((candle.open - 100.0).abs() < f64::EPSILON);
        assert!((candle.high - 105.0).abs() < f64::EPSILON);
        assert!((candle.low - 95.0).abs() < f64::EPSILON);
        assert!((candle.close - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn candle_geometry() {
        let candle = Candle {
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 95.0,
            open_time: 0,
            close_time: 60_000,
        };
        assert!((candle.range() - 20.0).abs() < f64::EPSILON);
        assert!((candle.body() - 5.0).abs() < f64::EPSILON);
        assert!((candle.upper_wick() - 10.0).abs() < f64::EPSILON);
        assert!((candle.lower_wick() - 5.0).abs() < f64::EPSILON);
        assert!((candle.body_ratio().unwrap() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_candle_has_no_body_ratio() {
        let candle = CandleBuilder::new(100.0, 0, 60_000).finish();
        assert_eq!(candle.body_ratio(), None);
    }

    #[test]
    fn negative_timestamps_align_downwards() {
        let cb = CandleBuilder::new(1.0, -1, 60_000);
        assert_eq!(cb.open_time, -60_000);
        assert_eq!(cb.close_time, 0);
    }

    #[test]
    #[should_panic(expected = "interval_ms must be > 0")]
    fn candle_builder_rejects_zero_interval() {
        let _ = CandleBuilder::new(100.0, 60_500, 0);
    }
}
