use std::collections::VecDeque;

/// Sample standard deviation over a trailing wall-clock window.
///
/// The window for a push at time `t` covers `(t - window_ms, t]`. Missing
/// values occupy a slot in time but do not count as observations.
///
/// Mean and M2 are updated incrementally (Welford). A window holding only
/// equal values reports exactly 0 no matter how much error M2 has picked up.
#[derive(Debug, Clone)]
pub struct TimeWindowStd {
    window_ms: i64,
    buffer: VecDeque<(i64, Option<f64>)>,
    count: usize,
    mean: f64,
    m2: f64,
    last_value: Option<f64>,
    same_run: usize,
}

impl TimeWindowStd {
    pub fn new(window_ms: i64) -> Self {
        assert!(window_ms > 0, "window_ms must be > 0");
        Self {
            window_ms,
            buffer: VecDeque::new(),
            count: 0,
            mean: 0.0,
            m2: 0.0,
            last_value: None,
            same_run: 0,
        }
    }

    fn add(&mut self, v: f64) {
        self.count += 1;
        let delta = v - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (v - self.mean);

        if self.last_value == Some(v) {
            self.same_run += 1;
        } else {
            self.last_value = Some(v);
            self.same_run = 1;
        }
    }

    fn remove(&mut self, v: f64) {
        self.count -= 1;
        if self.count == 0 {
            self.mean = 0.0;
            self.m2 = 0.0;
            return;
        }
        let delta = v - self.mean;
        self.mean -= delta / self.count as f64;
        self.m2 -= delta * (v - self.mean);
        self.m2 = self.m2.max(0.0);
    }

    /// Push an observation, return the window's std if at least two values are present.
    pub fn push(&mut self, timestamp_ms: i64, value: Option<f64>) -> Option<f64> {
        self.buffer.push_back((timestamp_ms, value));
        if let Some(v) = value {
            self.add(v);
        }

        let lower = timestamp_ms - self.window_ms;
        while let Some(&(ts, old)) = self.buffer.front() {
            if ts > lower {
                break;
            }
            self.buffer.pop_front();
            if let Some(v) = old {
                self.remove(v);
            }
        }

        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        // Every present value in the window belongs to the trailing run.
        if self.same_run >= self.count {
            return Some(0.0);
        }
        let var = (self.m2 / (self.count - 1) as f64).max(0.0);
        Some(var.sqrt())
    }
}

/// Apply a [`TimeWindowStd`] over a whole series.
pub fn rolling_std(timestamps_ms: &[i64], values: &[Option<f64>], window_ms: i64) -> Vec<Option<f64>> {
    let mut roller = TimeWindowStd::new(window_ms);
    timestamps_ms
        .iter()
        .zip(values)
        .map(|(&ts, &v)| roller.push(ts, v))
        .collect()
}
