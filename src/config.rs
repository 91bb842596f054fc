use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sessions: Vec<SessionWindow>,
    pub volatility: VolatilityConfig,
    pub patterns: PatternConfig,
    pub recommend: RecommendConfig,
    pub logging: LoggingConfig,
}

/// Hour-of-day window, half-open `[start_hour, end_hour)`.
/// `start_hour >= end_hour` wraps past midnight.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionWindow {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Rolling windows; the first one drives regime classification.
    pub windows: Vec<String>,
    pub low_quantile: f64,
    pub high_quantile: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub timeframes: Vec<String>,
    pub scalping_timeframes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub excellent_spread: f64,
    pub good_spread: f64,
    pub breakout_high_vol_pct: f64,
    pub reversion_low_vol_pct: f64,
    pub directional_score: f64,
    pub scalping_block_spread: f64,
    pub scalping_block_score: f64,
    pub breakout_block_high_vol_pct: f64,
    pub stop_spread_mult: f64,
    pub min_stop: i64,
    pub target_spread_mult: f64,
    pub min_target: i64,
    pub max_spread_mult: f64,
    pub min_max_spread: i64,
    /// Best sessions for which an EA trading-hours window is suggested.
    pub trading_hours_sessions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl SessionWindow {
    pub fn new(name: &str, start_hour: u32, end_hour: u32) -> Self {
        Self {
            name: name.to_string(),
            start_hour,
            end_hour,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    pub fn label(&self) -> String {
        format!("{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sessions: vec![
                SessionWindow::new("Asian", 0, 8),
                SessionWindow::new("European", 8, 17),
                SessionWindow::new("US_Overlap", 14, 17),
                SessionWindow::new("After_Hours", 17, 24),
            ],
            volatility: VolatilityConfig::default(),
            patterns: PatternConfig::default(),
            recommend: RecommendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            windows: vec!["5min".to_string(), "15min".to_string(), "1h".to_string()],
            low_quantile: 0.33,
            high_quantile: 0.67,
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            timeframes: ["1min", "5min", "15min", "30min", "1h"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scalping_timeframes: vec!["1min".to_string(), "5min".to_string()],
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            excellent_spread: 2.0,
            good_spread: 4.0,
            breakout_high_vol_pct: 40.0,
            reversion_low_vol_pct: 50.0,
            directional_score: 0.55,
            scalping_block_spread: 3.0,
            scalping_block_score: 0.52,
            breakout_block_high_vol_pct: 30.0,
            stop_spread_mult: 8.0,
            min_stop: 20,
            target_spread_mult: 15.0,
            min_target: 40,
            max_spread_mult: 2.0,
            min_max_spread: 5,
            trading_hours_sessions: vec!["European".to_string(), "US_Overlap".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A parsed interval string, keeping the configured spelling as its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub label: String,
    pub ms: i64,
}

impl Interval {
    pub fn parse(s: &str) -> Result<Self> {
        Ok(Self {
            label: s.trim().to_string(),
            ms: parse_interval_ms(s)?,
        })
    }
}

fn parse_intervals(values: &[String]) -> Result<Vec<Interval>> {
    values.iter().map(|s| Interval::parse(s)).collect()
}

impl VolatilityConfig {
    pub fn intervals(&self) -> Result<Vec<Interval>> {
        parse_intervals(&self.windows).context("volatility.windows is invalid")
    }
}

impl PatternConfig {
    pub fn intervals(&self) -> Result<Vec<Interval>> {
        parse_intervals(&self.timeframes).context("patterns.timeframes is invalid")
    }
}

/// Parse an interval such as "30s", "5m", "5min", "1h" or "1d" into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<i64> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(split);
    if num_str.is_empty() || suffix.is_empty() {
        bail!("invalid interval '{}': expected format like '5min'", s);
    }

    let n: i64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" | "min" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/min/h/d/w",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

fn config_path() -> PathBuf {
    std::env::var("DTA_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/default.toml"))
}

impl Config {
    /// Load the configuration file, falling back to built-in defaults when it is absent.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for session in &self.sessions {
            if session.start_hour > 24 || session.end_hour > 24 {
                bail!(
                    "session '{}': hours must be within 0..=24",
                    session.name
                );
            }
        }

        if self.volatility.windows.is_empty() {
            bail!("volatility.windows must not be empty");
        }
        self.volatility.intervals()?;
        let (lo, hi) = (self.volatility.low_quantile, self.volatility.high_quantile);
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
            bail!(
                "volatility quantiles must satisfy 0 <= low < high <= 1 (got {} / {})",
                lo,
                hi
            );
        }

        if self.patterns.timeframes.is_empty() {
            bail!("patterns.timeframes must not be empty");
        }
        self.patterns.intervals()?;
        for label in &self.patterns.scalping_timeframes {
            if !self
                .patterns
                .timeframes
                .iter()
                .any(|tf| tf.trim() == label.trim())
            {
                bail!(
                    "patterns.scalping_timeframes entry '{}' is not listed in patterns.timeframes",
                    label
                );
            }
        }
        Ok(())
    }
}
