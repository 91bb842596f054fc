use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("tick series is empty")]
    EmptySeries,

    #[error("no trading session captured any ticks")]
    NoSessionActivity,

    #[error("no {0} configured")]
    NotConfigured(&'static str),

    #[error("analysis stage '{0}' has not been run")]
    MissingStage(&'static str),

    #[error("analysis stage '{0}' was already recorded")]
    StageAlreadyRecorded(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
