use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::AnalyzerError;
use crate::model::tick::{Tick, TickSeries};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y.%m.%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

#[derive(Debug, Clone)]
pub struct LoadedTicks {
    pub series: TickSeries,
    /// Rows skipped because BID or ASK was empty.
    pub dropped_rows: usize,
}

struct ColumnIndex {
    date: usize,
    time: usize,
    bid: usize,
    ask: usize,
}

/// Strip the `<...>` decoration and case from a header such as `<DATE>`.
pub fn normalize_column(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '<' || c == '>')
        .trim()
        .to_ascii_uppercase()
}

pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let joined = format!("{} {}", date.trim(), time.trim());
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
}

pub fn load_ticks(path: &Path) -> Result<LoadedTicks, AnalyzerError> {
    let file = File::open(path)?;
    let loaded = parse_ticks(file)?;
    tracing::info!(
        path = %path.display(),
        ticks = loaded.series.len(),
        dropped = loaded.dropped_rows,
        "Loaded tick file"
    );
    Ok(loaded)
}

/// Parse a tab-separated tick export. Unparseable timestamps or quotes abort the load.
pub fn parse_ticks<R: Read>(reader: R) -> Result<LoadedTicks, AnalyzerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_column).collect();
    let find = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(AnalyzerError::MissingColumn(name))
    };
    let cols = ColumnIndex {
        date: find("DATE")?,
        time: find("TIME")?,
        bid: find("BID")?,
        ask: find("ASK")?,
    };

    let mut ticks = Vec::new();
    let mut dropped_rows = 0usize;
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        let field = |i: usize| record.get(i).unwrap_or("");

        let (date, time) = (field(cols.date), field(cols.time));
        let timestamp =
            parse_timestamp(date, time).ok_or_else(|| AnalyzerError::InvalidTimestamp {
                line,
                value: format!("{} {}", date, time),
            })?;

        let bid = parse_quote(field(cols.bid), line, "BID")?;
        let ask = parse_quote(field(cols.ask), line, "ASK")?;
        match (bid, ask) {
            (Some(bid), Some(ask)) => ticks.push(Tick::new(timestamp, bid, ask)),
            _ => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        tracing::debug!(dropped = dropped_rows, "Dropped rows without both quotes");
    }

    Ok(LoadedTicks {
        series: TickSeries::new(ticks),
        dropped_rows,
    })
}

/// Field values treated as a missing quote, the same set spreadsheet and
/// dataframe exports write for "no value".
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

fn parse_quote(raw: &str, line: u64, column: &'static str) -> Result<Option<f64>, AnalyzerError> {
    if is_missing(raw) {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| AnalyzerError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        })
}
