use indexmap::IndexMap;
use serde::Serialize;

use crate::config::SessionWindow;
use crate::error::AnalyzerError;
use crate::indicator::stats;
use crate::model::tick::Tick;

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub start_hour: u32,
    pub end_hour: u32,
    pub tick_count: usize,
    pub avg_spread: f64,
    pub volatility: Option<f64>,
    pub avg_move_size: Option<f64>,
    pub max_move: Option<f64>,
    pub activity_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub sessions: IndexMap<String, SessionStats>,
    pub best_session: String,
}

impl SessionReport {
    pub fn best(&self) -> Option<&SessionStats> {
        self.sessions.get(&self.best_session)
    }
}

/// Summarise the ticks whose hour falls in `window`. Returns `None` when the
/// window captured nothing.
///
/// Price changes are taken between consecutive selected ticks, so the gap
/// between two days of the same session counts as one move.
pub fn session_stats(ticks: &[Tick], window: &SessionWindow) -> Option<SessionStats> {
    let selected: Vec<&Tick> = ticks
        .iter()
        .filter(|t| window.contains_hour(t.hour()))
        .collect();
    if selected.is_empty() {
        return None;
    }

    let mids: Vec<f64> = selected.iter().map(|t| t.mid).collect();
    let spreads: Vec<f64> = selected.iter().map(|t| t.spread).collect();
    let changes = stats::diff(&mids);
    let abs_changes: Vec<Option<f64>> = changes.iter().map(|c| c.map(f64::abs)).collect();

    let avg_move_size = stats::mean_present(&abs_changes);
    Some(SessionStats {
        start_hour: window.start_hour,
        end_hour: window.end_hour,
        tick_count: selected.len(),
        avg_spread: stats::mean(&spreads)?,
        volatility: stats::sample_std_present(&changes),
        avg_move_size,
        max_move: stats::max_present(&abs_changes),
        activity_score: avg_move_size.map(|m| selected.len() as f64 * m),
    })
}

/// Pick the session with the strictly highest activity score.
///
/// Earlier sessions win ties. Sessions without a defined score rank below all
/// scored ones, so the first session is kept when none has a score.
pub fn best_session(sessions: &IndexMap<String, SessionStats>) -> Option<&str> {
    let mut best: Option<(&str, Option<f64>)> = None;
    for (name, s) in sessions {
        let better = match best {
            None => true,
            Some((_, None)) => s.activity_score.is_some(),
            Some((_, Some(current))) => s.activity_score.is_some_and(|score| score > current),
        };
        if better {
            best = Some((name.as_str(), s.activity_score));
        }
    }
    best.map(|(name, _)| name)
}

pub fn analyze_sessions(
    ticks: &[Tick],
    windows: &[SessionWindow],
) -> Result<SessionReport, AnalyzerError> {
    let mut sessions = IndexMap::new();
    for window in windows {
        match session_stats(ticks, window) {
            Some(s) => {
                sessions.insert(window.name.clone(), s);
            }
            None => tracing::debug!(session = %window.name, "Session captured no ticks"),
        }
    }

    let best_session = best_session(&sessions)
        .ok_or(AnalyzerError::NoSessionActivity)?
        .to_string();
    tracing::info!(best = %best_session, sessions = sessions.len(), "Session pass complete");

    Ok(SessionReport {
        sessions,
        best_session,
    })
}
