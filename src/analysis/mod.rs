pub mod basic;
pub mod patterns;
pub mod session;
pub mod volatility;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::AnalyzerError;
use crate::recommend::Recommendation;

use basic::BasicStats;
use patterns::PatternStats;
use session::SessionReport;
use volatility::VolatilityReport;

/// Output of every analysis stage. Each slot can be written once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    basic_stats: Option<BasicStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_stats: Option<SessionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volatility_regimes: Option<VolatilityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern_stats: Option<IndexMap<String, PatternStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendations: Option<Recommendation>,
}

fn write_once<T>(slot: &mut Option<T>, value: T, stage: &'static str) -> Result<(), AnalyzerError> {
    if slot.is_some() {
        return Err(AnalyzerError::StageAlreadyRecorded(stage));
    }
    *slot = Some(value);
    Ok(())
}

impl AnalysisResults {
    pub fn record_basic_stats(&mut self, stats: BasicStats) -> Result<(), AnalyzerError> {
        write_once(&mut self.basic_stats, stats, "basic_stats")
    }

    pub fn record_sessions(&mut self, report: SessionReport) -> Result<(), AnalyzerError> {
        write_once(&mut self.session_stats, report, "session_stats")
    }

    pub fn record_volatility(&mut self, report: VolatilityReport) -> Result<(), AnalyzerError> {
        write_once(&mut self.volatility_regimes, report, "volatility_regimes")
    }

    pub fn record_patterns(
        &mut self,
        patterns: IndexMap<String, PatternStats>,
    ) -> Result<(), AnalyzerError> {
        write_once(&mut self.pattern_stats, patterns, "pattern_stats")
    }

    pub fn record_recommendation(&mut self, rec: Recommendation) -> Result<(), AnalyzerError> {
        write_once(&mut self.recommendations, rec, "recommendations")
    }

    pub fn basic_stats(&self) -> Option<&BasicStats> {
        self.basic_stats.as_ref()
    }

    pub fn sessions(&self) -> Option<&SessionReport> {
        self.session_stats.as_ref()
    }

    pub fn volatility(&self) -> Option<&VolatilityReport> {
        self.volatility_regimes.as_ref()
    }

    pub fn patterns(&self) -> Option<&IndexMap<String, PatternStats>> {
        self.pattern_stats.as_ref()
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendations.as_ref()
    }
}
