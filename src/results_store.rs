use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::AnalysisResults;

/// Write the results as pretty JSON. Undefined statistics become `null`.
pub fn save_results(path: &Path, results: &AnalysisResults) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(results)
        .context("failed to serialize analysis results json")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
