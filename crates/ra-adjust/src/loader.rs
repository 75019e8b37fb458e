//! Report loading: read, parse, decode, type-check, advisory checks.

use crate::codec;
use ra_core::{AdjustConfig, Diagnostic, Report, ReportError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A decoded report plus the advisory findings raised while loading it.
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub path: PathBuf,
    /// File contents exactly as read, kept for the optional backup.
    pub raw: String,
    pub report: Report,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read the report at `path` and decode it.
pub fn load(path: &Path, config: &AdjustConfig) -> Result<LoadedReport> {
    tracing::info!(path = %path.display(), "Reading report");
    let raw = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    let (report, diagnostics) = parse(&raw, config)?;
    tracing::info!(
        artifacts = report.results.artifacts().len(),
        warnings = diagnostics.len(),
        "Got report"
    );
    Ok(LoadedReport { path: path.to_path_buf(), raw, report, diagnostics })
}

/// Parse report text that is already in memory.
pub fn parse(text: &str, config: &AdjustConfig) -> Result<(Report, Vec<Diagnostic>)> {
    let value: Value = serde_json::from_str(text).map_err(|e| ReportError::parse("report", e))?;
    let report = Report::from_value(codec::decode(value)?)?;
    let diagnostics = check(&report, config);
    Ok((report, diagnostics))
}

/// Advisory completeness checks. Never fails.
pub fn check(report: &Report, config: &AdjustConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if report.status() != Some(config.expected_status.as_str()) {
        diagnostics.push(Diagnostic::StatusNotCompleted {
            status: report.status().map(str::to_owned),
            failure_reason: report.failure_reason().map(str::to_owned),
        });
    }

    diagnostics.extend(
        config
            .required_engines
            .iter()
            .filter(|engine| !report.engines().contains(*engine))
            .map(|engine| Diagnostic::MissingEngine { engine: engine.clone() }),
    );

    diagnostics
}
