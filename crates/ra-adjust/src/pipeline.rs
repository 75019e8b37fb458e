//! Adjustment pipeline — load, filter functions, filter flows, rewrite in place.

use crate::artifacts;
use crate::flows::{self, ExclusionPattern, RuleStats};
use crate::loader::{self, LoadedReport};
use ra_core::{AdjustConfig, Diagnostic, Report, ReportError, Result};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What one run changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdjustSummary {
    pub functions_dropped: usize,
    pub flows: Vec<RuleStats>,
    /// Loader warnings first, then filter counts in stage order.
    pub diagnostics: Vec<Diagnostic>,
    pub backup: Option<PathBuf>,
}

impl AdjustSummary {
    pub fn flows_dropped(&self) -> usize {
        self.flows.iter().map(|s| s.dropped).sum()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// The report adjuster. Holds a validated config and the compiled exclusion pattern.
#[derive(Debug, Clone)]
pub struct ReportAdjuster {
    config: AdjustConfig,
    pattern: ExclusionPattern,
}

impl ReportAdjuster {
    pub fn new(config: AdjustConfig) -> Result<Self> {
        config.validate()?;
        let pattern = ExclusionPattern::new(&config.pattern)?;
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &AdjustConfig {
        &self.config
    }

    pub fn pattern(&self) -> &ExclusionPattern {
        &self.pattern
    }

    /// Run both filters over an in-memory report.
    pub fn adjust(&self, report: &mut Report) -> AdjustSummary {
        let functions_dropped = artifacts::filter_functions(report);
        let flows = flows::filter_flows(report, &self.pattern, self.config.max_stack);

        let mut diagnostics = vec![Diagnostic::FunctionsFiltered { dropped: functions_dropped }];
        diagnostics.extend(flows.iter().map(|s| Diagnostic::FlowsFiltered {
            category: s.category.clone(),
            rule_type: s.rule_type.clone(),
            dropped: s.dropped,
        }));

        AdjustSummary { functions_dropped, flows, diagnostics, backup: None }
    }

    /// Adjust the report at `path` and overwrite it.
    pub fn run(&self, path: &Path) -> Result<AdjustSummary> {
        if self.config.backup && path.file_name() == Some(OsStr::new(&self.config.backup_file_name)) {
            return Err(ReportError::Config(format!(
                "backup would overwrite the report itself ({})",
                path.display()
            )));
        }

        let LoadedReport { raw, mut report, mut diagnostics, .. } = loader::load(path, &self.config)?;

        let mut summary = self.adjust(&mut report);
        diagnostics.append(&mut summary.diagnostics);
        summary.diagnostics = diagnostics;

        if self.config.backup {
            let backup = backup_path(path, &self.config.backup_file_name);
            fs::write(&backup, raw.as_bytes()).map_err(|e| ReportError::io(&backup, e))?;
            tracing::info!(path = %backup.display(), "Wrote backup of original report");
            summary.backup = Some(backup);
        }

        write_report(path, &report, self.config.pretty)?;
        tracing::info!(
            functions_dropped = summary.functions_dropped,
            flows_dropped = summary.flows_dropped(),
            "Done"
        );
        Ok(summary)
    }
}

/// Compile `config`, then adjust the report at `path` in place.
pub fn run(path: &Path, config: AdjustConfig) -> Result<AdjustSummary> {
    ReportAdjuster::new(config)?.run(path)
}

/// Sibling of the report named `file_name`.
pub fn backup_path(report_path: &Path, file_name: &str) -> PathBuf {
    report_path
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Serialize `report` to `path`, truncating whatever was there.
pub fn write_report(path: &Path, report: &Report, pretty: bool) -> Result<()> {
    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, report)
    } else {
        serde_json::to_writer(&mut writer, report)
    };
    written.map_err(|e| ReportError::io(path, e.into()))?;
    writer.flush().map_err(|e| ReportError::io(path, e))
}
