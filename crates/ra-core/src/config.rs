use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Engines every complete report is expected to list.
pub const REQUIRED_ENGINES: &[&str] = &[
    "class_members",
    "container",
    "rest_api",
    "functions",
    "TaintEngine",
    "persistency",
    "sensitivity_scorer",
    "GitURLEngine",
    "GitBlameEngine",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustConfig {
    /// Exclusion pattern, matched case-insensitively from the start of each file path.
    pub pattern: String,
    /// Longest allowed path-variant in a flow.
    pub max_stack: usize,
    pub required_engines: Vec<String>,
    pub expected_status: String,
    /// Copy the untouched report next to the original before overwriting it.
    pub backup: bool,
    pub backup_file_name: String,
    pub pretty: bool,
}

impl AdjustConfig {
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_max_stack(mut self, max_stack: usize) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_required_engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_engines = engines.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_stack == 0 {
            return Err(ReportError::Config("max_stack must be at least 1".into()));
        }
        if self.backup && self.backup_file_name.trim().is_empty() {
            return Err(ReportError::Config("backup_file_name must not be empty".into()));
        }
        if self.backup_file_name.chars().any(std::path::is_separator) {
            return Err(ReportError::Config(format!(
                "backup_file_name must be a bare file name, got {:?}",
                self.backup_file_name
            )));
        }
        Ok(())
    }
}

impl Default for AdjustConfig {
    fn default() -> Self {
        Self {
            pattern: ".*test.*".into(),
            max_stack: 20,
            required_engines: REQUIRED_ENGINES.iter().map(|e| e.to_string()).collect(),
            expected_status: "Completed".into(),
            backup: false,
            backup_file_name: "original_report.json".into(),
            pretty: false,
        }
    }
}
