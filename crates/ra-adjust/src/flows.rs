//! Flow pruning by exclusion pattern and path depth.

use ra_core::{Flow, Report, ReportError, Result};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Case-insensitive pattern that must match at the start of a file path.
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
    regex: Regex,
}

impl ExclusionPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ReportError::Pattern { pattern: pattern.to_string(), source })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Prefix match: a match must begin at offset 0, but need not consume the whole path.
    pub fn matches(&self, path: &str) -> bool {
        // leftmost-first: if any match starts at 0, `find` returns it
        self.regex.find(path).is_some_and(|m| m.start() == 0)
    }
}

impl FromStr for ExclusionPattern {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one category / rule type bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub category: String,
    pub rule_type: String,
    pub kept: usize,
    pub dropped: usize,
}

/// True when the source path or any step path matches the pattern.
pub fn matches_exclusion(flow: &Flow, pattern: &ExclusionPattern) -> bool {
    let hit = flow.file_paths().any(|p| pattern.matches(p));
    if hit {
        tracing::debug!(
            paths = ?flow.file_paths().collect::<Vec<_>>(),
            pattern = %pattern,
            "Flow matched exclusion pattern"
        );
    }
    hit
}

/// True when any path-variant is longer than `max_depth` steps.
pub fn exceeds_depth(flow: &Flow, max_depth: usize) -> bool {
    flow.longest_variant() > max_depth
}

pub fn should_drop(flow: &Flow, pattern: &ExclusionPattern, max_depth: usize) -> bool {
    matches_exclusion(flow, pattern) || exceeds_depth(flow, max_depth)
}

/// Prune flows in place. Category and rule-type keys are never removed.
pub fn filter_flows(report: &mut Report, pattern: &ExclusionPattern, max_depth: usize) -> Vec<RuleStats> {
    let Some(flows_artifacts) = report
        .results
        .flows_result
        .as_mut()
        .and_then(|r| r.flows_artifacts.as_mut())
    else {
        tracing::debug!("Report has no flows_artifacts section");
        return Vec::new();
    };

    let mut stats = Vec::new();
    for (category, rules) in flows_artifacts.iter_mut() {
        for (rule_type, flows) in rules.iter_mut() {
            let before = flows.len();
            flows.retain(|flow| !should_drop(flow, pattern, max_depth));
            let dropped = before - flows.len();
            tracing::debug!(
                "Filtered {dropped} flows because they are too long/matched exclusion pattern for {category} and {rule_type}"
            );
            stats.push(RuleStats {
                category: category.clone(),
                rule_type: rule_type.clone(),
                kept: flows.len(),
                dropped,
            });
        }
    }
    stats
}
