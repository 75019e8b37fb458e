//! Advisory findings collected while adjusting a report.
//!
//! None of these affect control flow; callers decide how to render them.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    StatusNotCompleted {
        status: Option<String>,
        failure_reason: Option<String>,
    },
    MissingEngine {
        engine: String,
    },
    FunctionsFiltered {
        dropped: usize,
    },
    FlowsFiltered {
        category: String,
        rule_type: String,
        dropped: usize,
    },
}

impl Diagnostic {
    /// Status or engine problems; filter counts are informational.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::StatusNotCompleted { .. } | Self::MissingEngine { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusNotCompleted { status, failure_reason } => write!(
                f,
                "Status indicates failure ({}): {}",
                status.as_deref().unwrap_or("<missing>"),
                failure_reason.as_deref().unwrap_or("no failure reason given")
            ),
            Self::MissingEngine { engine } => write!(f, "Missing engine: {engine}"),
            Self::FunctionsFiltered { dropped } => {
                write!(f, "Filtered {dropped} function artifacts")
            }
            Self::FlowsFiltered { category, rule_type, dropped } => write!(
                f,
                "Filtered {dropped} flows because they are too long/matched exclusion pattern for {category} and {rule_type}"
            ),
        }
    }
}
