use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON in {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to decode {field}: {reason}")]
    Decode { field: String, reason: String },
    #[error("Invalid exclusion pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Schema mismatch at {at}: {message}")]
    Schema { at: String, message: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse { context: context.into(), source }
    }

    pub fn decode(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode { field: field.into(), reason: reason.to_string() }
    }

    pub fn schema(at: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema { at: at.into(), message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
