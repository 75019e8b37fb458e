pub mod config;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use config::{AdjustConfig, REQUIRED_ENGINES};
pub use diagnostics::Diagnostic;
pub use error::{ReportError, Result};
pub use types::{Artifact, ArtifactKind, Field, Flow, FlowsArtifacts, Location, PathStep, Report};
