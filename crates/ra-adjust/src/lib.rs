//! Report adjuster — decode, filter and rewrite an analysis report.
//!
//! Stages:
//! 1. Codec: base64 + zlib wrapper around `results` / `project_metadata`
//! 2. Loader: parse, decode, type-check, advisory status/engine checks
//! 3. Artifacts: drop function artifacts not backed by a REST endpoint
//! 4. Flows: drop flows matching the exclusion pattern or too deep
//! 5. Pipeline: run the stages and overwrite the report in place

pub mod artifacts;
pub mod codec;
pub mod flows;
pub mod loader;
pub mod pipeline;

pub use flows::ExclusionPattern;
pub use loader::LoadedReport;
pub use pipeline::{AdjustSummary, ReportAdjuster};
