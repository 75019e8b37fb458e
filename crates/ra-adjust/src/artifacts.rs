//! Function artifacts only survive when a REST endpoint lives in the same file.

use ra_core::types::ArtifactKind;
use ra_core::{Artifact, Report};
use std::collections::HashSet;

/// File paths of every `rest_api` artifact.
pub fn endpoint_paths(artifacts: &[Artifact]) -> HashSet<String> {
    artifacts
        .iter()
        .filter_map(Artifact::endpoint_path)
        .map(str::to_owned)
        .collect()
}

pub fn is_backed(artifact: &Artifact, endpoints: &HashSet<String>) -> bool {
    match artifact.kind() {
        ArtifactKind::Functions => artifact.code_ref_path().is_some_and(|p| endpoints.contains(p)),
        _ => true,
    }
}

/// Drop unbacked function artifacts in place, keeping order. Returns the number dropped.
pub fn filter_functions(report: &mut Report) -> usize {
    let Some(artifacts) = report.results.artifacts.as_mut() else {
        tracing::debug!("Report has no artifacts section");
        return 0;
    };
    let endpoints = endpoint_paths(artifacts);
    let before = artifacts.len();
    artifacts.retain(|a| is_backed(a, &endpoints));

    let dropped = before - artifacts.len();
    tracing::debug!(endpoints = endpoints.len(), "Filtered {dropped} function artifacts");
    dropped
}
