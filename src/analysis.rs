//! Build artifact size report.
//!
//! Pure function of the filesystem at call time: each expected artifact is
//! either found (with its size) or reported missing, and the sizes of the
//! found ones are summed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One expected artifact, located by a glob pattern relative to the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ArtifactSpec {
    /// Label shown in the report.
    pub label: String,
    /// Glob pattern, e.g. `dist/js/app.*.js`.
    pub pattern: String,
}

impl ArtifactSpec {
    /// Construct a spec.
    #[must_use]
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// Result for one artifact.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtifactReport {
    /// Label from the spec.
    pub label: String,
    /// First matching file, if any.
    pub path: Option<PathBuf>,
    /// File size in bytes; `None` when missing.
    pub size: Option<u64>,
}

/// Report over all artifacts.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BuildReport {
    /// Per-artifact results in the order requested.
    pub artifacts: Vec<ArtifactReport>,
    /// Sum of all found sizes.
    pub total_bytes: u64,
}

impl BuildReport {
    /// Labels of artifacts that were not found.
    #[must_use]
    pub fn missing(&self) -> Vec<&str> {
        self.artifacts
            .iter()
            .filter(|a| a.size.is_none())
            .map(|a| a.label.as_str())
            .collect()
    }
}

fn first_match(root: &Path, pattern: &str) -> Option<PathBuf> {
    let full = root.join(pattern);
    let full = full.to_string_lossy();
    let paths = match glob::glob(&full) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(pattern, %err, "invalid artifact pattern");
            return None;
        }
    };
    let mut matches: Vec<PathBuf> = paths
        .filter_map(std::result::Result::ok)
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Inspect every artifact under `root`.
#[must_use]
pub fn analyze(root: &Path, specs: &[ArtifactSpec]) -> BuildReport {
    let mut report = BuildReport::default();
    for spec in specs {
        let path = first_match(root, &spec.pattern);
        let size = path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len());
        report.total_bytes += size.unwrap_or(0);
        report.artifacts.push(ArtifactReport {
            label: spec.label.clone(),
            path,
            size,
        });
    }
    report
}
