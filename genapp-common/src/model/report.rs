// genapp-common/src/model/report.rs
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::artifact::ArtifactKind;
use crate::config::AssemblyStrategy;

/// Represents an item placed into the bundle during assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacedArtifact {
    /// A directory of the bundle skeleton (e.g., `Contents/MacOS`).
    Directory { path: PathBuf },
    /// A single file copied from the working directory.
    File {
        kind: ArtifactKind,
        path: PathBuf,
        mode: Option<u32>,
    },
    /// A recursively copied directory and the number of files it holds.
    Tree { path: PathBuf, files: usize },
}

impl PlacedArtifact {
    pub fn path(&self) -> &PathBuf {
        match self {
            PlacedArtifact::Directory { path }
            | PlacedArtifact::File { path, .. }
            | PlacedArtifact::Tree { path, .. } => path,
        }
    }
}

/// Outcome of a successful assembly run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssemblyReport {
    pub app_name: String,
    pub bundle_path: PathBuf,
    pub strategy: AssemblyStrategy,
    /// True when a bundle from a previous run was removed.
    pub replaced_existing: bool,
    pub placed: Vec<PlacedArtifact>,
}

impl AssemblyReport {
    pub fn new(app_name: &str, bundle_path: PathBuf, strategy: AssemblyStrategy) -> Self {
        Self {
            app_name: app_name.to_string(),
            bundle_path,
            strategy,
            replaced_existing: false,
            placed: Vec::new(),
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_tagged_artifacts() {
        let mut report = AssemblyReport::new(
            "everVoid",
            PathBuf::from("/tmp/everVoid.app"),
            AssemblyStrategy::InPlace,
        );
        report.placed.push(PlacedArtifact::File {
            kind: ArtifactKind::Executable,
            path: PathBuf::from("/tmp/everVoid.app/Contents/MacOS/everVoid"),
            mode: Some(0o777),
        });
        let json = report.to_json().unwrap();
        assert!(json.contains("\"type\": \"file\""));
        assert!(json.contains("\"kind\": \"executable\""));
        assert!(json.contains("\"strategy\": \"in_place\""));

        let back: AssemblyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
