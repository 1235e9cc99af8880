// genapp-core/src/build/bundle/steps.rs
use std::fmt;
use std::path::{Path, PathBuf};

use genapp_aio as aio;
use genapp_common::config::BundleLayout;
use genapp_common::error::Result;
use genapp_common::model::artifact::ArtifactKind;
use genapp_common::model::report::PlacedArtifact;
use tracing::debug;

use crate::progress::ProgressSink;

/// A single construction action. Every step except `RemoveStale` refuses to
/// touch a destination that already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Delete a bundle left over from a previous run.
    RemoveStale { path: PathBuf },
    /// Create a directory (and any missing parents).
    CreateDir { path: PathBuf },
    /// Copy one file, optionally setting its mode afterwards.
    CopyFile {
        kind: ArtifactKind,
        source: PathBuf,
        destination: PathBuf,
        mode: Option<u32>,
    },
    /// Recursively copy a directory.
    CopyTree { source: PathBuf, destination: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An existing bundle was deleted.
    Removed(PathBuf),
    /// Nothing needed doing.
    Unchanged,
    Placed(PlacedArtifact),
}

impl Step {
    pub fn destination(&self) -> &Path {
        match self {
            Step::RemoveStale { path } | Step::CreateDir { path } => path,
            Step::CopyFile { destination, .. } | Step::CopyTree { destination, .. } => destination,
        }
    }

    pub fn execute(&self, progress: &mut dyn ProgressSink) -> Result<StepOutcome> {
        debug!("Executing step: {}", self);
        match self {
            Step::RemoveStale { path } => {
                if !aio::check_symlink_exists(path) {
                    return Ok(StepOutcome::Unchanged);
                }
                progress.note(&format!(
                    "Old bundle {} exists, removing",
                    display_name(path)
                ));
                aio::remove_path(path)?;
                Ok(StepOutcome::Removed(path.clone()))
            }
            Step::CreateDir { path } => {
                progress.step(&self.to_string());
                aio::create_dir_exclusive(path)?;
                Ok(StepOutcome::Placed(PlacedArtifact::Directory { path: path.clone() }))
            }
            Step::CopyFile {
                kind,
                source,
                destination,
                mode,
            } => {
                progress.step(&self.to_string());
                aio::copy_file_exclusive(source, destination)?;
                if let Some(mode) = mode {
                    aio::set_permissions(destination, *mode)?;
                }
                Ok(StepOutcome::Placed(PlacedArtifact::File {
                    kind: *kind,
                    path: destination.clone(),
                    mode: *mode,
                }))
            }
            Step::CopyTree {
                source,
                destination,
            } => {
                progress.step(&self.to_string());
                let files = aio::copy_tree(source, destination)?;
                Ok(StepOutcome::Placed(PlacedArtifact::Tree {
                    path: destination.clone(),
                    files,
                }))
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::RemoveStale { path } => write!(f, "Remove stale bundle {}", path.display()),
            Step::CreateDir { path } => write!(f, "Creating {}", path.display()),
            Step::CopyFile {
                kind, destination, ..
            } => write!(f, "Copying the {} to {}", kind, destination.display()),
            Step::CopyTree { destination, .. } => {
                write!(f, "Copying resource files to {}", destination.display())
            }
        }
    }
}

/// Builds the ordered construction sequence for a bundle rooted at `root`:
/// stale removal, then each artifact preceded by the directories it needs,
/// outer to inner.
pub fn plan(layout: &BundleLayout, root: &Path) -> Vec<Step> {
    let mut steps = vec![Step::RemoveStale {
        path: root.to_path_buf(),
    }];
    let mut created: Vec<PathBuf> = Vec::new();

    for spec in &layout.artifacts {
        if let Some(parent) = spec.destination.parent() {
            let mut ancestor = PathBuf::new();
            for component in parent.components() {
                ancestor.push(component);
                if !created.contains(&ancestor) {
                    created.push(ancestor.clone());
                    steps.push(Step::CreateDir {
                        path: root.join(&ancestor),
                    });
                }
            }
        }

        let source = layout.source_path(spec);
        let destination = layout.destination_path(root, spec);
        if spec.kind.is_tree() {
            steps.push(Step::CopyTree {
                source,
                destination,
            });
        } else {
            steps.push(Step::CopyFile {
                kind: spec.kind,
                source,
                destination,
                mode: spec.mode,
            });
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingProgress;

    #[test]
    fn plan_follows_the_bundle_construction_order() {
        let layout = BundleLayout::standard("everVoid", "/work");
        let root = layout.bundle_dir();
        let steps = plan(&layout, &root);

        let rendered: Vec<String> = steps
            .iter()
            .map(|s| match s {
                Step::RemoveStale { .. } => "remove".to_string(),
                Step::CreateDir { path } => {
                    format!("mkdir {}", path.strip_prefix(&root).unwrap().display())
                }
                Step::CopyFile { destination, .. } => {
                    format!("copy {}", destination.strip_prefix(&root).unwrap().display())
                }
                Step::CopyTree { destination, .. } => {
                    format!("tree {}", destination.strip_prefix(&root).unwrap().display())
                }
            })
            .collect();

        assert_eq!(
            rendered,
            vec![
                "remove",
                "mkdir Contents",
                "copy Contents/Info.plist",
                "copy Contents/PkgInfo",
                "mkdir Contents/Resources",
                "copy Contents/Resources/icon.icns",
                "mkdir Contents/MacOS",
                "copy Contents/MacOS/everVoid",
                "mkdir Contents/Resources/Java",
                "copy Contents/Resources/Java/everVoid.jar",
                "tree Contents/Resources/Java/res",
            ]
        );
    }

    #[test]
    fn executable_step_carries_full_permissions() {
        let layout = BundleLayout::standard("everVoid", "/work");
        let steps = plan(&layout, &layout.bundle_dir());
        let exe = steps
            .iter()
            .find(|s| matches!(s, Step::CopyFile { kind: ArtifactKind::Executable, .. }))
            .expect("executable step");
        assert!(matches!(exe, Step::CopyFile { mode: Some(0o777), .. }));
        assert_eq!(
            exe.destination(),
            Path::new("/work/everVoid.app/Contents/MacOS/everVoid")
        );
    }

    #[test]
    fn remove_stale_is_a_noop_without_a_bundle() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let step = Step::RemoveStale {
            path: tmp.path().join("everVoid.app"),
        };
        let mut progress = RecordingProgress::default();
        assert_eq!(step.execute(&mut progress).unwrap(), StepOutcome::Unchanged);
        assert!(progress.notes.is_empty());
    }

    #[test]
    fn create_dir_refuses_existing_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("everVoid.app/Contents");
        std::fs::create_dir_all(&path).unwrap();
        let err = Step::CreateDir { path }
            .execute(&mut RecordingProgress::default())
            .unwrap_err();
        assert!(err.is_destination_conflict());
    }
}
