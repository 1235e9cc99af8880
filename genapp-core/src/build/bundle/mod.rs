// genapp-core/src/build/bundle/mod.rs
//! Assembles a `.app` bundle from pre-built artifacts.

pub mod steps;
pub mod verify;

use std::path::{Path, PathBuf};

use genapp_aio as aio;
use genapp_common::config::{AssemblyStrategy, BundleLayout};
use genapp_common::error::{GenappError, Result};
use genapp_common::model::report::{AssemblyReport, PlacedArtifact};
use tracing::{debug, error, info, instrument};

pub use steps::{plan, Step, StepOutcome};
pub use verify::{expected_paths, verify_bundle};

use crate::progress::{NullProgress, ProgressSink};

/// Checks that every artifact the layout needs is present. Nothing is written.
/// All missing names are reported together.
pub fn check_dependencies(layout: &BundleLayout) -> Result<()> {
    let mut missing = Vec::new();
    for spec in &layout.artifacts {
        let source = layout.source_path(spec);
        let present = if spec.kind.is_tree() {
            aio::is_directory(&source)
        } else {
            aio::check_path_exists(&source)
        };
        if present {
            debug!("Found {} at {}", spec.kind, source.display());
        } else {
            debug!("Missing {} at {}", spec.kind, source.display());
            missing.push((spec.kind, spec.display_name()));
        }
    }
    // Reported in manifest order, independent of the placement order.
    missing.sort_by_key(|(kind, _)| *kind);
    let missing: Vec<String> = missing.into_iter().map(|(_, name)| name).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        error!("Dependencies missing: {}", missing.join(", "));
        Err(GenappError::MissingDependency(missing))
    }
}

/// Validates the layout and its inputs, then builds the bundle with the layout's strategy.
#[instrument(skip(layout, progress), fields(app = %layout.app_name))]
pub fn assemble(layout: &BundleLayout, progress: &mut dyn ProgressSink) -> Result<AssemblyReport> {
    layout.validate()?;
    check_dependencies(layout)?;

    info!(
        "Assembling {} in {} ({:?})",
        layout.bundle_name(),
        layout.working_dir.display(),
        layout.strategy
    );
    let report = match layout.strategy {
        AssemblyStrategy::InPlace => assemble_in_place(layout, progress)?,
        AssemblyStrategy::Staged => assemble_staged(layout, progress)?,
    };

    progress.step("Build succeeded");
    info!("Bundle ready at {}", report.bundle_path.display());
    Ok(report)
}

/// Builds the standard bundle for `app_name` inside `working_dir`.
pub fn assemble_app(app_name: &str, working_dir: impl Into<PathBuf>) -> Result<AssemblyReport> {
    let layout = BundleLayout::standard(app_name, working_dir);
    assemble(&layout, &mut NullProgress)
}

/// Runs `steps` in order, stopping at the first failure.
pub fn run_steps(
    steps: &[Step],
    report: &mut AssemblyReport,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    for step in steps {
        match step.execute(progress)? {
            StepOutcome::Removed(_) => report.replaced_existing = true,
            StepOutcome::Unchanged => {}
            StepOutcome::Placed(placed) => report.placed.push(placed),
        }
    }
    Ok(())
}

fn assemble_in_place(
    layout: &BundleLayout,
    progress: &mut dyn ProgressSink,
) -> Result<AssemblyReport> {
    let bundle_dir = layout.bundle_dir();
    let mut report = AssemblyReport::new(&layout.app_name, bundle_dir.clone(), layout.strategy);
    let steps = plan(layout, &bundle_dir);
    run_steps(&steps, &mut report, progress)?;
    Ok(report)
}

/// Builds into a hidden sibling directory and swaps it in once it verifies, so a failure
/// leaves any previous bundle untouched.
fn assemble_staged(
    layout: &BundleLayout,
    progress: &mut dyn ProgressSink,
) -> Result<AssemblyReport> {
    let bundle_dir = layout.bundle_dir();
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{}.", layout.bundle_name()))
        .suffix(".staging")
        .tempdir_in(&layout.working_dir)
        .map_err(|e| {
            GenappError::IoError(format!(
                "Failed to create staging directory in {}: {}",
                layout.working_dir.display(),
                e
            ))
        })?;
    let staged_root = staging.path().join(layout.bundle_name());
    debug!("Staging bundle at {}", staged_root.display());

    let mut report = AssemblyReport::new(&layout.app_name, bundle_dir.clone(), layout.strategy);
    let steps = plan(layout, &staged_root);
    run_steps(&steps, &mut report, progress)?;
    verify_bundle(layout, &staged_root)?;

    let stale = Step::RemoveStale {
        path: bundle_dir.clone(),
    };
    if let StepOutcome::Removed(_) = stale.execute(progress)? {
        report.replaced_existing = true;
    }
    aio::rename_path(&staged_root, &bundle_dir)?;

    for placed in &mut report.placed {
        rebase(placed, &staged_root, &bundle_dir);
    }
    // Dropping `staging` removes the now-empty temporary directory.
    drop(staging);
    Ok(report)
}

fn rebase(placed: &mut PlacedArtifact, from: &Path, to: &Path) {
    let path = match placed {
        PlacedArtifact::Directory { path }
        | PlacedArtifact::File { path, .. }
        | PlacedArtifact::Tree { path, .. } => path,
    };
    if let Ok(relative) = path.strip_prefix(from) {
        *path = to.join(relative);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::progress::RecordingProgress;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn check_dependencies_reports_every_missing_input() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let work = tmp.path().join("deploy/osx");
        write(&work.join("Info.plist"), "<plist/>");
        write(&work.join("everVoid"), "bin");

        let layout = BundleLayout::standard("everVoid", &work);
        match check_dependencies(&layout).unwrap_err() {
            GenappError::MissingDependency(names) => assert_eq!(
                names,
                vec!["PkgInfo", "icon.icns", "everVoid.jar", "../../res"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_names_follow_manifest_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let work = tmp.path().join("deploy/osx");
        for name in ["Info.plist", "PkgInfo", "everVoid.jar"] {
            write(&work.join(name), name);
        }
        fs::create_dir_all(tmp.path().join("res")).expect("res dir");

        let layout = BundleLayout::standard("everVoid", &work);
        match check_dependencies(&layout).unwrap_err() {
            GenappError::MissingDependency(names) => {
                assert_eq!(names, vec!["everVoid", "icon.icns"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rebase_moves_paths_out_of_staging() {
        let mut placed = PlacedArtifact::Tree {
            path: PathBuf::from("/w/.stage/everVoid.app/Contents/Resources/Java/res"),
            files: 2,
        };
        rebase(
            &mut placed,
            Path::new("/w/.stage/everVoid.app"),
            Path::new("/w/everVoid.app"),
        );
        assert_eq!(
            placed.path(),
            &PathBuf::from("/w/everVoid.app/Contents/Resources/Java/res")
        );
    }

    #[test]
    fn invalid_layout_fails_before_dependency_check() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let layout = BundleLayout::standard("", tmp.path());
        let mut progress = RecordingProgress::default();
        let err = assemble(&layout, &mut progress).unwrap_err();
        assert!(matches!(err, GenappError::InvalidLayout(_)));
        assert!(progress.steps.is_empty());
    }
}
