// genapp-core/src/build/bundle/verify.rs
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use genapp_aio as aio;
use genapp_common::config::BundleLayout;
use genapp_common::error::{GenappError, Result};
use tracing::debug;

/// Bundle-relative paths a finished bundle must contain, excluding the contents of the
/// resource tree.
pub fn expected_paths(layout: &BundleLayout) -> BTreeSet<PathBuf> {
    let mut paths: BTreeSet<PathBuf> = layout.directories().into_iter().collect();
    paths.extend(layout.artifacts.iter().map(|a| a.destination.clone()));
    paths
}

fn join_paths(paths: &BTreeSet<PathBuf>) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks that the bundle at `root` matches `layout` exactly: every directory and artifact
/// in place, nothing extra, the executable runnable by everyone and the resource tree
/// mirroring its source.
pub fn verify_bundle(layout: &BundleLayout, root: &Path) -> Result<()> {
    debug!("Verifying bundle at {}", root.display());
    if !aio::is_directory(root) {
        return Err(GenappError::Verification(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let tree_destinations: Vec<&Path> = layout
        .artifacts
        .iter()
        .filter(|a| a.kind.is_tree())
        .map(|a| a.destination.as_path())
        .collect();

    let found: BTreeSet<PathBuf> = aio::list_tree_entries(root)?
        .into_iter()
        .filter(|p| {
            !tree_destinations
                .iter()
                .any(|t| p.starts_with(t) && p.as_path() != *t)
        })
        .collect();
    let expected = expected_paths(layout);

    let missing: BTreeSet<PathBuf> = expected.difference(&found).cloned().collect();
    if !missing.is_empty() {
        return Err(GenappError::Verification(format!(
            "missing {}",
            join_paths(&missing)
        )));
    }
    let unexpected: BTreeSet<PathBuf> = found.difference(&expected).cloned().collect();
    if !unexpected.is_empty() {
        return Err(GenappError::Verification(format!(
            "unexpected {}",
            join_paths(&unexpected)
        )));
    }

    for spec in &layout.artifacts {
        let placed = layout.destination_path(root, spec);
        if spec.kind.is_tree() {
            if !aio::is_directory(&placed) {
                return Err(GenappError::Verification(format!(
                    "{} should be a directory",
                    spec.destination.display()
                )));
            }
            let source_entries = aio::list_tree_entries(&layout.source_path(spec))?;
            let placed_entries = aio::list_tree_entries(&placed)?;
            if source_entries != placed_entries {
                return Err(GenappError::Verification(format!(
                    "{} does not mirror its source tree",
                    spec.destination.display()
                )));
            }
            continue;
        }

        if !aio::is_file(&placed) {
            return Err(GenappError::Verification(format!(
                "{} should be a file",
                spec.destination.display()
            )));
        }
        let wants_exec = spec.mode.is_some_and(|m| (m & 0o111) == 0o111);
        if wants_exec && !aio::is_executable_by_all(&placed)? {
            return Err(GenappError::Verification(format!(
                "{} is not executable by all users",
                spec.destination.display()
            )));
        }
    }

    debug!("Bundle at {} matches its layout", root.display());
    Ok(())
}
