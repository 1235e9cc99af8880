// genapp-common/src/config.rs
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{GenappError, Result};
use super::model::artifact::ArtifactKind;

/// Application bundled when no name is given.
pub const DEFAULT_APP_NAME: &str = "everVoid";
/// Location of the resource tree, relative to the working directory.
pub const DEFAULT_RESOURCE_DIR: &str = "../../res";
pub const BUNDLE_EXTENSION: &str = "app";

const CONTENTS_DIR: &str = "Contents";
const RESOURCES_DIR: &str = "Resources";
const MACOS_DIR: &str = "MacOS";
const JAVA_DIR: &str = "Java";

/// How the bundle gets built on disk.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyStrategy {
    /// Delete the old bundle, then build directly at the final path.
    #[default]
    InPlace,
    /// Build in a temporary sibling directory and rename it into place.
    Staged,
}

/// One artifact of the layout: where it comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    /// Relative to the working directory (or absolute).
    pub source: PathBuf,
    /// Relative to the bundle root.
    pub destination: PathBuf,
    /// Unix mode applied after copying, if any.
    pub mode: Option<u32>,
}

impl ArtifactSpec {
    pub fn new(kind: ArtifactKind, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source: source.into(),
            destination: destination.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Name used when reporting the artifact as a missing dependency.
    pub fn display_name(&self) -> String {
        self.source.to_string_lossy().into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct BundleLayout {
    pub app_name: String,
    pub working_dir: PathBuf,
    /// Ordered; the order drives directory creation and copying.
    pub artifacts: Vec<ArtifactSpec>,
    pub strategy: AssemblyStrategy,
}

impl BundleLayout {
    /// The fixed layout: manifest, signature, executable, icon, archive and resource tree.
    pub fn standard(app_name: &str, working_dir: impl Into<PathBuf>) -> Self {
        let contents = Path::new(CONTENTS_DIR);
        let resources = contents.join(RESOURCES_DIR);
        let macos = contents.join(MACOS_DIR);
        let java = resources.join(JAVA_DIR);
        let jar_name = format!("{app_name}.jar");

        let artifacts = vec![
            ArtifactSpec::new(ArtifactKind::Manifest, "Info.plist", contents.join("Info.plist")),
            ArtifactSpec::new(ArtifactKind::PlatformSignature, "PkgInfo", contents.join("PkgInfo")),
            ArtifactSpec::new(ArtifactKind::Icon, "icon.icns", resources.join("icon.icns")),
            ArtifactSpec::new(ArtifactKind::Executable, app_name, macos.join(app_name)).with_mode(0o777),
            ArtifactSpec::new(ArtifactKind::PackagedArchive, &jar_name, java.join(&jar_name)),
            ArtifactSpec::new(ArtifactKind::ResourceTree, DEFAULT_RESOURCE_DIR, java.join("res")),
        ];

        Self {
            app_name: app_name.to_string(),
            working_dir: working_dir.into(),
            artifacts,
            strategy: AssemblyStrategy::default(),
        }
    }

    /// Builds the standard `everVoid` layout for `working_dir`. Callers apply their
    /// overrides and then call `validate()` once.
    pub fn load(working_dir: impl Into<PathBuf>) -> Self {
        let layout = Self::standard(DEFAULT_APP_NAME, working_dir);
        debug!(
            "Loaded default layout for {} in {}",
            layout.app_name,
            layout.working_dir.display()
        );
        layout
    }

    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        for spec in self.artifacts.iter_mut().filter(|a| a.kind.is_tree()) {
            spec.source = dir.clone();
        }
        self
    }

    pub fn with_strategy(mut self, strategy: AssemblyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_app_name(self, app_name: &str) -> Self {
        let resource_dir = self.resource_spec().map(|s| s.source.clone());
        let mut layout = Self::standard(app_name, self.working_dir).with_strategy(self.strategy);
        if let Some(dir) = resource_dir {
            layout = layout.with_resource_dir(dir);
        }
        layout
    }

    pub fn bundle_name(&self) -> String {
        format!("{}.{}", self.app_name, BUNDLE_EXTENSION)
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.working_dir.join(self.bundle_name())
    }

    pub fn contents_dir(&self) -> PathBuf {
        self.bundle_dir().join(CONTENTS_DIR)
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join(RESOURCES_DIR)
    }

    pub fn macos_dir(&self) -> PathBuf {
        self.contents_dir().join(MACOS_DIR)
    }

    pub fn java_dir(&self) -> PathBuf {
        self.resources_dir().join(JAVA_DIR)
    }

    pub fn executable_path(&self) -> PathBuf {
        match self.artifacts.iter().find(|a| a.kind == ArtifactKind::Executable) {
            Some(spec) => self.bundle_dir().join(&spec.destination),
            None => self.macos_dir().join(&self.app_name),
        }
    }

    pub fn resource_spec(&self) -> Option<&ArtifactSpec> {
        self.artifacts.iter().find(|a| a.kind.is_tree())
    }

    /// Resolves an artifact's source against the working directory.
    pub fn source_path(&self, spec: &ArtifactSpec) -> PathBuf {
        self.working_dir.join(&spec.source)
    }

    pub fn destination_path(&self, root: &Path, spec: &ArtifactSpec) -> PathBuf {
        root.join(&spec.destination)
    }

    /// Bundle-relative directories the layout needs, outer to inner, in first-use order.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut dirs = Vec::new();
        for spec in &self.artifacts {
            let Some(parent) = spec.destination.parent() else {
                continue;
            };
            let mut ancestor = PathBuf::new();
            for component in parent.components() {
                ancestor.push(component);
                if seen.insert(ancestor.clone()) {
                    dirs.push(ancestor.clone());
                }
            }
        }
        dirs
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.app_name.as_str();
        if name.trim().is_empty() {
            return Err(GenappError::InvalidLayout(
                "application name must not be empty".to_string(),
            ));
        }
        if name.contains(['/', '\\', '\0']) || name == "." || name == ".." {
            return Err(GenappError::InvalidLayout(format!(
                "application name '{name}' must be a single path component"
            )));
        }
        if Path::new(name)
            .extension()
            .is_some_and(|ext| ext == BUNDLE_EXTENSION)
        {
            return Err(GenappError::InvalidLayout(format!(
                "application name '{name}' must not carry the .{BUNDLE_EXTENSION} suffix"
            )));
        }

        let mut destinations = HashSet::new();
        for spec in &self.artifacts {
            let dest = &spec.destination;
            let escapes = dest.components().any(|c| {
                !matches!(c, Component::Normal(_))
            });
            if dest.as_os_str().is_empty() || escapes {
                return Err(GenappError::InvalidLayout(format!(
                    "destination '{}' for the {} must be a plain path inside the bundle",
                    dest.display(),
                    spec.kind
                )));
            }
            if !destinations.insert(dest.clone()) {
                return Err(GenappError::InvalidLayout(format!(
                    "destination '{}' is used by more than one artifact",
                    dest.display()
                )));
            }
        }
        // A destination may not sit underneath another file destination.
        for spec in &self.artifacts {
            for other in &self.artifacts {
                if spec.destination != other.destination
                    && spec.destination.starts_with(&other.destination)
                {
                    return Err(GenappError::InvalidLayout(format!(
                        "destination '{}' is nested inside '{}'",
                        spec.destination.display(),
                        other.destination.display()
                    )));
                }
            }
        }
        Ok(())
    }
}
