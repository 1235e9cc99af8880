// genapp-common/src/model/artifact.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// The logical role an upstream artifact plays inside the bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The property-list manifest (`Info.plist`).
    Manifest,
    /// The platform signature file (`PkgInfo`).
    PlatformSignature,
    /// The compiled launcher executable.
    Executable,
    /// The icon resource (`icon.icns`).
    Icon,
    /// The packaged application archive (`<app>.jar`).
    PackagedArchive,
    /// A directory of runtime data copied verbatim.
    ResourceTree,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Manifest => "manifest",
            ArtifactKind::PlatformSignature => "platform signature",
            ArtifactKind::Executable => "executable",
            ArtifactKind::Icon => "icon",
            ArtifactKind::PackagedArchive => "packaged archive",
            ArtifactKind::ResourceTree => "resource tree",
        }
    }

    /// Whether the artifact is a directory copied recursively rather than a single file.
    pub fn is_tree(&self) -> bool {
        matches!(self, ArtifactKind::ResourceTree)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
