// genapp-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use config::{ArtifactSpec, AssemblyStrategy, BundleLayout};
pub use error::{GenappError, Result};
pub use model::{ArtifactKind, AssemblyReport, PlacedArtifact};
