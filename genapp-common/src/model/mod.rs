// src/model/mod.rs
// Declares the modules within the model directory.

pub mod artifact;
pub mod report;

// Re-export
pub use artifact::ArtifactKind;
pub use report::{AssemblyReport, PlacedArtifact};
