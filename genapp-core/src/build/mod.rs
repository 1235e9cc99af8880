// ===== genapp-core/src/build/mod.rs =====
// Main module for build functionality

// --- Submodules ---
pub mod bundle;

pub use bundle::{assemble, assemble_app, check_dependencies, plan, verify_bundle, Step};
