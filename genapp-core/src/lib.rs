// genapp-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod build;
pub mod progress;

// Re-export key types for easier use by the CLI crate
pub use build::bundle::{
    assemble, assemble_app, check_dependencies, expected_paths, plan, run_steps, verify_bundle,
    Step, StepOutcome,
};
pub use progress::{NullProgress, ProgressSink, RecordingProgress};
