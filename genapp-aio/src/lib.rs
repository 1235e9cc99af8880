// genapp-aio/src/lib.rs
//! Synchronous IO operations for genapp (directory creation, exclusive copies, tree copies,
//! permissions)

// Declare modules
pub mod fs;

// Re-export the primitives used by the assembler
pub use fs::*;
