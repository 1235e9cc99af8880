// genapp-core/src/progress.rs
//! Human-facing progress reporting for an assembly run.

/// Receives one message per major milestone of an assembly.
pub trait ProgressSink {
    /// A construction milestone (directory created, artifact copied, ...).
    fn step(&mut self, message: &str);

    /// Informational notes that are not construction steps, such as removing a stale bundle.
    fn note(&mut self, message: &str) {
        self.step(message);
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn step(&mut self, _message: &str) {}
}

/// Keeps every message in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub steps: Vec<String>,
    pub notes: Vec<String>,
}

impl ProgressSink for RecordingProgress {
    fn step(&mut self, message: &str) {
        self.steps.push(message.to_string());
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}
