// genapp/src/cli/ui.rs
use colored::Colorize;
use genapp_core::ProgressSink;

/// Prints progress to stdout with the `==> ` prefix.
pub struct TerminalProgress {
    quiet: bool,
}

impl TerminalProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressSink for TerminalProgress {
    fn step(&mut self, message: &str) {
        if !self.quiet {
            println!("{}{}", "==> ".bold().blue(), message.bold());
        }
    }

    fn note(&mut self, message: &str) {
        if !self.quiet {
            println!("{}{}", "==> ".bold().yellow(), message);
        }
    }
}
