// genapp/src/cli/check.rs

use clap::Args;
use genapp_common::error::Result;
use genapp_core::ProgressSink;

use super::ui::TerminalProgress;
use super::LayoutArgs;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    layout: LayoutArgs,
}

impl CheckArgs {
    pub fn run(&self, quiet: bool) -> Result<()> {
        let layout = self.layout.resolve()?;
        genapp_core::check_dependencies(&layout)?;
        TerminalProgress::new(quiet).step(&format!(
            "All dependencies for {} present in {}",
            layout.bundle_name(),
            layout.working_dir.display()
        ));
        Ok(())
    }
}
