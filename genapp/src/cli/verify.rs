// genapp/src/cli/verify.rs

use clap::Args;
use genapp_common::error::Result;
use genapp_core::ProgressSink;

use super::ui::TerminalProgress;
use super::LayoutArgs;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    layout: LayoutArgs,
}

impl VerifyArgs {
    pub fn run(&self, quiet: bool) -> Result<()> {
        let layout = self.layout.resolve()?;
        let bundle_dir = layout.bundle_dir();
        genapp_core::verify_bundle(&layout, &bundle_dir)?;
        TerminalProgress::new(quiet).step(&format!(
            "{} matches the expected layout",
            bundle_dir.display()
        ));
        Ok(())
    }
}
