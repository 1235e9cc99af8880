// genapp/src/cli/assemble.rs

use clap::Args;
use genapp_common::config::AssemblyStrategy;
use genapp_common::error::Result;
use tracing::instrument;

use super::ui::TerminalProgress;
use super::LayoutArgs;

#[derive(Debug, Args, Default)]
pub struct AssembleArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Build in a temporary directory and swap it into place once complete.
    #[arg(long)]
    staged: bool,

    /// Print the assembly report as JSON instead of progress lines.
    #[arg(long)]
    json: bool,
}

impl AssembleArgs {
    #[instrument(skip(self), fields(app = ?self.layout.app_name, staged = self.staged))]
    pub fn run(&self, quiet: bool) -> Result<()> {
        let strategy = if self.staged {
            AssemblyStrategy::Staged
        } else {
            AssemblyStrategy::InPlace
        };
        let layout = self.layout.resolve()?.with_strategy(strategy);

        let mut progress = TerminalProgress::new(quiet || self.json);
        let report = genapp_core::assemble(&layout, &mut progress)?;

        if self.json {
            println!("{}", report.to_json()?);
        }
        Ok(())
    }
}
