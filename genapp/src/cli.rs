// genapp/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::env;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use genapp_common::config::BundleLayout;
use genapp_common::error::Result;
use tracing::debug;

// Module declarations
pub mod assemble;
pub mod check;
pub mod ui;
pub mod verify;

use crate::cli::assemble::AssembleArgs;
use crate::cli::check::CheckArgs;
use crate::cli::verify::VerifyArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "genapp", bin_name = "genapp")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to `assemble` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the .app bundle (the default).
    Assemble(AssembleArgs),
    /// Check that every input artifact is present without writing anything.
    Check(CheckArgs),
    /// Verify an existing bundle against the expected layout.
    Verify(VerifyArgs),
}

impl Command {
    pub fn run(&self, quiet: bool) -> Result<()> {
        match self {
            Self::Assemble(command) => command.run(quiet),
            Self::Check(command) => command.run(quiet),
            Self::Verify(command) => command.run(quiet),
        }
    }
}

/// Options shared by every command that needs to know where the bundle lives.
#[derive(Args, Debug, Default, Clone)]
pub struct LayoutArgs {
    /// Application name; also names the executable and the archive.
    #[arg(long, value_name = "NAME")]
    pub app_name: Option<String>,

    /// Directory holding the artifacts (defaults to the current directory).
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Resource tree to copy (defaults to ../../res relative to the artifacts).
    #[arg(long, value_name = "DIR")]
    pub resources: Option<PathBuf>,
}

impl LayoutArgs {
    pub fn resolve(&self) -> Result<BundleLayout> {
        let working_dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => env::current_dir()?,
        };
        let mut layout = BundleLayout::load(working_dir);
        if let Some(name) = &self.app_name {
            layout = layout.with_app_name(name);
        }
        if let Some(resources) = &self.resources {
            layout = layout.with_resource_dir(resources);
        }
        layout.validate()?;
        debug!(
            "Resolved layout for {} in {}",
            layout.bundle_name(),
            layout.working_dir.display()
        );
        Ok(layout)
    }
}
