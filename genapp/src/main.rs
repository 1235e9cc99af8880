// genapp/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::assemble::AssembleArgs;
use cli::{CliArgs, Command};

/// Exit status when inputs are missing, distinct from I/O failures.
const EXIT_MISSING_DEPENDENCY: i32 = 2;

fn init_logging(verbose_level: u8) {
    let level_filter = match verbose_level {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("GENAPP_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn main() {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let command = cli_args
        .command
        .unwrap_or_else(|| Command::Assemble(AssembleArgs::default()));

    if let Err(e) = command.run(cli_args.quiet) {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        let code = if e.is_missing_dependency() {
            EXIT_MISSING_DEPENDENCY
        } else {
            1
        };
        process::exit(code);
    }

    debug!("Command completed successfully.");
}
