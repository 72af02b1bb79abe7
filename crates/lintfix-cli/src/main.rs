//! `lintfix` - golangci-lint provisioning and quick fixes from the command line.
//!
//! ```bash
//! lintfix platform
//! lintfix install --dest ~/.local/bin
//! lintfix check main.go --apply
//! lintfix check main.go --report golangci.json
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

mod check;
mod cli;
mod install;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Commands::Platform(args) => cli::print_platform(args),
        Commands::Install(args) => install::execute(args),
        Commands::Check(args) => check::execute(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
