//! floracheck CLI - reconcile a plant checklist against botanical authorities.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { source, inputs, report, update, json } => {
            commands::check::run(source, inputs, report, update, json, cli.verbose)
        }

        Commands::Audit { source, inputs } => commands::audit::run(source, inputs, cli.verbose),

        Commands::Sources => commands::sources::run(),

        Commands::Candidates { name, source, taxa } => {
            commands::candidates::run(name, source, taxa)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, honouring `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
