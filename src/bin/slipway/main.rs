//! Slipway CLI - A build configuration resolver for native C++ projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use slipway::errors::ConfigError;
use slipway::util::diagnostic;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        // Fatal configuration errors get the full diagnostic treatment;
        // anything else is an environment problem reported as-is.
        match e.downcast_ref::<ConfigError>() {
            Some(config_err) => diagnostic::emit(&config_err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Linkplan(args) => commands::linkplan::execute(args),
        Commands::Tests(args) => commands::tests::execute(args),
        Commands::Explain(args) => commands::explain::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
