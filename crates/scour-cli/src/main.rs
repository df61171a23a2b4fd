//! Scour CLI - rule-based cleaning for tabular transaction data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze { file, json } => commands::analyze::run(file, json, cli.verbose),

        Commands::Generate(args) => commands::generate::run(args, cli.verbose),

        Commands::Apply(args) => commands::apply::run(args, cli.verbose),

        Commands::Validate { file } => commands::validate::run(file, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let default = if verbose { "scour=debug" } else { "scour=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
