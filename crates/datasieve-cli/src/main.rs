//! DataSieve CLI - profile, validate and fix tabular data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays clean for JSON output.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile {
            file,
            json,
            output,
            rules,
        } => commands::profile::run(file, json, output, rules, cli.verbose),

        Commands::Fix {
            file,
            output,
            faulty,
            duplicates,
            missing,
            rules,
        } => commands::fix::run(file, output, faulty, duplicates, missing, rules, cli.verbose),

        Commands::Check { file, all, rules } => {
            commands::check::run(file, all, rules, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
