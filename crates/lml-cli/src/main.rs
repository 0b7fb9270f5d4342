//! LML CLI: the `lml` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LML_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Certify {
            alphabet_size,
            bound,
            max_depth,
            workers,
            depths,
            config,
            json,
        } => commands::certify::run(commands::certify::Args {
            alphabet_size,
            bound,
            max_depth,
            workers,
            depths,
            config,
            json,
        }),

        Commands::Verify { certificate, json } => commands::verify::run(certificate, json),

        Commands::Gate {
            text,
            file,
            indicators,
            law_id,
            config,
            json,
        } => commands::gate::run(commands::gate::Args {
            text,
            file,
            indicators,
            law_id,
            config,
            json,
        }),

        Commands::Enforce {
            prompt,
            generators,
            config,
            json,
        } => commands::enforce::run(prompt, generators, config, json),

        Commands::Rules { config, json } => commands::rules::run(config, json),
    }
}
