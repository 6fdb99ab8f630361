mod batch;
mod cli;
mod config;
mod error;
mod translate;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let verbose = Config::load().map(|c| c.general.verbose).unwrap_or(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "honyaku=debug" } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Translate(args) => translate::run(args)?,
        Commands::Batch(args) => batch::run(args)?,
        Commands::Glossary(args) => translate::show_glossary(args)?,
        Commands::Config(args) => config::commands::run(args)?,
    }

    Ok(())
}
