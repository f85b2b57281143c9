mod bridge;
mod catalog;
mod chat;
mod cli;
mod config;
mod engine;
mod form;
mod model;
mod page;
mod storage;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = cli::Cli::parse();

    // Logs go to stderr; stdout belongs to the chat.
    let default_level = if cli.verbose { "casebot=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("CASEBOT_LOG").unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
