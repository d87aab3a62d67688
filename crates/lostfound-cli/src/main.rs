//! lostfound - lost-and-found listing server and command-line client.
//!
//! `lostfound serve` runs the HTTP API. The other subcommands operate on
//! the same data directory directly, which is handy for moderation and
//! scripting while the server is stopped.

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, &data_dir).await,
        Commands::List(args) => commands::list::run(args, &data_dir).await,
        Commands::Create(args) => commands::create::run(args, &data_dir).await,
        Commands::SetStatus(args) => commands::set_status::run(args, &data_dir).await,
        Commands::Delete(args) => commands::delete::run(args, &data_dir).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
