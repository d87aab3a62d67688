//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{create, delete, list, serve, set_status};

/// Lost-and-found listing server and client.
#[derive(Parser, Debug)]
#[command(name = "lostfound")]
#[command(author, version = env!("LOSTFOUND_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Directory holding items.json and uploads/
    #[arg(long, env = "LOSTFOUND_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// List items, newest first
    List(list::ListArgs),

    /// Create a new item
    Create(create::CreateArgs),

    /// Mark an item active or resolved
    SetStatus(set_status::SetStatusArgs),

    /// Delete an item and its image
    Delete(delete::DeleteArgs),
}
