//! Delete command implementation.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;

use lostfound_core::{ItemId, ItemStore};
use lostfound_file::DataDir;

use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Item id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, data_dir: &DataDir) -> Result<()> {
    let id = ItemId::new(&args.id).context("Invalid item id")?;

    let (store, _) = data_dir.open().context("Failed to open data directory")?;
    let item = store.get(&id).await.context("Failed to find item")?;

    // Confirm unless --force
    if !args.force {
        eprint!(
            "This will delete \"{}\"{}. Continue? [y/N] ",
            item.title,
            if item.has_image() { " and its image" } else { "" }
        );
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let deleted = store.delete(&id).await.context("Failed to delete item")?;

    output::success(&format!("{} ({})", deleted.message, deleted.deleted_id));

    Ok(())
}
