//! Set status command implementation.

use anyhow::{Context, Result};
use clap::Args;

use lostfound_core::{ItemId, ItemStatus, ItemStore};
use lostfound_file::DataDir;

use crate::output;

#[derive(Args, Debug)]
pub struct SetStatusArgs {
    /// Item id
    pub id: String,

    /// New status: active or resolved
    pub status: String,

    /// Print the updated item as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SetStatusArgs, data_dir: &DataDir) -> Result<()> {
    let status: ItemStatus = args.status.parse().context("Invalid status")?;
    let id = ItemId::new(&args.id).context("Invalid item id")?;

    let (store, _) = data_dir.open().context("Failed to open data directory")?;
    let updated = store
        .update_status(&id, status)
        .await
        .context("Failed to update status")?;

    if args.json {
        return output::json(&updated);
    }

    output::success(&format!("Item {} is now {}", updated.id, updated.status));

    Ok(())
}
