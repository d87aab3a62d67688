//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use lostfound_core::{Item, ItemStatus, ItemStore};
use lostfound_file::DataDir;

use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show items with this status (active or resolved)
    #[arg(long)]
    pub status: Option<String>,

    /// Only show items whose title contains this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Show oldest items first
    #[arg(long)]
    pub oldest: bool,

    /// Print the items as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Filter and order items the way the browser client does: a
/// case-insensitive title search, an optional status, newest first unless
/// `oldest` is set.
pub fn select(
    items: Vec<Item>,
    status: Option<ItemStatus>,
    search: Option<&str>,
    oldest: bool,
) -> Vec<Item> {
    let needle = search
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut selected: Vec<Item> = items
        .into_iter()
        .filter(|item| status.is_none_or(|s| item.status == s))
        .filter(|item| {
            needle
                .as_ref()
                .is_none_or(|q| item.title.to_lowercase().contains(q))
        })
        .collect();

    if oldest {
        selected.reverse();
    }

    selected
}

pub async fn run(args: ListArgs, data_dir: &DataDir) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<ItemStatus>)
        .transpose()
        .context("Invalid --status")?;

    let (store, _) = data_dir.open().context("Failed to open data directory")?;
    let items = store.list().await.context("Failed to list items")?;
    let items = select(items, status, args.search.as_deref(), args.oldest);

    if args.json {
        return output::json_pretty(&items);
    }

    if items.is_empty() {
        eprintln!("{}", "No items found.".dimmed());
        return Ok(());
    }

    for item in &items {
        output::item(item);
        println!();
    }

    Ok(())
}
