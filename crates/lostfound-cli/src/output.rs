//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use lostfound_core::{Item, ItemStatus};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print an item as a block of labeled fields.
pub fn item(item: &Item) {
    let status = match item.status {
        ItemStatus::Active => item.status.as_str().green(),
        ItemStatus::Resolved => item.status.as_str().dimmed(),
    };

    println!("{} [{}]", item.title.bold(), status);
    field("id", item.id.as_str());
    field("description", &item.description);
    field("contact", &item.contact);
    if !item.location.is_empty() {
        field("location", &item.location);
    }
    if item.has_image() {
        field("image", &item.image_url);
    }
    field("created", &item.created_at.to_rfc3339());
    if let Some(updated_at) = item.updated_at {
        field("updated", &updated_at.to_rfc3339());
    }
}
