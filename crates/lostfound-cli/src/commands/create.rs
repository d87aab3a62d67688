//! Create command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::warn;

use lostfound_core::{ItemStore, MediaStore, MediaUpload, NewItem};
use lostfound_file::DataDir;

use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Short title, e.g. "Black Wallet"
    #[arg(long)]
    pub title: String,

    /// Where and when it was lost or found
    #[arg(long)]
    pub description: String,

    /// How to reach the finder or owner
    #[arg(long)]
    pub contact: String,

    /// Location
    #[arg(long)]
    pub location: Option<String>,

    /// Image file to attach (jpeg, png, gif or webp)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Base URL the image will be served from
    #[arg(long, env = "LOSTFOUND_PUBLIC_URL", default_value = "http://localhost:3000")]
    pub public_url: String,

    /// Print the created item as JSON
    #[arg(long)]
    pub json: bool,
}

/// Mime type implied by a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

pub async fn run(args: CreateArgs, data_dir: &DataDir) -> Result<()> {
    let mut item = NewItem::new(&args.title, &args.description, &args.contact);
    if let Some(location) = &args.location {
        item = item.with_location(location);
    }

    if item.is_missing_fields() {
        bail!("Missing required fields: title, description, contact.");
    }

    let (store, media) = data_dir.open().context("Failed to open data directory")?;

    let stored = match &args.image {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            let original_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let upload = MediaUpload::new(bytes, original_name, mime_for_path(path));
            Some(media.store(upload).await.context("Failed to store image")?)
        }
        None => None,
    };

    if let Some(media) = &stored {
        item = item.with_image_url(format!(
            "{}/uploads/{}",
            args.public_url.trim_end_matches('/'),
            media
        ));
    }

    let created = match store.create(item).await {
        Ok(created) => created,
        Err(e) => {
            if let Some(stored) = &stored
                && let Err(cleanup) = media.remove(stored).await
            {
                warn!(media = %stored, error = %cleanup, "Failed to remove orphaned image");
            }
            return Err(e).context("Failed to create item");
        }
    };

    if args.json {
        return output::json(&created);
    }

    println!("{}", created.id);
    output::success(&format!("Created item: {}", created.title));

    Ok(())
}
