//! Data directory resolution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use lostfound_file::DataDir;

/// Use the explicit directory if given, else the platform data directory.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<DataDir> {
    let root = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_data_dir()?,
    };

    fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create data directory {}", root.display()))?;

    Ok(DataDir::new(root))
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "lostfound").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
