//! On-disk layout of a lostfound data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lostfound_core::Result;

use crate::media::MediaDir;
use crate::store::FileItemStore;

/// A data directory holding `items.json` and an `uploads/` directory.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the snapshot path.
    pub fn items_path(&self) -> PathBuf {
        self.root.join("items.json")
    }

    /// Get the uploads directory.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Open the media directory and the record store wired to it.
    pub fn open(&self) -> Result<(Arc<FileItemStore>, Arc<MediaDir>)> {
        let media = Arc::new(MediaDir::open(self.uploads_dir())?);
        let store = FileItemStore::open(self.items_path(), media.clone())?;
        Ok((Arc::new(store), media))
    }
}
