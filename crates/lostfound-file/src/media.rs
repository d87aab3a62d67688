//! Uploads directory for item images.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use lostfound_core::error::StorageError;
use lostfound_core::types::{MediaRef, MediaUpload};
use lostfound_core::{MediaStore, Result};

/// Image storage in a single flat directory.
///
/// Files are named `{epoch_millis}-{original name}`. An upload never
/// replaces an existing file; a taken name moves to the next millisecond.
#[derive(Debug, Clone)]
pub struct MediaDir {
    root: PathBuf,
}

impl MediaDir {
    /// Use `root` as the uploads directory, creating it if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Get the uploads directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the path for a stored file.
    pub fn path(&self, media: &MediaRef) -> PathBuf {
        self.root.join(media.as_str())
    }

    /// Claim an unused name for an upload by creating an empty file there,
    /// moving to the next millisecond while the name is taken.
    fn reserve(&self, mut millis: u64, original_name: &str) -> Result<(MediaRef, PathBuf)> {
        loop {
            let media = MediaRef::for_upload(millis, original_name);
            let path = self.path(&media);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok((media, path)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    millis = millis.wrapping_add(1);
                }
                Err(e) => return Err(StorageError::io(&path, e).into()),
            }
        }
    }
}

#[async_trait]
impl MediaStore for MediaDir {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn store(&self, upload: MediaUpload) -> Result<MediaRef> {
        upload.check()?;

        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let (media, path) = self.reserve(millis, &upload.original_name)?;

        let temp_path = self.root.join(format!(".{}.tmp", media));
        let written = fs::write(&temp_path, &upload.bytes)
            .map_err(|e| StorageError::io(&temp_path, e))
            .and_then(|()| fs::rename(&temp_path, &path).map_err(|e| StorageError::io(&path, e)));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        debug!(%media, size = upload.bytes.len(), "Stored image");

        Ok(media)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn remove(&self, media: &MediaRef) -> Result<()> {
        let path = self.path(media);

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(%media, "Removed image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%media, "Image already absent");
                Ok(())
            }
            Err(e) => Err(StorageError::io(&path, e).into()),
        }
    }
}
